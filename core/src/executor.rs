//! One write, optional readback, optional notification listen.

use glizzy_common::attempt::{Attempt, Outcome};
use glizzy_common::config::FuzzConfig;
use glizzy_common::error::Result;
use glizzy_common::gatt::Handle;
use glizzy_common::warn;
use tracing::debug;

use crate::transport::{ResponseMarkers, Transport, WriteResponse};

/// What a single execution produced.
///
/// The notification is only surfaced to the reporter and never stored on the
/// attempt record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Execution {
    pub attempt: Attempt,
    pub response: String,
    pub notification: Option<String>,
}

pub struct AttemptExecutor<'a> {
    transport: &'a dyn Transport,
    config: &'a FuzzConfig,
    markers: ResponseMarkers,
}

impl<'a> AttemptExecutor<'a> {
    pub fn new(transport: &'a dyn Transport, config: &'a FuzzConfig) -> Self {
        Self {
            transport,
            config,
            markers: transport.markers(),
        }
    }

    /// Writes `payload` to `handle` and classifies the answer.
    ///
    /// Only the write itself can fail this call. A failed readback leaves the
    /// readback empty, a failed listen is ignored.
    pub async fn execute(&self, handle: Handle, length: usize, payload: &str) -> Result<Execution> {
        let response = self.transport.write(handle, payload).await?;
        let outcome = classify(&response, &self.markers);

        let readback = if outcome.is_success() && !self.config.read_only {
            match self.transport.read(handle).await {
                Ok(value) => Some(value),
                Err(e) => {
                    warn!("Readback of {handle} failed: {e}");
                    None
                }
            }
        } else {
            None
        };

        let notification = if self.config.notify {
            self.listen().await
        } else {
            None
        };

        let attempt = Attempt::write(handle, length, payload, outcome, response.exit_status)
            .with_readback(readback);

        Ok(Execution {
            attempt,
            response: response.text,
            notification,
        })
    }

    async fn listen(&self) -> Option<String> {
        match self
            .transport
            .listen_for_notification(self.config.notify_timeout)
            .await
        {
            Ok(Some(value)) if !value.trim().is_empty() => Some(value.trim().to_string()),
            Ok(_) => None,
            Err(e) => {
                debug!("notification listen failed: {e}");
                None
            }
        }
    }
}

/// Success needs a zero exit status and the confirmation marker. A length
/// rejection anywhere in the text makes a non-success ambiguous.
pub fn classify(response: &WriteResponse, markers: &ResponseMarkers) -> Outcome {
    if response.exit_status == 0 && response.text.contains(markers.confirmed) {
        return Outcome::Success;
    }

    let text = response.text.to_ascii_lowercase();
    if text.contains(&markers.length_rejected.to_ascii_lowercase()) {
        Outcome::Ambiguous
    } else {
        Outcome::Failure
    }
}
