use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use glizzy_common::attempt::Attempt;
use glizzy_common::error::{FuzzError, Result};
use glizzy_common::gatt::{CharacteristicDescriptor, Handle, ServiceRange};
use glizzy_core::cancel::CancelToken;
use glizzy_core::reporter::{Reporter, SweepKind, SweepStats};
use glizzy_core::results::{Summary, SweepStatus};
use glizzy_core::transport::{ResponseMarkers, Transport, WriteResponse};

pub const CONFIRMED: &str = "Characteristic value was written successfully";
pub const REJECTED: &str = "Characteristic Write Request failed: invalid attribute length";

/// A device whose behaviour is fixed up front.
#[derive(Default)]
pub struct FakeDevice {
    pub services: Option<Vec<ServiceRange>>,
    /// Payload length from which writes are rejected.
    pub reject_from: Option<usize>,
    /// Cancels the token once this many writes have completed.
    pub cancel_after: Option<(usize, CancelToken)>,
    pub notification: Option<String>,
    pub writes: Mutex<Vec<(Handle, String)>>,
    pub reads: Mutex<Vec<Handle>>,
}

impl FakeDevice {
    pub fn with_services(services: Vec<ServiceRange>) -> Self {
        Self {
            services: Some(services),
            ..Self::default()
        }
    }

    pub fn write_count(&self) -> usize {
        self.writes.lock().unwrap().len()
    }
}

#[async_trait]
impl Transport for FakeDevice {
    fn markers(&self) -> ResponseMarkers {
        ResponseMarkers {
            confirmed: "was written successfully",
            length_rejected: "invalid attribute length",
        }
    }

    async fn discover_primary_services(&self) -> Result<Vec<ServiceRange>> {
        self.services
            .clone()
            .ok_or_else(|| FuzzError::Discovery("exit status 1".into()))
    }

    async fn discover_characteristic_descriptors(&self) -> Result<Vec<CharacteristicDescriptor>> {
        Ok(Vec::new())
    }

    async fn write(&self, handle: Handle, payload: &str) -> Result<WriteResponse> {
        let count = {
            let mut writes = self.writes.lock().unwrap();
            writes.push((handle, payload.to_string()));
            writes.len()
        };

        if let Some((limit, token)) = &self.cancel_after {
            if count >= *limit {
                token.cancel();
            }
        }

        match self.reject_from {
            Some(limit) if payload.len() >= limit => Ok(WriteResponse::new(1, REJECTED)),
            _ => Ok(WriteResponse::new(0, CONFIRMED)),
        }
    }

    async fn read(&self, handle: Handle) -> Result<String> {
        self.reads.lock().unwrap().push(handle);
        Ok("00".to_string())
    }

    async fn listen_for_notification(&self, _timeout: Duration) -> Result<Option<String>> {
        Ok(self.notification.clone())
    }
}

#[derive(Default)]
pub struct RecordingReporter {
    pub kind: Option<SweepKind>,
    pub attempts: Vec<Attempt>,
    pub notifications: Vec<(Handle, String)>,
    pub responses: Vec<(Handle, String)>,
    pub finished: Option<SweepStatus>,
}

impl Reporter for RecordingReporter {
    fn sweep_started(&mut self, kind: SweepKind, _ranges: &[ServiceRange]) {
        self.kind = Some(kind);
    }

    fn write_response(&mut self, handle: Handle, text: &str) {
        self.responses.push((handle, text.to_string()));
    }

    fn attempt_recorded(&mut self, attempt: &Attempt, _stats: &SweepStats) {
        self.attempts.push(attempt.clone());
    }

    fn notification(&mut self, handle: Handle, value: &str) {
        self.notifications.push((handle, value.to_string()));
    }

    fn sweep_finished(&mut self, status: SweepStatus, _summary: &Summary, _stats: &SweepStats) {
        self.finished = Some(status);
    }
}
