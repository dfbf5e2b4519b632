//! Records of individual operations against a handle.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::gatt::Handle;

/// How the device reacted to a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    /// The write was confirmed by the device.
    Success,
    /// Anything that was neither confirmed nor a length rejection.
    Failure,
    /// The device rejected the value length. Expected, not an error.
    Ambiguous,
}

impl Outcome {
    pub fn is_success(self) -> bool {
        matches!(self, Outcome::Success)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Outcome::Success => "success",
            Outcome::Failure => "failure",
            Outcome::Ambiguous => "ambiguous",
        };
        f.write_str(label)
    }
}

/// One recorded operation. Immutable once pushed into a result set.
///
/// Write attempts carry a length, payload, outcome and exit status. Read-only
/// records only carry the handle, an outcome and the value that was read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attempt {
    pub handle: Handle,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<String>,
    pub outcome: Outcome,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "exit")]
    pub exit_status: Option<i32>,
    #[serde(default)]
    pub readback: Option<String>,
}

impl Attempt {
    pub fn write(
        handle: Handle,
        length: usize,
        payload: impl Into<String>,
        outcome: Outcome,
        exit_status: i32,
    ) -> Self {
        Self {
            handle,
            length: Some(length),
            payload: Some(payload.into()),
            outcome,
            exit_status: Some(exit_status),
            readback: None,
        }
    }

    /// A write that never reached the device because the transport call
    /// itself could not be made.
    pub fn unreachable(handle: Handle, length: usize, payload: impl Into<String>) -> Self {
        Self {
            handle,
            length: Some(length),
            payload: Some(payload.into()),
            outcome: Outcome::Failure,
            exit_status: None,
            readback: None,
        }
    }

    pub fn read(handle: Handle, value: impl Into<String>) -> Self {
        Self {
            handle,
            length: None,
            payload: None,
            outcome: Outcome::Success,
            exit_status: None,
            readback: Some(value.into()),
        }
    }

    pub fn failed_read(handle: Handle) -> Self {
        Self {
            handle,
            length: None,
            payload: None,
            outcome: Outcome::Failure,
            exit_status: None,
            readback: None,
        }
    }

    pub fn with_readback(mut self, readback: Option<String>) -> Self {
        self.readback = readback;
        self
    }

    pub fn is_write(&self) -> bool {
        self.length.is_some()
    }
}
