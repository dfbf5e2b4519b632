//! The **abstraction** over the BLE stack.
//!
//! High-level modules depend on this trait only. Concrete adapters (process
//! drivers, native stacks, test doubles) live outside the core and own every
//! detail of how the device is reached and how its answers are parsed.

use std::time::Duration;

use async_trait::async_trait;
use glizzy_common::error::Result;
use glizzy_common::gatt::{CharacteristicDescriptor, Handle, ServiceRange};

/// Raw result of a write request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteResponse {
    pub exit_status: i32,
    pub text: String,
}

impl WriteResponse {
    pub fn new(exit_status: i32, text: impl Into<String>) -> Self {
        Self {
            exit_status,
            text: text.into(),
        }
    }
}

/// Substrings a transport uses to signal how a write went.
///
/// `confirmed` is matched as-is, `length_rejected` case-insensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseMarkers {
    pub confirmed: &'static str,
    pub length_rejected: &'static str,
}

/// A connection to one target device.
///
/// Each call blocks the sweep until it returns; no call is retried by the core.
#[async_trait]
pub trait Transport: Send + Sync {
    fn markers(&self) -> ResponseMarkers;

    /// Lists the primary services of the device.
    ///
    /// Fails with [`glizzy_common::error::FuzzError::Discovery`] when the
    /// device cannot be enumerated.
    async fn discover_primary_services(&self) -> Result<Vec<ServiceRange>>;

    async fn discover_characteristic_descriptors(&self) -> Result<Vec<CharacteristicDescriptor>>;

    async fn write(&self, handle: Handle, payload: &str) -> Result<WriteResponse>;

    async fn read(&self, handle: Handle) -> Result<String>;

    /// Waits up to `timeout` for a notification. `None` when nothing arrived.
    async fn listen_for_notification(&self, timeout: Duration) -> Result<Option<String>>;
}
