//! Concrete [`glizzy_core::transport::Transport`] adapters.
//!
//! All knowledge of how a BLE tool formats its output stays in here.

pub mod gatttool;

pub use gatttool::GattTool;
