//! # Glizzy Common
//!
//! Shared domain model for the GATT handle fuzzer.
//!
//! * **[`gatt`]**: handles, handle ranges, service ranges and characteristic properties.
//! * **[`attempt`]**: the record of a single write or read against a handle.
//! * **[`config`]**: the immutable run configuration.
//! * **[`error`]**: the error taxonomy shared by every crate in the workspace.

pub mod attempt;
pub mod config;
pub mod error;
pub mod gatt;

#[doc(hidden)]
pub use tracing as __tracing;

/// Prints a raw line, without any status prefix.
#[macro_export]
macro_rules! plain {
    ($($arg:tt)*) => {
        $crate::__tracing::info!(target: "glizzy::print", "{}", format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! success {
    ($($arg:tt)*) => {
        $crate::__tracing::info!(target: "glizzy::success", "{}", format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        $crate::__tracing::info!("{}", format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        $crate::__tracing::warn!("{}", format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {
        $crate::__tracing::error!("{}", format_args!($($arg)*))
    };
}
