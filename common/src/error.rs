use thiserror::Error;

/// Errors raised while resolving targets, talking to the device, or saving results.
///
/// Discovery and filter errors abort the run before any write is sent. Transport
/// errors during the sweep are recorded as failed attempts and never abort it.
#[derive(Error, Debug)]
pub enum FuzzError {
    #[error("Service discovery failed: {0}")]
    Discovery(String),

    #[error("No services matching UUID {0}")]
    Filter(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Invalid handle range: {0}")]
    InvalidRange(String),

    #[error("Could not persist results: {0}")]
    Persist(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, FuzzError>;
