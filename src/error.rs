//! Error handling for the portcheck prober
//!
//! Only conditions that stop a run before or outside of probing are errors.
//! A port that refuses or ignores a connection is a [`PortState`], not an error.
//!
//! [`PortState`]: crate::network::PortState

use thiserror::Error;

/// Main error type for probe runs
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Invalid target: {0}")]
    InvalidTarget(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Worker pool error: {0}")]
    PoolError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type alias for scan operations
pub type ScanResult<T> = Result<T, ScanError>;

impl From<tokio::sync::AcquireError> for ScanError {
    fn from(e: tokio::sync::AcquireError) -> Self {
        ScanError::PoolError(e.to_string())
    }
}
