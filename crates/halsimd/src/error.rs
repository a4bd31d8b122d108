//! Error types for halsimd

use p4hal_types::HalError;
use thiserror::Error;

/// Daemon-level errors, wrapping the HAL taxonomy for service operations.
#[derive(Error, Debug)]
pub enum HalSimError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A service operation failed with a typed HAL error
    #[error(transparent)]
    Hal(#[from] HalError),
}

/// Result type for halsimd operations
pub type Result<T> = std::result::Result<T, HalSimError>;
