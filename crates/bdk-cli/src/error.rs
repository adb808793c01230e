//! Error types for BDK CLI
//!
//! Messages are shown to the user as-is, so they say what to fix.

use thiserror::Error;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Error type for CLI operations
#[derive(Error, Debug)]
pub enum CliError {
    /// Sink could not be opened or its final flush failed
    #[error("Sink error: {0}")]
    Sink(#[from] bdk_common::BdkError),

    /// Reading input or opening the output failed
    #[error("File operation failed: {0}. Check file permissions and disk space.")]
    Io(#[from] std::io::Error),

    /// A value did not pass the requested check
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Option values that cannot be used together or are out of range
    #[error("Invalid argument: {0}. See '--help' for accepted values.")]
    InvalidArgument(String),

    /// Stats could not be serialized
    #[error("Failed to serialize JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic anyhow error wrapper
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CliError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create an invalid argument error
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }
}
