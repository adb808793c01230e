//! Error types for BDK

use thiserror::Error;

/// Result type alias for BDK operations
pub type Result<T> = std::result::Result<T, BdkError>;

/// Main error type for BDK
#[derive(Error, Debug)]
pub enum BdkError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Flush failed: {0}")]
    Flush(#[source] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl BdkError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
