//! Configuration error types.

use thiserror::Error;

/// Errors that can occur when loading or saving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read or write the config file.
    #[error("config io error: {0}")]
    Io(#[from] std::io::Error),

    /// The persisted document does not parse.
    #[error("config document corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),

    /// Config lock was poisoned.
    #[error("config lock poisoned")]
    LockPoisoned,
}
