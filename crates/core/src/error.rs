// Central Error Type for the Pool

use thiserror::Error;

/// Pool-level error type
#[derive(Error, Debug)]
pub enum PoolError {
    /// Invalid pool configuration; the pool never starts
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to spawn worker thread: {0}")]
    Spawn(#[source] std::io::Error),
}

/// Result type alias using PoolError
pub type Result<T> = std::result::Result<T, PoolError>;
