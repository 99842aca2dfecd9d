//! Error types for Pulseboard

use thiserror::Error;

/// Top-level error type
#[derive(Error, Debug)]
pub enum PulseError {
    /// Database connection or query failure
    #[error("Database error: {0}")]
    Database(String),

    /// Authentication or token failure
    #[error("Auth error: {0}")]
    Auth(String),

    /// HTTP request handling failure (bad body, oversized payload)
    #[error("HTTP error: {0}")]
    Http(String),

    /// Insight service failure (network, non-2xx, malformed body)
    #[error("Insight error: {0}")]
    Insight(String),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result alias
pub type Result<T> = std::result::Result<T, PulseError>;
