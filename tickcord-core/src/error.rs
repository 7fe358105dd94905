//! Error types for tickcord

use thiserror::Error;

/// The main error type for tickcord operations
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Gateway session errors (connect, identify, protocol)
    #[error("Gateway error: {0}")]
    Gateway(String),

    /// Outbound send errors
    #[error("Send error: {0}")]
    Send(String),

    /// Authorization failure on a single send
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for tickcord operations
pub type Result<T> = std::result::Result<T, Error>;

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
