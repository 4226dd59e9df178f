//! Error types for the logging system.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while writing, reading, or streaming entity logs.
#[derive(Debug, Error)]
pub enum LogError {
    /// Creating, opening, writing, or closing a log file failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A log record could not be serialized or deserialized.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The remote log collector could not be reached or a frame could not be sent.
    #[error("remote connection error: {0}")]
    Connection(String),

    /// The operation is not available on this factory.
    #[error("not supported: {0}")]
    NotSupported(&'static str),

    /// No log has ever been written for the requested entity.
    #[error("log not found: {}", path.display())]
    NotFound {
        /// Path that was expected to hold the log.
        path: PathBuf,
    },

    /// The entity id cannot be used as a single path component.
    #[error("invalid entity id: {0:?}")]
    InvalidEntityId(String),

    /// Invalid logging configuration.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type alias for log operations.
pub type Result<T> = std::result::Result<T, LogError>;

impl From<LogError> for io::Error {
    fn from(err: LogError) -> Self {
        match err {
            LogError::Io(inner) => inner,
            LogError::NotFound { .. } => Self::new(io::ErrorKind::NotFound, err),
            LogError::NotSupported(_) => Self::new(io::ErrorKind::Unsupported, err),
            other => Self::other(other),
        }
    }
}
