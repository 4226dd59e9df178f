//! CLI error types.

use keel_logs::LogError;
use thiserror::Error;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// A logging operation failed.
    #[error(transparent)]
    Logs(#[from] LogError),

    /// Invalid configuration or flag combination.
    #[error("configuration error: {0}")]
    Config(String),

    /// Output formatting failed.
    #[error("format error: {0}")]
    Format(#[from] serde_json::Error),

    /// Reading input or writing output failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
