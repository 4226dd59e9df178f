//! Log record shape and its on-disk framing.
//!
//! Every persisted record is a JSON object immediately followed by
//! [`LOG_DELIMITER`]. A log file is therefore a concatenation of
//! independently parseable objects, never a JSON array.

use std::fmt;

use chrono::{Local, SecondsFormat};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Terminator written after every encoded record.
pub const LOG_DELIMITER: &str = "!-#_^*|\n";

/// Origin classification of a log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogSource {
    /// The Keel server itself
    Server,
    /// A target provider plugin
    Provider,
    /// The image builder
    #[serde(alias = "builder")]
    Build,
}

impl LogSource {
    /// Returns the string representation of this source.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Server => "server",
            Self::Provider => "provider",
            Self::Build => "build",
        }
    }
}

impl fmt::Display for LogSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One structured log record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    /// Where the line came from
    pub source: LogSource,
    /// Display name of the workspace, only on workspace-scoped records
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspace_name: Option<String>,
    /// Display name of the target, only on target-scoped records
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_name: Option<String>,
    /// Raw payload of the write that produced this record
    pub msg: String,
    /// Creation time, RFC 3339 with second precision
    pub time: String,
}

impl LogEntry {
    /// Creates a record stamped with the current local time.
    #[must_use]
    pub fn new(msg: impl Into<String>, source: LogSource) -> Self {
        Self {
            source,
            workspace_name: None,
            target_name: None,
            msg: msg.into(),
            time: timestamp_now(),
        }
    }

    /// Creates a record from the bytes handed to a logger write.
    ///
    /// Invalid UTF-8 sequences are replaced with U+FFFD.
    #[must_use]
    pub fn from_bytes(buf: &[u8], source: LogSource) -> Self {
        Self::new(String::from_utf8_lossy(buf), source)
    }

    /// Sets the workspace display name.
    #[must_use]
    pub fn with_workspace_name(mut self, name: impl Into<String>) -> Self {
        self.workspace_name = Some(name.into());
        self
    }

    /// Sets the target display name.
    #[must_use]
    pub fn with_target_name(mut self, name: impl Into<String>) -> Self {
        self.target_name = Some(name.into());
        self
    }

    /// Encodes the record as a JSON object followed by [`LOG_DELIMITER`].
    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut bytes = serde_json::to_vec(self)?;
        bytes.extend_from_slice(LOG_DELIMITER.as_bytes());
        Ok(bytes)
    }

    /// Decodes a single record body with the delimiter already stripped.
    pub fn decode(body: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(body)?)
    }
}

/// Current local time in the record timestamp format.
#[must_use]
pub fn timestamp_now() -> String {
    Local::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}
