//! Logger scoped to a single target.

use std::path::PathBuf;

use crate::entry::{LogEntry, LogSource};
use crate::error::Result;
use crate::logger::{LogFile, Logger, WriteOutcome};

/// Appends records for one target under the target logs directory.
#[derive(Debug)]
pub struct TargetLogger {
    log: LogFile,
    target_name: String,
    source: LogSource,
}

impl TargetLogger {
    pub(crate) fn new(
        logs_dir: PathBuf,
        target_id: String,
        target_name: String,
        source: LogSource,
    ) -> Self {
        Self {
            log: LogFile::new(logs_dir, target_id),
            target_name,
            source,
        }
    }

    /// The target this logger is bound to.
    #[must_use]
    pub fn target_id(&self) -> &str {
        self.log.entity_id()
    }

    /// The display name embedded in each record.
    #[must_use]
    pub fn target_name(&self) -> &str {
        &self.target_name
    }
}

impl Logger for TargetLogger {
    fn append(&mut self, buf: &[u8]) -> WriteOutcome {
        let entry = LogEntry::from_bytes(buf, self.source).with_target_name(&self.target_name);
        WriteOutcome::from_result(buf.len(), self.log.append(&entry))
    }

    fn close(&mut self) -> Result<()> {
        self.log.close()
    }

    fn cleanup(&self) -> Result<()> {
        self.log.cleanup()
    }

    fn log_path(&self) -> PathBuf {
        self.log.path()
    }
}
