//! Logger scoped to a single build.

use std::path::PathBuf;

use crate::entry::{LogEntry, LogSource};
use crate::error::Result;
use crate::logger::{LogFile, Logger, WriteOutcome};

/// Appends records for one build under the build logs directory.
///
/// Build records carry no display name.
#[derive(Debug)]
pub struct BuildLogger {
    log: LogFile,
    source: LogSource,
}

impl BuildLogger {
    pub(crate) fn new(logs_dir: PathBuf, build_id: String, source: LogSource) -> Self {
        Self {
            log: LogFile::new(logs_dir, build_id),
            source,
        }
    }

    /// The build this logger is bound to.
    #[must_use]
    pub fn build_id(&self) -> &str {
        self.log.entity_id()
    }
}

impl Logger for BuildLogger {
    fn append(&mut self, buf: &[u8]) -> WriteOutcome {
        let entry = LogEntry::from_bytes(buf, self.source);
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
