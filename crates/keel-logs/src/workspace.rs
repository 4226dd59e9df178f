//! Logger scoped to a single workspace.

use std::path::PathBuf;

use crate::entry::{LogEntry, LogSource};
use crate::error::Result;
use crate::logger::{LogFile, Logger, WriteOutcome};

/// Appends records for one workspace under the target logs directory.
///
/// Every record carries the workspace display name.
#[derive(Debug)]
pub struct WorkspaceLogger {
    log: LogFile,
    workspace_name: String,
    source: LogSource,
}

impl WorkspaceLogger {
    /// Creates the logger. No filesystem access happens until the first write.
    pub(crate) fn new(
        logs_dir: PathBuf,
        workspace_id: String,
        workspace_name: String,
        source: LogSource,
    ) -> Self {
        Self {
            log: LogFile::new(logs_dir, workspace_id),
            workspace_name,
            source,
        }
    }

    /// The workspace this logger is bound to.
    #[must_use]
    pub fn workspace_id(&self) -> &str {
        self.log.entity_id()
    }

    /// The display name embedded in each record.
    #[must_use]
    pub fn workspace_name(&self) -> &str {
        &self.workspace_name
    }
}

impl Logger for WorkspaceLogger {
    fn append(&mut self, buf: &[u8]) -> WriteOutcome {
        let entry = LogEntry::from_bytes(buf, self.source).with_workspace_name(&self.workspace_name);
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
