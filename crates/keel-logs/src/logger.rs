//! The entity logger contract and the lazily opened log file behind it.
//!
//! This module provides:
//! - [`Logger`] - the write/close/cleanup capability shared by every sink
//! - [`WriteOutcome`] - the consumed-byte count plus an optional error
//! - [`log_dir_path`] / [`log_file_path`] - the single path derivation used
//!   by writers, readers and cleanup

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use crate::entry::LogEntry;
use crate::error::{LogError, Result};

/// Name of the log file inside each entity directory.
pub const LOG_FILE_NAME: &str = "log";

/// Directory holding all logs for one entity.
#[must_use]
pub fn log_dir_path(logs_dir: &Path, entity_id: &str) -> PathBuf {
    logs_dir.join(entity_id)
}

/// Log file for one entity: `<logs_dir>/<entity_id>/log`.
#[must_use]
pub fn log_file_path(logs_dir: &Path, entity_id: &str) -> PathBuf {
    log_dir_path(logs_dir, entity_id).join(LOG_FILE_NAME)
}

/// Outcome of a single logger write.
///
/// `consumed` is always the full length of the input, even when `error` is
/// set: a log line is either recorded or not, never partially.
#[derive(Debug)]
#[must_use]
pub struct WriteOutcome {
    consumed: usize,
    error: Option<LogError>,
}

impl WriteOutcome {
    /// A successful write of `consumed` bytes.
    pub const fn ok(consumed: usize) -> Self {
        Self {
            consumed,
            error: None,
        }
    }

    /// A failed write that still reports `consumed` bytes.
    pub const fn failed(consumed: usize, error: LogError) -> Self {
        Self {
            consumed,
            error: Some(error),
        }
    }

    /// Builds an outcome from the result of the underlying append.
    pub fn from_result(consumed: usize, result: Result<()>) -> Self {
        match result {
            Ok(()) => Self::ok(consumed),
            Err(err) => Self::failed(consumed, err),
        }
    }

    /// Number of input bytes reported as consumed.
    #[must_use]
    pub const fn consumed(&self) -> usize {
        self.consumed
    }

    /// The error, if the write failed.
    #[must_use]
    pub const fn error(&self) -> Option<&LogError> {
        self.error.as_ref()
    }

    /// Returns true if the write succeeded.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// Converts into a plain result, dropping the byte count on failure.
    pub fn into_result(self) -> Result<usize> {
        match self.error {
            None => Ok(self.consumed),
            Some(err) => Err(err),
        }
    }
}

/// A write sink bound to one entity.
///
/// Implementations are plain synchronous sinks driven by one writer at a
/// time. `dyn Logger` also implements [`io::Write`], so a boxed logger can be
/// handed to anything that expects a byte sink.
pub trait Logger: Send {
    /// Records `buf` as one log entry.
    ///
    /// The backing file is opened on the first call. The returned outcome
    /// always reports `buf.len()` bytes consumed.
    fn append(&mut self, buf: &[u8]) -> WriteOutcome;

    /// Closes the backing file if it is open.
    ///
    /// Calling `close` on a logger that is already closed is a no-op.
    fn close(&mut self) -> Result<()>;

    /// Deletes the entity's whole log directory.
    ///
    /// Succeeds if there is nothing to delete. Independent of open/close state.
    fn cleanup(&self) -> Result<()>;

    /// Path of the file this logger appends to.
    fn log_path(&self) -> PathBuf;
}

impl Write for dyn Logger + '_ {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(self.append(buf).into_result()?)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Lazily opened, append-only log file for one entity.
#[derive(Debug)]
pub(crate) struct LogFile {
    logs_dir: PathBuf,
    entity_id: String,
    file: Option<File>,
}

impl LogFile {
    /// Creates the handle without touching the filesystem.
    pub(crate) fn new(logs_dir: PathBuf, entity_id: String) -> Self {
        Self {
            logs_dir,
            entity_id,
            file: None,
        }
    }

    pub(crate) fn entity_id(&self) -> &str {
        &self.entity_id
    }

    pub(crate) fn path(&self) -> PathBuf {
        log_file_path(&self.logs_dir, &self.entity_id)
    }

    #[cfg(test)]
    pub(crate) const fn is_open(&self) -> bool {
        self.file.is_some()
    }

    /// Encodes `entry` and appends it, opening the file first if needed.
    pub(crate) fn append(&mut self, entry: &LogEntry) -> Result<()> {
        let file = self.file()?;
        let record = entry.encode()?;
        file.write_all(&record)?;
        Ok(())
    }

    pub(crate) fn close(&mut self) -> Result<()> {
        if let Some(file) = self.file.take() {
            file.sync_all()?;
            trace!(entity_id = %self.entity_id, "closed entity log");
        }
        Ok(())
    }

    pub(crate) fn cleanup(&self) -> Result<()> {
        let dir = log_dir_path(&self.logs_dir, &self.entity_id);
        match fs::remove_dir_all(&dir) {
            Ok(()) => {
                debug!(path = %dir.display(), "removed entity log directory");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn file(&mut self) -> Result<&mut File> {
        let file = match self.file.take() {
            Some(file) => file,
            None => self.open()?,
        };
        Ok(self.file.insert(file))
    }

    fn open(&self) -> Result<File> {
        let path = self.path();
        let dir = log_dir_path(&self.logs_dir, &self.entity_id);

        let mut builder = fs::DirBuilder::new();
        builder.recursive(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::DirBuilderExt;
            builder.mode(0o755);
        }
        builder.create(&dir)?;

        let mut options = OpenOptions::new();
        options.create(true).append(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o644);
        }
        let file = options.open(&path)?;

        debug!(path = %path.display(), "opened entity log");
        Ok(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::{LogSource, LOG_DELIMITER};
    use tempfile::TempDir;

    #[test]
    fn path_derivation_is_root_id_log() {
        let path = log_file_path(Path::new("/var/logs"), "ws-1");
        assert_eq!(path, PathBuf::from("/var/logs/ws-1/log"));
        assert_eq!(
            log_dir_path(Path::new("/var/logs"), "ws-1"),
            PathBuf::from("/var/logs/ws-1")
        );
    }

    #[test]
    fn log_file_opens_lazily() {
        let dir = TempDir::new().expect("create temp dir");
        let root = dir.path().join("logs");
        let mut log = LogFile::new(root.clone(), "e-1".to_string());

        assert!(!root.exists());
        assert!(!log.is_open());

        log.append(&LogEntry::new("hi", LogSource::Server))
            .expect("append");
        assert!(log.is_open());
        assert!(root.join("e-1").join("log").exists());
    }

    #[test]
    fn log_file_close_is_idempotent() {
        let dir = TempDir::new().expect("create temp dir");
        let mut log = LogFile::new(dir.path().to_path_buf(), "e-1".to_string());

        log.append(&LogEntry::new("hi", LogSource::Server))
            .expect("append");
        assert!(log.close().is_ok());
        assert!(!log.is_open());
        assert!(log.close().is_ok());
    }

    #[test]
    fn log_file_reopens_after_close() {
        let dir = TempDir::new().expect("create temp dir");
        let mut log = LogFile::new(dir.path().to_path_buf(), "e-1".to_string());

        log.append(&LogEntry::new("one", LogSource::Server))
            .expect("append");
        log.close().expect("close");
        log.append(&LogEntry::new("two", LogSource::Server))
            .expect("append");
        log.close().expect("close");

        let content = fs::read_to_string(log.path()).expect("read");
        assert_eq!(content.matches(LOG_DELIMITER).count(), 2);
    }

    #[test]
    fn log_file_open_failure_surfaces_io_error() {
        let dir = TempDir::new().expect("create temp dir");
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, b"not a directory").expect("write blocker");

        let mut log = LogFile::new(blocker, "e-1".to_string());
        let result = log.append(&LogEntry::new("hi", LogSource::Server));
        assert!(matches!(result, Err(LogError::Io(_))));
        assert!(!log.is_open());
    }

    #[test]
    fn write_outcome_keeps_count_on_failure() {
        let outcome = WriteOutcome::failed(12, LogError::Connection("down".into()));
        assert_eq!(outcome.consumed(), 12);
        assert!(!outcome.is_ok());
        assert!(outcome.error().is_some());
        assert!(outcome.into_result().is_err());

        let outcome = WriteOutcome::from_result(5, Ok(()));
        assert!(outcome.is_ok());
        assert_eq!(outcome.into_result().expect("ok"), 5);
    }

    #[cfg(unix)]
    #[test]
    fn log_file_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().expect("create temp dir");
        let mut log = LogFile::new(dir.path().to_path_buf(), "e-1".to_string());
        log.append(&LogEntry::new("hi", LogSource::Server))
            .expect("append");

        let mode = fs::metadata(log.path()).expect("metadata").permissions().mode();
        assert_eq!(mode & 0o022, 0, "log file must not be group/world writable");
        assert_ne!(mode & 0o200, 0, "log file must be owner writable");
    }
}
