//! Construction of entity loggers and readers.
//!
//! A [`LoggerFactory`] is injected once at process start and hands out
//! loggers addressed by entity id. [`LocalLoggerFactory`] keeps two
//! independent storage roots: one shared by targets and workspaces, one for
//! builds.

use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use crate::build::BuildLogger;
use crate::entry::LogSource;
use crate::error::{LogError, Result};
use crate::logger::{log_file_path, Logger};
use crate::target::TargetLogger;
use crate::workspace::WorkspaceLogger;

/// Produces loggers and readers scoped to a single entity.
pub trait LoggerFactory: Send + Sync {
    /// Creates a logger for a workspace.
    fn create_workspace_logger(
        &self,
        workspace_id: &str,
        workspace_name: &str,
        source: LogSource,
    ) -> Result<Box<dyn Logger>>;

    /// Creates a logger for a target.
    fn create_target_logger(
        &self,
        target_id: &str,
        target_name: &str,
        source: LogSource,
    ) -> Result<Box<dyn Logger>>;

    /// Creates a logger for a build.
    fn create_build_logger(&self, build_id: &str, source: LogSource) -> Result<Box<dyn Logger>>;

    /// Opens the workspace log for sequential reading.
    fn create_workspace_log_reader(&self, workspace_id: &str) -> Result<Box<dyn Read + Send>>;

    /// Opens the target log for sequential reading.
    fn create_target_log_reader(&self, target_id: &str) -> Result<Box<dyn Read + Send>>;

    /// Opens the build log for sequential reading.
    fn create_build_log_reader(&self, build_id: &str) -> Result<Box<dyn Read + Send>>;
}

/// Rejects ids that would not map to exactly one directory under a root.
pub fn validate_entity_id(entity_id: &str) -> Result<()> {
    let invalid = entity_id.is_empty()
        || entity_id == "."
        || entity_id == ".."
        || entity_id.contains(['/', '\\', '\0']);
    if invalid {
        return Err(LogError::InvalidEntityId(entity_id.to_string()));
    }
    Ok(())
}

/// Factory writing logs to the local filesystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalLoggerFactory {
    target_logs_dir: PathBuf,
    build_logs_dir: PathBuf,
}

impl LocalLoggerFactory {
    /// Creates a factory over the given storage roots.
    ///
    /// Neither directory is created until a logger writes to it.
    #[must_use]
    pub fn new(target_logs_dir: impl Into<PathBuf>, build_logs_dir: impl Into<PathBuf>) -> Self {
        Self {
            target_logs_dir: target_logs_dir.into(),
            build_logs_dir: build_logs_dir.into(),
        }
    }

    /// Root for target and workspace logs.
    #[must_use]
    pub fn target_logs_dir(&self) -> &Path {
        &self.target_logs_dir
    }

    /// Root for build logs.
    #[must_use]
    pub fn build_logs_dir(&self) -> &Path {
        &self.build_logs_dir
    }

    /// Creates a concrete workspace logger.
    pub fn workspace_logger(
        &self,
        workspace_id: &str,
        workspace_name: &str,
        source: LogSource,
    ) -> Result<WorkspaceLogger> {
        validate_entity_id(workspace_id)?;
        Ok(WorkspaceLogger::new(
            self.target_logs_dir.clone(),
            workspace_id.to_string(),
            workspace_name.to_string(),
            source,
        ))
    }

    /// Creates a concrete target logger.
    pub fn target_logger(
        &self,
        target_id: &str,
        target_name: &str,
        source: LogSource,
    ) -> Result<TargetLogger> {
        validate_entity_id(target_id)?;
        Ok(TargetLogger::new(
            self.target_logs_dir.clone(),
            target_id.to_string(),
            target_name.to_string(),
            source,
        ))
    }

    /// Creates a concrete build logger.
    pub fn build_logger(&self, build_id: &str, source: LogSource) -> Result<BuildLogger> {
        validate_entity_id(build_id)?;
        Ok(BuildLogger::new(
            self.build_logs_dir.clone(),
            build_id.to_string(),
            source,
        ))
    }
}

fn open_log(logs_dir: &Path, entity_id: &str) -> Result<Box<dyn Read + Send>> {
    validate_entity_id(entity_id)?;
    let path = log_file_path(logs_dir, entity_id);
    match File::open(&path) {
        Ok(file) => Ok(Box::new(file)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Err(LogError::NotFound { path }),
        Err(e) => Err(e.into()),
    }
}

impl LoggerFactory for LocalLoggerFactory {
    fn create_workspace_logger(
        &self,
        workspace_id: &str,
        workspace_name: &str,
        source: LogSource,
    ) -> Result<Box<dyn Logger>> {
        Ok(Box::new(self.workspace_logger(workspace_id, workspace_name, source)?))
    }

    fn create_target_logger(
        &self,
        target_id: &str,
        target_name: &str,
        source: LogSource,
    ) -> Result<Box<dyn Logger>> {
        Ok(Box::new(self.target_logger(target_id, target_name, source)?))
    }

    fn create_build_logger(&self, build_id: &str, source: LogSource) -> Result<Box<dyn Logger>> {
        Ok(Box::new(self.build_logger(build_id, source)?))
    }

    fn create_workspace_log_reader(&self, workspace_id: &str) -> Result<Box<dyn Read + Send>> {
        open_log(&self.target_logs_dir, workspace_id)
    }

    fn create_target_log_reader(&self, target_id: &str) -> Result<Box<dyn Read + Send>> {
        open_log(&self.target_logs_dir, target_id)
    }

    fn create_build_log_reader(&self, build_id: &str) -> Result<Box<dyn Read + Send>> {
        open_log(&self.build_logs_dir, build_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::LOG_DELIMITER;
    use crate::reader::read_entries;
    use std::io::Write;
    use tempfile::TempDir;
    use test_case::test_case;

    fn make_factory() -> (LocalLoggerFactory, TempDir) {
        let dir = TempDir::new().expect("create temp dir");
        let factory = LocalLoggerFactory::new(dir.path().join("targets"), dir.path().join("builds"));
        (factory, dir)
    }

    #[test]
    fn construction_performs_no_io() {
        let (factory, dir) = make_factory();

        let _ws = factory
            .create_workspace_logger("ws-1", "ws", LogSource::Server)
            .expect("workspace logger");
        let _target = factory
            .create_target_logger("t-1", "t", LogSource::Server)
            .expect("target logger");
        let _build = factory
            .create_build_logger("b-1", LogSource::Build)
            .expect("build logger");

        assert!(!dir.path().join("targets").exists());
        assert!(!dir.path().join("builds").exists());
    }

    #[test]
    fn roots_are_selected_by_kind() {
        let (factory, dir) = make_factory();

        let mut ws = factory
            .create_workspace_logger("ws-1", "ws", LogSource::Server)
            .expect("workspace logger");
        let mut build = factory
            .create_build_logger("b-1", LogSource::Build)
            .expect("build logger");
        assert!(ws.append(b"ws line").is_ok());
        assert!(build.append(b"build line").is_ok());
        ws.close().expect("close");
        build.close().expect("close");

        assert!(dir.path().join("targets/ws-1/log").exists());
        assert!(dir.path().join("builds/b-1/log").exists());
        assert!(!dir.path().join("targets/b-1").exists());
    }

    #[test]
    fn reader_returns_written_bytes() {
        let (factory, _dir) = make_factory();

        let mut logger = factory
            .create_build_logger("b-1", LogSource::Build)
            .expect("build logger");
        assert!(logger.append(b"build started").is_ok());
        logger.close().expect("close");

        let on_disk = std::fs::read(logger.log_path()).expect("read file");
        let mut reader = factory.create_build_log_reader("b-1").expect("reader");
        let mut read_back = Vec::new();
        reader.read_to_end(&mut read_back).expect("read");

        assert_eq!(read_back, on_disk);
        assert!(read_back.ends_with(LOG_DELIMITER.as_bytes()));
    }

    #[test]
    fn same_id_addresses_same_file() {
        let (factory, _dir) = make_factory();

        let mut first = factory
            .create_target_logger("t-1", "t", LogSource::Server)
            .expect("first");
        let mut second = factory
            .create_target_logger("t-1", "t", LogSource::Provider)
            .expect("second");
        assert_eq!(first.log_path(), second.log_path());

        assert!(first.append(b"from first").is_ok());
        first.close().expect("close");
        assert!(second.append(b"from second").is_ok());
        second.close().expect("close");

        let reader = factory.create_target_log_reader("t-1").expect("reader");
        let messages: Vec<String> = read_entries(reader)
            .map(|e| e.expect("decode").msg)
            .collect();
        assert_eq!(messages, vec!["from first", "from second"]);
    }

    #[test]
    fn reader_for_unknown_entity_is_not_found() {
        let (factory, _dir) = make_factory();

        assert!(matches!(
            factory.create_workspace_log_reader("never-written"),
            Err(LogError::NotFound { .. })
        ));
        assert!(matches!(
            factory.create_target_log_reader("never-written"),
            Err(LogError::NotFound { .. })
        ));
        assert!(matches!(
            factory.create_build_log_reader("never-written"),
            Err(LogError::NotFound { .. })
        ));
    }

    #[test]
    fn workspace_reader_uses_target_root() {
        let (factory, _dir) = make_factory();

        let mut logger = factory
            .create_workspace_logger("ws-7", "seven", LogSource::Server)
            .expect("logger");
        assert!(logger.append(b"hello").is_ok());
        logger.close().expect("close");

        assert!(factory.create_workspace_log_reader("ws-7").is_ok());
        assert!(factory.create_build_log_reader("ws-7").is_err());
    }

    #[test]
    fn boxed_logger_is_an_io_writer() {
        let (factory, _dir) = make_factory();

        let mut logger = factory
            .create_build_logger("b-io", LogSource::Build)
            .expect("logger");
        logger.write_all(b"via io::Write").expect("write_all");
        logger.flush().expect("flush");
        logger.close().expect("close");

        let reader = factory.create_build_log_reader("b-io").expect("reader");
        let entries: Vec<_> = read_entries(reader).collect();
        assert_eq!(entries.len(), 1);
    }

    #[test_case(""; "empty")]
    #[test_case("."; "dot")]
    #[test_case(".."; "parent")]
    #[test_case("a/b"; "slash")]
    #[test_case("a\\b"; "backslash")]
    fn invalid_entity_ids_are_rejected(id: &str) {
        let (factory, _dir) = make_factory();
        assert!(matches!(
            factory.create_build_logger(id, LogSource::Build),
            Err(LogError::InvalidEntityId(_))
        ));
        assert!(matches!(
            factory.create_build_log_reader(id),
            Err(LogError::InvalidEntityId(_))
        ));
    }

    #[test]
    fn accessors_expose_roots() {
        let factory = LocalLoggerFactory::new("/t", "/b");
        assert_eq!(factory.target_logs_dir(), Path::new("/t"));
        assert_eq!(factory.build_logs_dir(), Path::new("/b"));
    }
}
