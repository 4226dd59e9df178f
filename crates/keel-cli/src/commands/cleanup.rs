//! Cleanup command implementation.

use std::io::Write;
use std::path::PathBuf;

use keel_logs::{EntityKind, LogSource, LoggerFactory};
use serde::Serialize;
use tracing::info;

use super::create_logger;
use crate::cli::EntityArgs;
use crate::error::CliError;
use crate::output::{OutputFormat, TextDisplay};

/// Handler for the cleanup command.
pub struct CleanupCommand<'a> {
    factory: &'a dyn LoggerFactory,
}

impl<'a> CleanupCommand<'a> {
    /// Creates a new cleanup command handler.
    #[must_use]
    pub const fn new(factory: &'a dyn LoggerFactory) -> Self {
        Self { factory }
    }

    /// Deletes the entity's log directory. Missing logs are not an error.
    pub fn execute<W: Write>(
        &self,
        out: &mut W,
        format: &OutputFormat,
        args: &EntityArgs,
    ) -> Result<(), CliError> {
        let kind = EntityKind::from(args.kind);
        // Loggers open lazily, so this touches nothing on disk.
        let logger = create_logger(self.factory, kind, &args.id, None, LogSource::Server)?;
        logger.cleanup()?;

        let dir = logger
            .log_path()
            .parent()
            .map_or_else(|| logger.log_path(), PathBuf::from);
        info!(%kind, id = %args.id, dir = %dir.display(), "Removed entity logs");

        let summary = CleanupSummary {
            kind: kind.as_str(),
            id: args.id.clone(),
            removed: dir,
        };
        format.write(out, &summary)
    }
}

/// Result of a cleanup command.
#[derive(Debug, Clone, Serialize)]
pub struct CleanupSummary {
    /// Entity kind.
    pub kind: &'static str,
    /// Entity id.
    pub id: String,
    /// Directory that no longer exists.
    pub removed: PathBuf,
}

impl TextDisplay for CleanupSummary {
    fn write_text<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        writeln!(
            writer,
            "removed logs of {} {} ({})",
            self.kind,
            self.id,
            self.removed.display()
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::KindArg;
    use keel_logs::{log_dir_path, LocalLoggerFactory};
    use tempfile::TempDir;

    fn make_factory() -> (LocalLoggerFactory, TempDir) {
        let dir = TempDir::new().expect("create temp dir");
        let factory = LocalLoggerFactory::new(dir.path().join("targets"), dir.path().join("builds"));
        (factory, dir)
    }

    fn build_args() -> EntityArgs {
        EntityArgs {
            kind: KindArg::Build,
            id: "b-1".into(),
        }
    }

    #[test]
    fn cleanup_removes_entity_directory() {
        let (factory, dir) = make_factory();
        let mut logger = factory
            .create_build_logger("b-1", LogSource::Build)
            .expect("logger");
        assert!(logger.append(b"x").is_ok());
        logger.close().expect("close");

        let mut out = Vec::new();
        CleanupCommand::new(&factory)
            .execute(&mut out, &OutputFormat::default(), &build_args())
            .expect("cleanup");

        assert!(!log_dir_path(&dir.path().join("builds"), "b-1").exists());
        let out = String::from_utf8(out).expect("utf-8");
        assert!(out.starts_with("removed logs of build b-1"));
    }

    #[test]
    fn cleanup_twice_is_ok() {
        let (factory, _dir) = make_factory();
        let cmd = CleanupCommand::new(&factory);
        let mut out = Vec::new();
        cmd.execute(&mut out, &OutputFormat::default(), &build_args())
            .expect("first cleanup");
        cmd.execute(&mut out, &OutputFormat::default(), &build_args())
            .expect("second cleanup");
    }
}
