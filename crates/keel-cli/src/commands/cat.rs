//! Cat command implementation.

use std::io::Write;

use keel_logs::{read_entries, EntityKind, LoggerFactory};

use super::open_reader;
use crate::cli::EntityArgs;
use crate::error::CliError;
use crate::output::OutputFormat;

/// Handler for the cat command.
pub struct CatCommand<'a> {
    factory: &'a dyn LoggerFactory,
}

impl<'a> CatCommand<'a> {
    /// Creates a new cat command handler.
    #[must_use]
    pub const fn new(factory: &'a dyn LoggerFactory) -> Self {
        Self { factory }
    }

    /// Prints every stored record of the entity in order.
    pub fn execute<W: Write>(
        &self,
        out: &mut W,
        format: &OutputFormat,
        args: &EntityArgs,
    ) -> Result<(), CliError> {
        let reader = open_reader(self.factory, EntityKind::from(args.kind), &args.id)?;
        for entry in read_entries(reader) {
            format.write(out, &entry?)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Format, KindArg};
    use keel_logs::{LocalLoggerFactory, LogError, LogSource};
    use tempfile::TempDir;

    fn make_factory() -> (LocalLoggerFactory, TempDir) {
        let dir = TempDir::new().expect("create temp dir");
        let factory = LocalLoggerFactory::new(dir.path().join("targets"), dir.path().join("builds"));
        (factory, dir)
    }

    fn target_args() -> EntityArgs {
        EntityArgs {
            kind: KindArg::Target,
            id: "t-1".into(),
        }
    }

    #[test]
    fn cat_prints_records_in_order() {
        let (factory, _dir) = make_factory();
        let mut logger = factory
            .create_target_logger("t-1", "local", LogSource::Provider)
            .expect("logger");
        assert!(logger.append(b"first").is_ok());
        assert!(logger.append(b"second").is_ok());
        logger.close().expect("close");

        let mut out = Vec::new();
        CatCommand::new(&factory)
            .execute(&mut out, &OutputFormat::default(), &target_args())
            .expect("cat");

        let out = String::from_utf8(out).expect("utf-8");
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("[provider] local: first"));
        assert!(lines[1].ends_with("[provider] local: second"));
    }

    #[test]
    fn cat_json_emits_records() {
        let (factory, _dir) = make_factory();
        let mut logger = factory
            .create_target_logger("t-1", "local", LogSource::Provider)
            .expect("logger");
        assert!(logger.append(b"only").is_ok());
        logger.close().expect("close");

        let mut out = Vec::new();
        CatCommand::new(&factory)
            .execute(&mut out, &OutputFormat::new(Format::Json), &target_args())
            .expect("cat");

        let record: serde_json::Value = serde_json::from_slice(&out).expect("json");
        assert_eq!(record["msg"], "only");
        assert_eq!(record["targetName"], "local");
    }

    #[test]
    fn cat_missing_log_is_not_found() {
        let (factory, _dir) = make_factory();
        let mut out = Vec::new();
        let err = CatCommand::new(&factory)
            .execute(&mut out, &OutputFormat::default(), &target_args())
            .expect_err("missing");
        assert!(matches!(err, CliError::Logs(LogError::NotFound { .. })));
    }
}
