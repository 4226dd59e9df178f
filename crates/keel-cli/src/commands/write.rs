//! Write command implementation.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use keel_logs::{EntityKind, Logger, LoggerFactory};
use serde::Serialize;
use tracing::{debug, warn};

use super::create_logger;
use crate::cli::WriteArgs;
use crate::error::CliError;
use crate::output::{OutputFormat, TextDisplay};

/// Handler for the write command.
pub struct WriteCommand<'a> {
    factory: &'a dyn LoggerFactory,
}

impl<'a> WriteCommand<'a> {
    /// Creates a new write command handler.
    #[must_use]
    pub const fn new(factory: &'a dyn LoggerFactory) -> Self {
        Self { factory }
    }

    /// Appends every line of `input` as one record, then closes the logger.
    ///
    /// Line terminators are stripped. The logger is closed even when a write
    /// fails; the first error is returned.
    pub fn execute<R: BufRead, W: Write>(
        &self,
        mut input: R,
        out: &mut W,
        format: &OutputFormat,
        args: &WriteArgs,
    ) -> Result<(), CliError> {
        let kind = EntityKind::from(args.entity.kind);
        let mut logger = create_logger(
            self.factory,
            kind,
            &args.entity.id,
            args.name.as_deref(),
            args.source.into(),
        )?;

        let copied = copy_lines(&mut input, logger.as_mut());
        let closed = logger.close();
        let records = copied?;
        closed?;

        debug!(%kind, id = %args.entity.id, records, "Wrote log records");
        let summary = WriteSummary {
            kind: kind.as_str(),
            id: args.entity.id.clone(),
            records,
            path: logger.log_path(),
        };
        format.write(out, &summary)
    }
}

fn copy_lines<R: BufRead>(input: &mut R, logger: &mut dyn Logger) -> Result<usize, CliError> {
    let mut line = Vec::new();
    let mut records = 0;
    loop {
        line.clear();
        if input.read_until(b'\n', &mut line)? == 0 {
            return Ok(records);
        }
        let body = line.strip_suffix(b"\n").unwrap_or(&line);
        let body = body.strip_suffix(b"\r").unwrap_or(body);

        if let Err(e) = logger.append(body).into_result() {
            warn!(error = %e, "Log write failed");
            return Err(e.into());
        }
        records += 1;
    }
}

/// Result of a write command.
#[derive(Debug, Clone, Serialize)]
pub struct WriteSummary {
    /// Entity kind.
    pub kind: &'static str,
    /// Entity id.
    pub id: String,
    /// Number of records appended.
    pub records: usize,
    /// Local log file.
    pub path: PathBuf,
}

impl TextDisplay for WriteSummary {
    fn write_text<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        writeln!(
            writer,
            "wrote {} record(s) to {} {} ({})",
            self.records,
            self.kind,
            self.id,
            self.path.display()
        )?;
        Ok(())
    }
}
