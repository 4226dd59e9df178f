//! Output formatting for CLI commands.
//!
//! Text output is one human-readable line per item; JSON output is one
//! compact object per line so it can be piped into line-oriented tools.

use std::io::Write;

use keel_logs::LogEntry;
use serde::Serialize;

use crate::cli::Format;
use crate::error::CliError;

/// Output formatter that handles both text and JSON output.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputFormat {
    format: Format,
}

impl OutputFormat {
    /// Create a new output formatter.
    #[must_use]
    pub const fn new(format: Format) -> Self {
        Self { format }
    }

    /// Check if JSON format is selected.
    #[must_use]
    pub const fn is_json(&self) -> bool {
        matches!(self.format, Format::Json)
    }

    /// Write one item to the output.
    pub fn write<W, T>(&self, writer: &mut W, value: &T) -> Result<(), CliError>
    where
        W: Write,
        T: Serialize + TextDisplay,
    {
        match self.format {
            Format::Json => {
                serde_json::to_writer(&mut *writer, value)?;
                writeln!(writer)?;
            }
            Format::Text => value.write_text(writer)?,
        }
        Ok(())
    }
}

/// Types that have a human-readable one-line form.
pub trait TextDisplay {
    /// Write the value as text, including the trailing newline.
    fn write_text<W: Write>(&self, writer: &mut W) -> Result<(), CliError>;
}

impl TextDisplay for LogEntry {
    fn write_text<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        write!(writer, "{} [{}]", self.time, self.source)?;
        if let Some(name) = self.workspace_name.as_ref().or(self.target_name.as_ref()) {
            write!(writer, " {name}:")?;
        }
        writeln!(writer, " {}", self.msg)?;
        Ok(())
    }
}
