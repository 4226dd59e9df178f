//! CLI command implementations.
//!
//! - [`write`] - Copy input lines into an entity log
//! - [`cat`] - Print the stored records of an entity
//! - [`cleanup`] - Delete an entity's logs

pub mod cat;
pub mod cleanup;
pub mod write;

pub use cat::CatCommand;
pub use cleanup::CleanupCommand;
pub use write::WriteCommand;

use std::io::Read;

use keel_logs::{EntityKind, LocalLoggerFactory, LogSource, Logger, LoggerFactory, LogsConfig};
use tracing::debug;

use crate::error::CliError;

/// Factory for commands that act on stored logs (`cat`, `cleanup`).
///
/// Stored logs only exist locally, so these commands use the local roots
/// even when remote mirroring is configured.
pub fn stored_logs_factory(config: &LogsConfig, command: &str) -> LocalLoggerFactory {
    if let Some(remote) = &config.remote {
        debug!(
            command,
            server_url = %remote.server_url,
            "Using local log storage; remote mirroring only applies to writes"
        );
    }
    config.local_factory()
}

/// Creates the logger for one entity. Workspace and target loggers fall back
/// to the id when no display name is given.
fn create_logger(
    factory: &dyn LoggerFactory,
    kind: EntityKind,
    id: &str,
    name: Option<&str>,
    source: LogSource,
) -> Result<Box<dyn Logger>, CliError> {
    let name = name.unwrap_or(id);
    let logger = match kind {
        EntityKind::Workspace => factory.create_workspace_logger(id, name, source)?,
        EntityKind::Target => factory.create_target_logger(id, name, source)?,
        EntityKind::Build => factory.create_build_logger(id, source)?,
    };
    Ok(logger)
}

fn open_reader(
    factory: &dyn LoggerFactory,
    kind: EntityKind,
    id: &str,
) -> Result<Box<dyn Read + Send>, CliError> {
    let reader = match kind {
        EntityKind::Workspace => factory.create_workspace_log_reader(id)?,
        EntityKind::Target => factory.create_target_log_reader(id)?,
        EntityKind::Build => factory.create_build_log_reader(id)?,
    };
    Ok(reader)
}
