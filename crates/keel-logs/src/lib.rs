//! # keel-logs
//!
//! Scoped structured-log persistence for Keel workspaces, targets and builds.
//!
//! This crate provides:
//!
//! - [`LogEntry`] - one structured record, framed by [`LOG_DELIMITER`]
//! - [`Logger`] - the write/close/cleanup contract shared by all sinks
//! - [`WorkspaceLogger`], [`TargetLogger`], [`BuildLogger`] - lazily opened
//!   per-entity log files
//! - [`LoggerFactory`] / [`LocalLoggerFactory`] - loggers and readers
//!   addressed by entity id
//! - [`RemoteLoggerFactory`] / [`RemoteLogger`] - mirroring to a remote
//!   collector over a websocket
//! - [`LogEntryReader`] - decoding of stored log streams
//! - [`LogsConfig`] - TOML configuration selecting local or remote logging
//!
//! ## Example
//!
//! ```rust,no_run
//! use keel_logs::{LocalLoggerFactory, LogSource, LoggerFactory};
//!
//! # fn example() -> keel_logs::Result<()> {
//! let factory = LocalLoggerFactory::new("/var/lib/keel/targets", "/var/lib/keel/builds");
//!
//! let mut logger = factory.create_build_logger("b-1", LogSource::Build)?;
//! logger.append(b"build started").into_result()?;
//! logger.close()?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod build;
pub mod config;
pub mod entry;
pub mod error;
pub mod factory;
pub mod logger;
pub mod reader;
pub mod remote;
pub mod target;
pub mod workspace;

// Re-export main types
pub use build::BuildLogger;
pub use config::{LogsConfig, RemoteConfig};
pub use entry::{LogEntry, LogSource, LOG_DELIMITER};
pub use error::{LogError, Result};
pub use factory::{validate_entity_id, LocalLoggerFactory, LoggerFactory};
pub use logger::{log_dir_path, log_file_path, Logger, WriteOutcome};
pub use reader::{read_entries, LogEntryReader};
pub use remote::{EntityKind, RemoteConnection, RemoteLogger, RemoteLoggerFactory};
pub use target::TargetLogger;
pub use workspace::WorkspaceLogger;
