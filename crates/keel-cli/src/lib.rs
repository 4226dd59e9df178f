//! # keel-cli
//!
//! Command-line access to Keel entity logs.
//!
//! - `keel write` copies stdin into a workspace, target or build log,
//!   mirroring to the collector when one is configured
//! - `keel cat` decodes and prints stored records
//! - `keel cleanup` removes an entity's log directory
//!
//! Configuration comes from an optional TOML file (`--config` or
//! `KEEL_CONFIG`) overridden by flags and `KEEL_*` environment variables.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cli;
pub mod commands;
pub mod error;
pub mod output;

pub use cli::{Cli, Commands, EntityArgs, Format, KindArg, SourceArg, WriteArgs};
pub use error::CliError;
pub use output::OutputFormat;
