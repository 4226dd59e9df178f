//! Command-line argument parsing with clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use keel_logs::{EntityKind, LogSource, LogsConfig, RemoteConfig};

use crate::error::CliError;

/// Keel log tool: write, print and clean up entity logs.
#[derive(Parser, Debug, Clone)]
#[command(name = "keel")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to a TOML logging config.
    #[arg(short, long, env = "KEEL_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Root directory for target and workspace logs.
    #[arg(long, env = "KEEL_TARGET_LOGS_DIR", global = true)]
    pub target_logs_dir: Option<PathBuf>,

    /// Root directory for build logs.
    #[arg(long, env = "KEEL_BUILD_LOGS_DIR", global = true)]
    pub build_logs_dir: Option<PathBuf>,

    /// Collector URL; enables remote mirroring for `write`.
    #[arg(long, env = "KEEL_SERVER_URL", global = true)]
    pub server_url: Option<String>,

    /// API key for the collector.
    #[arg(long, env = "KEEL_API_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = Format::Text, global = true)]
    pub format: Format,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Resolves the logging config: file first, then flag and env overrides.
    pub fn logs_config(&self) -> Result<LogsConfig, CliError> {
        let mut config = match &self.config {
            Some(path) => LogsConfig::from_file(path)?,
            None => LogsConfig::default(),
        };

        if let Some(dir) = &self.target_logs_dir {
            config.target_logs_dir.clone_from(dir);
        }
        if let Some(dir) = &self.build_logs_dir {
            config.build_logs_dir.clone_from(dir);
        }

        config.remote = match (
            self.server_url.clone(),
            self.api_key.clone(),
            config.remote.take(),
        ) {
            (Some(server_url), Some(api_key), _) => Some(RemoteConfig {
                server_url,
                api_key,
            }),
            (Some(server_url), None, Some(remote)) => Some(RemoteConfig {
                server_url,
                ..remote
            }),
            (None, Some(api_key), Some(remote)) => Some(RemoteConfig { api_key, ..remote }),
            (Some(_), None, None) => {
                return Err(CliError::Config(
                    "--server-url requires --api-key".to_string(),
                ));
            }
            (None, Some(_), None) => {
                return Err(CliError::Config(
                    "--api-key requires --server-url".to_string(),
                ));
            }
            (None, None, remote) => remote,
        };

        config.validate()?;
        Ok(config)
    }
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Format {
    /// One line per record.
    #[default]
    Text,
    /// One JSON object per record.
    Json,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Copy stdin into an entity log, one record per line.
    Write(WriteArgs),

    /// Print the records stored for an entity.
    Cat(EntityArgs),

    /// Delete the stored logs of an entity.
    Cleanup(EntityArgs),
}

/// Selects one entity's log.
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct EntityArgs {
    /// Kind of entity.
    #[arg(short, long, value_enum)]
    pub kind: KindArg,

    /// Entity id.
    #[arg(long)]
    pub id: String,
}

/// Arguments for the write command.
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct WriteArgs {
    /// Entity to write to.
    #[command(flatten)]
    pub entity: EntityArgs,

    /// Workspace or target name recorded with each entry.
    #[arg(short, long)]
    pub name: Option<String>,

    /// Origin of the records.
    #[arg(short, long, value_enum, default_value_t = SourceArg::Server)]
    pub source: SourceArg,
}

/// Entity kind argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    /// Workspace logs.
    Workspace,
    /// Target logs.
    Target,
    /// Build logs.
    Build,
}

impl From<KindArg> for EntityKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Workspace => Self::Workspace,
            KindArg::Target => Self::Target,
            KindArg::Build => Self::Build,
        }
    }
}

/// Log source argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SourceArg {
    /// Records from the server itself.
    #[default]
    Server,
    /// Records from a provider.
    Provider,
    /// Records from an image build.
    Build,
}

impl From<SourceArg> for LogSource {
    fn from(source: SourceArg) -> Self {
        match source {
            SourceArg::Server => Self::Server,
            SourceArg::Provider => Self::Provider,
            SourceArg::Build => Self::Build,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;
    use test_case::test_case;

    #[test]
    fn cli_parses_write() {
        let cli = Cli::parse_from([
            "keel", "write", "--kind", "workspace", "--id", "ws-1", "--name", "api",
        ]);
        match cli.command {
            Commands::Write(args) => {
                assert_eq!(args.entity.kind, KindArg::Workspace);
                assert_eq!(args.entity.id, "ws-1");
                assert_eq!(args.name.as_deref(), Some("api"));
                assert_eq!(args.source, SourceArg::Server);
            }
            other => panic!("expected write command, got {other:?}"),
        }
    }

    #[test]
    fn cli_parses_cat_with_short_flags() {
        let cli = Cli::parse_from(["keel", "cat", "-k", "build", "--id", "b-1", "-f", "json"]);
        assert_eq!(cli.format, Format::Json);
        assert!(matches!(
            cli.command,
            Commands::Cat(EntityArgs { kind: KindArg::Build, .. })
        ));
    }

    #[test]
    fn cli_parses_cleanup() {
        let cli = Cli::parse_from(["keel", "cleanup", "--kind", "target", "--id", "t-1"]);
        assert!(matches!(
            cli.command,
            Commands::Cleanup(EntityArgs { kind: KindArg::Target, .. })
        ));
    }

    #[test]
    fn cli_requires_id() {
        assert!(Cli::try_parse_from(["keel", "cat", "--kind", "build"]).is_err());
    }

    #[test_case(SourceArg::Server, LogSource::Server)]
    #[test_case(SourceArg::Provider, LogSource::Provider)]
    #[test_case(SourceArg::Build, LogSource::Build)]
    fn source_arg_maps_to_log_source(arg: SourceArg, expected: LogSource) {
        assert_eq!(LogSource::from(arg), expected);
    }

    #[test_case(KindArg::Workspace, EntityKind::Workspace)]
    #[test_case(KindArg::Target, EntityKind::Target)]
    #[test_case(KindArg::Build, EntityKind::Build)]
    fn kind_arg_maps_to_entity_kind(arg: KindArg, expected: EntityKind) {
        assert_eq!(EntityKind::from(arg), expected);
    }

    #[test]
    fn logs_config_defaults_to_local() {
        let cli = Cli::parse_from(["keel", "cat", "--kind", "build", "--id", "b-1"]);
        let config = cli.logs_config().expect("config");
        assert_eq!(config, LogsConfig::default());
    }

    #[test]
    fn logs_config_applies_overrides_over_file() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("keel.toml");
        fs::write(
            &path,
            "target_logs_dir = \"/from/file/targets\"\nbuild_logs_dir = \"/from/file/builds\"\n",
        )
        .expect("write config");

        let cli = Cli::parse_from([
            "keel",
            "--config",
            path.to_str().expect("utf-8 path"),
            "--build-logs-dir",
            "/override/builds",
            "cat",
            "--kind",
            "build",
            "--id",
            "b-1",
        ]);
        let config = cli.logs_config().expect("config");
        assert_eq!(config.target_logs_dir, PathBuf::from("/from/file/targets"));
        assert_eq!(config.build_logs_dir, PathBuf::from("/override/builds"));
        assert!(config.remote.is_none());
    }

    #[test]
    fn logs_config_enables_remote_from_flags() {
        let cli = Cli::parse_from([
            "keel",
            "--server-url",
            "https://keel.example.com",
            "--api-key",
            "k",
            "write",
            "--kind",
            "build",
            "--id",
            "b-1",
        ]);
        let remote = cli.logs_config().expect("config").remote.expect("remote");
        assert_eq!(remote.server_url, "https://keel.example.com");
        assert_eq!(remote.api_key, "k");
    }

    #[test]
    fn logs_config_rejects_url_without_key() {
        let cli = Cli::parse_from([
            "keel",
            "--server-url",
            "https://keel.example.com",
            "write",
            "--kind",
            "build",
            "--id",
            "b-1",
        ]);
        assert!(matches!(cli.logs_config(), Err(CliError::Config(_))));
    }

    #[test]
    fn logs_config_rejects_bad_scheme() {
        let cli = Cli::parse_from([
            "keel",
            "--server-url",
            "ftp://keel.example.com",
            "--api-key",
            "k",
            "write",
            "--kind",
            "build",
            "--id",
            "b-1",
        ]);
        assert!(matches!(cli.logs_config(), Err(CliError::Logs(_))));
    }
}
