//! Logging configuration and factory selection.
//!
//! The presence of a `[remote]` table selects [`RemoteLoggerFactory`];
//! otherwise logs stay local. The chosen factory is built once and injected
//! wherever loggers are needed.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{LogError, Result};
use crate::factory::{LocalLoggerFactory, LoggerFactory};
use crate::remote::RemoteLoggerFactory;

/// Remote collector settings.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RemoteConfig {
    /// Collector base URL (`http`, `https`, `ws` or `wss`).
    pub server_url: String,
    /// API key sent as a bearer token.
    pub api_key: String,
}

impl fmt::Debug for RemoteConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteConfig")
            .field("server_url", &self.server_url)
            .finish_non_exhaustive()
    }
}

/// Storage roots and optional remote mirroring.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LogsConfig {
    /// Root for target and workspace logs.
    pub target_logs_dir: PathBuf,
    /// Root for build logs.
    pub build_logs_dir: PathBuf,
    /// Remote collector, if logs should be mirrored.
    #[serde(default)]
    pub remote: Option<RemoteConfig>,
}

impl Default for LogsConfig {
    fn default() -> Self {
        Self {
            target_logs_dir: PathBuf::from("logs/targets"),
            build_logs_dir: PathBuf::from("logs/builds"),
            remote: None,
        }
    }
}

impl LogsConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            LogError::Config(format!(
                "failed to read config file '{}': {}",
                path.as_ref().display(),
                e
            ))
        })?;

        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| LogError::Config(format!("invalid TOML: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.target_logs_dir.as_os_str().is_empty() {
            return Err(LogError::Config(
                "target_logs_dir cannot be empty".to_string(),
            ));
        }

        if self.build_logs_dir.as_os_str().is_empty() {
            return Err(LogError::Config("build_logs_dir cannot be empty".to_string()));
        }

        if let Some(remote) = &self.remote {
            let scheme_ok = ["http://", "https://", "ws://", "wss://"]
                .iter()
                .any(|scheme| remote.server_url.starts_with(scheme));
            if !scheme_ok {
                return Err(LogError::Config(
                    "remote.server_url must start with http://, https://, ws:// or wss://"
                        .to_string(),
                ));
            }

            if remote.api_key.is_empty() {
                return Err(LogError::Config("remote.api_key cannot be empty".to_string()));
            }
        }

        Ok(())
    }

    /// Factory over the local storage roots only.
    #[must_use]
    pub fn local_factory(&self) -> LocalLoggerFactory {
        LocalLoggerFactory::new(&self.target_logs_dir, &self.build_logs_dir)
    }

    /// Builds the factory selected by this configuration.
    #[must_use]
    pub fn logger_factory(&self) -> Arc<dyn LoggerFactory> {
        let local = self.local_factory();
        match &self.remote {
            Some(remote) => {
                debug!(server_url = %remote.server_url, "Using remote logger factory");
                Arc::new(RemoteLoggerFactory::new(
                    local,
                    remote.server_url.clone(),
                    remote.api_key.clone(),
                ))
            }
            None => {
                debug!("Using local logger factory");
                Arc::new(local)
            }
        }
    }
}
