//! Provider plugin interface and the types it exchanges.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{ProvisionerError, Result};

/// Name and version of the provider backing a target config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderInfo {
    /// Provider name, used to look the provider up.
    pub name: String,
    /// Provider version.
    pub version: String,
}

/// A named provider configuration that targets are created from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetConfig {
    /// Config name.
    pub name: String,
    /// Provider this config belongs to.
    pub provider_info: ProviderInfo,
    /// Provider-specific options, as a JSON document.
    pub options: String,
}

/// A provisioned environment that hosts workspaces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    /// Target id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Name of the config the target was created from.
    pub target_config: String,
}

/// A development workspace running on a target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workspace {
    /// Workspace id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Target the workspace runs on.
    pub target_id: String,
}

/// Live information about a target, as reported by its provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetInfo {
    /// Target name.
    pub name: String,
    /// Opaque provider-specific metadata.
    pub provider_metadata: Option<String>,
}

/// Live information about a workspace, as reported by its provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceInfo {
    /// Workspace name.
    pub name: String,
    /// Opaque provider-specific metadata.
    pub provider_metadata: Option<String>,
}

/// Arguments for a target info lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetRequest {
    /// Options from the target config.
    pub target_config_options: String,
    /// The target to describe.
    pub target: Target,
}

/// Arguments for a workspace info lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceRequest {
    /// Options from the target config.
    pub target_config_options: String,
    /// The workspace to describe.
    pub workspace: Workspace,
}

/// A provider plugin.
///
/// Calls may block for as long as the provider needs; callers bound them
/// with [`crate::Provisioner`].
pub trait Provider: Send + Sync {
    /// Describes a target.
    fn get_target_info(&self, request: &TargetRequest) -> Result<TargetInfo>;

    /// Describes a workspace.
    fn get_workspace_info(&self, request: &WorkspaceRequest) -> Result<WorkspaceInfo>;
}

/// Looks providers up by name.
pub trait ProviderManager: Send + Sync {
    /// Returns the provider registered under `name`.
    fn get_provider(&self, name: &str) -> Result<Arc<dyn Provider>>;
}

/// In-memory provider registry.
#[derive(Default, Clone)]
pub struct ProviderRegistry {
    providers: HashMap<String, Arc<dyn Provider>>,
}

impl ProviderRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `provider` under `name`, replacing any previous entry.
    pub fn register(&mut self, name: impl Into<String>, provider: Arc<dyn Provider>) {
        self.providers.insert(name.into(), provider);
    }

    /// Number of registered providers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Returns true if no provider is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<&String> = self.providers.keys().collect();
        names.sort();
        f.debug_struct("ProviderRegistry")
            .field("providers", &names)
            .finish()
    }
}

impl ProviderManager for ProviderRegistry {
    fn get_provider(&self, name: &str) -> Result<Arc<dyn Provider>> {
        self.providers
            .get(name)
            .cloned()
            .ok_or_else(|| ProvisionerError::ProviderNotFound(name.to_string()))
    }
}
