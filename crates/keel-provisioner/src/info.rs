//! Cancellation-bounded provider info lookups.
//!
//! Provider calls are blocking and may hang. Each lookup runs on a blocking
//! worker and is raced against the caller's [`CancellationToken`]; once
//! cancellation wins, the worker's eventual result is dropped.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument};

use crate::error::{ProvisionerError, Result};
use crate::provider::{
    ProviderManager, Target, TargetConfig, TargetInfo, TargetRequest, Workspace, WorkspaceInfo,
    WorkspaceRequest,
};

/// Queries providers on behalf of targets and workspaces.
pub struct Provisioner {
    provider_manager: Arc<dyn ProviderManager>,
    timeout: Option<Duration>,
}

impl std::fmt::Debug for Provisioner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Provisioner")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl Provisioner {
    /// Creates a provisioner over `provider_manager`.
    #[must_use]
    pub fn new(provider_manager: Arc<dyn ProviderManager>) -> Self {
        Self {
            provider_manager,
            timeout: None,
        }
    }

    /// Bounds every lookup by `timeout` in addition to the caller's token.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Gets the target info from its provider.
    ///
    /// Returns [`ProvisionerError::Cancelled`] if `cancel` fires before the
    /// provider answers.
    #[instrument(skip_all, fields(target = %target.id, provider = %target_config.provider_info.name))]
    pub async fn get_target_info(
        &self,
        cancel: &CancellationToken,
        target: &Target,
        target_config: &TargetConfig,
    ) -> Result<TargetInfo> {
        let manager = Arc::clone(&self.provider_manager);
        let provider_name = target_config.provider_info.name.clone();
        let request = TargetRequest {
            target_config_options: target_config.options.clone(),
            target: target.clone(),
        };

        self.run_bounded(cancel, move || {
            let provider = manager.get_provider(&provider_name)?;
            provider.get_target_info(&request)
        })
        .await
    }

    /// Gets the workspace info from its provider.
    ///
    /// Returns [`ProvisionerError::Cancelled`] if `cancel` fires before the
    /// provider answers.
    #[instrument(skip_all, fields(workspace = %workspace.id, provider = %target_config.provider_info.name))]
    pub async fn get_workspace_info(
        &self,
        cancel: &CancellationToken,
        workspace: &Workspace,
        target_config: &TargetConfig,
    ) -> Result<WorkspaceInfo> {
        let manager = Arc::clone(&self.provider_manager);
        let provider_name = target_config.provider_info.name.clone();
        let request = WorkspaceRequest {
            target_config_options: target_config.options.clone(),
            workspace: workspace.clone(),
        };

        self.run_bounded(cancel, move || {
            let provider = manager.get_provider(&provider_name)?;
            provider.get_workspace_info(&request)
        })
        .await
    }

    async fn run_bounded<T, F>(&self, cancel: &CancellationToken, call: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce() -> Result<T> + Send + 'static,
    {
        if cancel.is_cancelled() {
            debug!("Cancellation detected before provider call");
            return Err(ProvisionerError::Cancelled);
        }

        let worker = tokio::task::spawn_blocking(call);
        let raced = async {
            tokio::select! {
                biased;

                () = cancel.cancelled() => {
                    debug!("Provider call cancelled, discarding late result");
                    Err(ProvisionerError::Cancelled)
                }
                joined = worker => {
                    joined.map_err(|e| ProvisionerError::Worker(e.to_string()))?
                }
            }
        };

        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, raced)
                .await
                .map_err(|_| ProvisionerError::Timeout(limit))?,
            None => raced.await,
        }
    }
}
