//! # keel-provisioner
//!
//! Target and workspace info lookups through provider plugins.
//!
//! Providers answer synchronously and may hang. [`Provisioner`] runs each
//! call on a blocking worker and returns as soon as either the provider
//! answers or the caller's cancellation token fires.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use keel_provisioner::{Provisioner, ProviderRegistry};
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example(target: keel_provisioner::Target, config: keel_provisioner::TargetConfig)
//! #     -> keel_provisioner::Result<()> {
//! let provisioner = Provisioner::new(Arc::new(ProviderRegistry::new()));
//! let cancel = CancellationToken::new();
//! let info = provisioner.get_target_info(&cancel, &target, &config).await?;
//! println!("{}", info.name);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod info;
pub mod provider;

pub use error::{ProvisionerError, Result};
pub use info::Provisioner;
pub use provider::{
    Provider, ProviderInfo, ProviderManager, ProviderRegistry, Target, TargetConfig, TargetInfo,
    TargetRequest, Workspace, WorkspaceInfo, WorkspaceRequest,
};
