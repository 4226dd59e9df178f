//! Error types for provider lookups.

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur while querying a provider.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProvisionerError {
    /// The caller cancelled the request before the provider answered.
    #[error("request cancelled")]
    Cancelled,

    /// The provider did not answer within the configured limit.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// No provider is registered under the given name.
    #[error("provider not found: {0}")]
    ProviderNotFound(String),

    /// The provider reported a failure.
    #[error("provider error: {0}")]
    Provider(String),

    /// The worker running the provider call panicked or was aborted.
    #[error("provider worker failed: {0}")]
    Worker(String),
}

/// Result type alias for provisioner operations.
pub type Result<T> = std::result::Result<T, ProvisionerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        assert_eq!(ProvisionerError::Cancelled.to_string(), "request cancelled");
        assert_eq!(
            ProvisionerError::ProviderNotFound("docker".into()).to_string(),
            "provider not found: docker"
        );
        assert_eq!(
            ProvisionerError::Timeout(Duration::from_secs(2)).to_string(),
            "request timed out after 2s"
        );
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ProvisionerError>();
    }
}
