//! Controller-specific error types.
//!
//! Errors from the certificate fetcher and the Secret store convert into
//! `ControllerError` so the driver can tell a failed fetch from a failed
//! synchronization when it logs a cycle.

use secret_store::SecretStoreError;
use thiserror::Error;
use tls_fetcher::FetchError;

/// Errors that can occur in the certificate sync controller.
#[derive(Debug, Error)]
pub enum ControllerError {
    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Cluster credentials could not be discovered or loaded
    #[error("Kubernetes configuration error: {0}")]
    KubeConfig(String),

    /// Kubernetes client error
    #[error("Kubernetes error: {0}")]
    Kube(#[from] kube::Error),

    /// Certificate could not be fetched from a TLS host
    #[error("Certificate fetch failed: {0}")]
    Fetch(#[from] FetchError),

    /// Secret could not be read or written
    #[error("Secret synchronization failed: {0}")]
    SecretStore(#[from] SecretStoreError),
}
