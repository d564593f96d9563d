//! Secret store errors

use thiserror::Error;

/// Errors that can occur when reading or writing Secrets
#[derive(Debug, Error)]
pub enum SecretStoreError {
    /// Kubernetes API request failed
    #[error("Kubernetes error: {0}")]
    Kube(#[from] kube::Error),

    /// Create was attempted for a Secret that already exists
    #[error("Secret already exists: {0}")]
    AlreadyExists(String),

    /// Update was attempted for a Secret that does not exist
    #[error("Secret not found: {0}")]
    NotFound(String),

    /// The Secret object cannot be written as given
    #[error("Invalid Secret: {0}")]
    InvalidSecret(String),

    /// The store rejected the request
    #[error("Secret store API error: {0}")]
    Api(String),
}
