//! SecretStore trait for mocking
//!
//! `KubeSecretStore` implements this trait against the cluster; tests use
//! `MockSecretStore` instead.

use crate::error::SecretStoreError;
use k8s_openapi::api::core::v1::Secret;

/// Namespaced Secret operations used by the synchronizer.
///
/// All async methods must be `Send` to work with Tokio's work-stealing runtime.
#[async_trait::async_trait]
pub trait SecretStore: Send + Sync {
    /// Namespace every operation is scoped to
    fn namespace(&self) -> &str;

    /// Read a Secret by name. `Ok(None)` means it does not exist.
    async fn get(&self, name: &str) -> Result<Option<Secret>, SecretStoreError>;

    /// Create a new Secret
    async fn create(&self, secret: &Secret) -> Result<Secret, SecretStoreError>;

    /// Replace an existing Secret with `secret`
    async fn update(&self, secret: &Secret) -> Result<Secret, SecretStoreError>;
}
