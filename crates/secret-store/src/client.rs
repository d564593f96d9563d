//! Secret store backed by the Kubernetes API

use crate::error::SecretStoreError;
use crate::store_trait::SecretStore;
use k8s_openapi::api::core::v1::Secret;
use kube::api::PostParams;
use kube::{Api, Client};
use std::fmt;
use tracing::debug;

/// Namespaced `v1/Secret` client
#[derive(Clone)]
pub struct KubeSecretStore {
    api: Api<Secret>,
    namespace: String,
}

impl KubeSecretStore {
    /// Create a store for `namespace` on top of an existing client
    #[must_use]
    pub fn new(client: Client, namespace: &str) -> Self {
        Self {
            api: Api::namespaced(client, namespace),
            namespace: namespace.to_string(),
        }
    }
}

impl fmt::Debug for KubeSecretStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KubeSecretStore")
            .field("namespace", &self.namespace)
            .finish_non_exhaustive()
    }
}

#[async_trait::async_trait]
impl SecretStore for KubeSecretStore {
    fn namespace(&self) -> &str {
        &self.namespace
    }

    async fn get(&self, name: &str) -> Result<Option<Secret>, SecretStoreError> {
        debug!("GET Secret {}/{}", self.namespace, name);
        Ok(self.api.get_opt(name).await?)
    }

    async fn create(&self, secret: &Secret) -> Result<Secret, SecretStoreError> {
        debug!("CREATE Secret {}/{}", self.namespace, secret_name(secret)?);
        Ok(self.api.create(&PostParams::default(), secret).await?)
    }

    async fn update(&self, secret: &Secret) -> Result<Secret, SecretStoreError> {
        let name = secret_name(secret)?;
        debug!("REPLACE Secret {}/{}", self.namespace, name);
        // No resourceVersion is sent, so the replace is unconditional.
        Ok(self
            .api
            .replace(name, &PostParams::default(), secret)
            .await?)
    }
}

pub(crate) fn secret_name(secret: &Secret) -> Result<&str, SecretStoreError> {
    secret
        .metadata
        .name
        .as_deref()
        .ok_or_else(|| SecretStoreError::InvalidSecret("Secret missing name".to_string()))
}
