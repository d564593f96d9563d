//! Mock SecretStore for unit testing
//!
//! Keeps Secrets in memory and behaves like the API server where the
//! synchronizer can observe it:
//! - create fails if the name exists, update fails if it does not
//! - `stringData` is folded into `data` on every write
//! - `resourceVersion` changes on every write
//!
//! Every call is recorded, and individual operations can be made to fail.

use crate::client::secret_name;
use crate::error::SecretStoreError;
use crate::store_trait::SecretStore;
use k8s_openapi::ByteString;
use k8s_openapi::api::core::v1::Secret;
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

/// Store operation, used for failure injection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Read by name
    Get,
    /// Create
    Create,
    /// Replace
    Update,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => write!(f, "get"),
            Self::Create => write!(f, "create"),
            Self::Update => write!(f, "update"),
        }
    }
}

/// A recorded call against the mock
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    /// `get(name)`
    Get(String),
    /// `create` of the named Secret
    Create(String),
    /// `update` of the named Secret
    Update(String),
}

/// In-memory Secret store for testing
#[derive(Debug, Clone)]
pub struct MockSecretStore {
    namespace: String,
    secrets: Arc<Mutex<BTreeMap<String, Secret>>>,
    calls: Arc<Mutex<Vec<StoreCall>>>,
    failures: Arc<Mutex<HashSet<(Operation, String)>>>,
    next_version: Arc<Mutex<u64>>,
}

impl MockSecretStore {
    /// Create an empty store for `namespace`
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            secrets: Arc::new(Mutex::new(BTreeMap::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
            failures: Arc::new(Mutex::new(HashSet::new())),
            next_version: Arc::new(Mutex::new(1)),
        }
    }

    /// Seed a Secret directly, bypassing call recording (for test setup)
    pub fn add_secret(&self, secret: Secret) {
        let name = secret.metadata.name.clone().unwrap_or_default();
        let stored = self.persist(secret);
        lock(&self.secrets).insert(name, stored);
    }

    /// Make `operation` on the Secret called `name` fail
    pub fn fail_on(&self, operation: Operation, name: impl Into<String>) {
        lock(&self.failures).insert((operation, name.into()));
    }

    /// Remove all injected failures
    pub fn clear_failures(&self) {
        lock(&self.failures).clear();
    }

    /// Stored Secret by name
    #[must_use]
    pub fn secret(&self, name: &str) -> Option<Secret> {
        lock(&self.secrets).get(name).cloned()
    }

    /// Names of all stored Secrets, sorted
    #[must_use]
    pub fn secret_names(&self) -> Vec<String> {
        lock(&self.secrets).keys().cloned().collect()
    }

    /// Calls made so far, in order
    #[must_use]
    pub fn calls(&self) -> Vec<StoreCall> {
        lock(&self.calls).clone()
    }

    fn check_failure(&self, operation: Operation, name: &str) -> Result<(), SecretStoreError> {
        if lock(&self.failures).contains(&(operation, name.to_string())) {
            return Err(SecretStoreError::Api(format!(
                "injected {operation} failure for {}/{name}",
                self.namespace
            )));
        }
        Ok(())
    }

    fn check_namespace(&self, secret: &Secret) -> Result<(), SecretStoreError> {
        match secret.metadata.namespace.as_deref() {
            Some(ns) if ns != self.namespace => Err(SecretStoreError::InvalidSecret(format!(
                "namespace {ns} does not match store namespace {}",
                self.namespace
            ))),
            _ => Ok(()),
        }
    }

    /// Mimic the API server's write path
    fn persist(&self, mut secret: Secret) -> Secret {
        if let Some(string_data) = secret.string_data.take() {
            let data = secret.data.get_or_insert_with(BTreeMap::new);
            for (key, value) in string_data {
                data.insert(key, ByteString(value.into_bytes()));
            }
        }
        secret.metadata.namespace = Some(self.namespace.clone());

        let mut version = lock(&self.next_version);
        secret.metadata.resource_version = Some(version.to_string());
        *version += 1;

        secret
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[async_trait::async_trait]
impl SecretStore for MockSecretStore {
    fn namespace(&self) -> &str {
        &self.namespace
    }

    async fn get(&self, name: &str) -> Result<Option<Secret>, SecretStoreError> {
        lock(&self.calls).push(StoreCall::Get(name.to_string()));
        self.check_failure(Operation::Get, name)?;
        Ok(self.secret(name))
    }

    async fn create(&self, secret: &Secret) -> Result<Secret, SecretStoreError> {
        let name = secret_name(secret)?.to_string();
        lock(&self.calls).push(StoreCall::Create(name.clone()));
        self.check_failure(Operation::Create, &name)?;
        self.check_namespace(secret)?;

        if lock(&self.secrets).contains_key(&name) {
            return Err(SecretStoreError::AlreadyExists(format!("{}/{name}", self.namespace)));
        }

        let stored = self.persist(secret.clone());
        lock(&self.secrets).insert(name, stored.clone());
        Ok(stored)
    }

    async fn update(&self, secret: &Secret) -> Result<Secret, SecretStoreError> {
        let name = secret_name(secret)?.to_string();
        lock(&self.calls).push(StoreCall::Update(name.clone()));
        self.check_failure(Operation::Update, &name)?;
        self.check_namespace(secret)?;

        if !lock(&self.secrets).contains_key(&name) {
            return Err(SecretStoreError::NotFound(format!("{}/{name}", self.namespace)));
        }

        let stored = self.persist(secret.clone());
        lock(&self.secrets).insert(name, stored.clone());
        Ok(stored)
    }
}
