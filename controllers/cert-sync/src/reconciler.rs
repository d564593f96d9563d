//! Reconciliation of certificate Secrets.
//!
//! Each record goes through a read, a create when the Secret is missing,
//! and then an unconditional replace with the freshly built object. The
//! create-then-replace is redundant on the first pass, but it means the
//! stored `tls.crt` always ends up equal to the latest fetched certificate
//! whether or not the Secret existed before.

use crate::builder::SecretRecord;
use crate::error::ControllerError;
use secret_store::{SecretStore, tls_secret};
use tracing::{debug, error, info};

/// Writes certificate records into Secrets of one namespace.
pub struct Reconciler {
    store: Box<dyn SecretStore>,
}

impl Reconciler {
    /// Creates a new reconciler instance.
    pub fn new(store: Box<dyn SecretStore>) -> Self {
        Self { store }
    }

    /// Target namespace
    pub fn namespace(&self) -> &str {
        self.store.namespace()
    }

    /// Synchronizes every record, in order.
    ///
    /// Stops at the first failure; later records are not attempted in this
    /// pass.
    pub async fn synchronize(&self, records: Vec<SecretRecord>) -> Result<(), ControllerError> {
        for mut record in records {
            record.namespace = Some(self.namespace().to_string());
            self.synchronize_secret(&record).await?;
        }
        Ok(())
    }

    async fn synchronize_secret(&self, record: &SecretRecord) -> Result<(), ControllerError> {
        let namespace = record.namespace.as_deref().unwrap_or(self.namespace());
        let name = &record.name;
        let secret = tls_secret(name, namespace, &record.certificate);

        let existing = self.store.get(name).await.map_err(|e| {
            error!("Failed to get Secret {}/{}: {}", namespace, name, e);
            e
        })?;

        if existing.is_none() {
            info!("Secret {}/{} not found, creating it", namespace, name);
            self.store.create(&secret).await.map_err(|e| {
                error!("Failed to create Secret {}/{}: {}", namespace, name, e);
                e
            })?;
        }

        self.store.update(&secret).await.map_err(|e| {
            error!("Failed to update Secret {}/{}: {}", namespace, name, e);
            e
        })?;
        debug!("Updated Secret {}/{}", namespace, name);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::fake_pem;
    use secret_store::{MockSecretStore, Operation, StoreCall, certificate_of};

    fn record(name: &str, certificate: &str) -> SecretRecord {
        SecretRecord {
            name: name.to_string(),
            namespace: None,
            certificate: certificate.to_string(),
        }
    }

    fn reconciler(store: &MockSecretStore) -> Reconciler {
        Reconciler::new(Box::new(store.clone()))
    }

    #[tokio::test]
    async fn test_missing_secret_is_created_then_updated() {
        let store = MockSecretStore::new("prod");

        reconciler(&store)
            .synchronize(vec![record("cert-a", &fake_pem("a"))])
            .await
            .unwrap();

        assert_eq!(store.secret_names(), vec!["cert-a"]);
        let stored = store.secret("cert-a").unwrap();
        assert_eq!(certificate_of(&stored), Some(fake_pem("a")));
        assert_eq!(stored.metadata.namespace.as_deref(), Some("prod"));
        assert_eq!(
            store.calls(),
            vec![
                StoreCall::Get("cert-a".to_string()),
                StoreCall::Create("cert-a".to_string()),
                StoreCall::Update("cert-a".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_existing_secret_is_overwritten_without_duplicate() {
        let store = MockSecretStore::new("prod");
        store.add_secret(tls_secret("cert-a", "prod", &fake_pem("stale")));

        reconciler(&store)
            .synchronize(vec![record("cert-a", &fake_pem("fresh"))])
            .await
            .unwrap();

        assert_eq!(store.secret_names(), vec!["cert-a"]);
        assert_eq!(certificate_of(&store.secret("cert-a").unwrap()), Some(fake_pem("fresh")));
        assert_eq!(
            store.calls(),
            vec![
                StoreCall::Get("cert-a".to_string()),
                StoreCall::Update("cert-a".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_second_pass_is_idempotent() {
        let store = MockSecretStore::new("prod");
        let reconciler = reconciler(&store);
        let records = vec![record("cert-a", &fake_pem("a")), record("cert-b", &fake_pem("b"))];

        reconciler.synchronize(records.clone()).await.unwrap();
        let after_first: Vec<_> = store
            .secret_names()
            .iter()
            .map(|name| (name.clone(), certificate_of(&store.secret(name).unwrap())))
            .collect();

        reconciler.synchronize(records).await.unwrap();
        let after_second: Vec<_> = store
            .secret_names()
            .iter()
            .map(|name| (name.clone(), certificate_of(&store.secret(name).unwrap())))
            .collect();

        assert_eq!(after_first, after_second);
        assert_eq!(after_second.len(), 2);
    }

    #[tokio::test]
    async fn test_failure_aborts_remaining_records() {
        let store = MockSecretStore::new("prod");
        store.fail_on(Operation::Update, "cert-b");

        let err = reconciler(&store)
            .synchronize(vec![
                record("cert-a", &fake_pem("a")),
                record("cert-b", &fake_pem("b")),
                record("cert-c", &fake_pem("c")),
            ])
            .await
            .unwrap_err();

        assert!(matches!(err, ControllerError::SecretStore(_)));
        assert!(store.secret("cert-c").is_none());
        assert!(
            !store.calls().iter().any(|call| matches!(
                call,
                StoreCall::Get(name) | StoreCall::Create(name) | StoreCall::Update(name) if name == "cert-c"
            )),
            "cert-c must not be attempted"
        );
    }

    #[tokio::test]
    async fn test_create_failure_skips_update() {
        let store = MockSecretStore::new("prod");
        store.fail_on(Operation::Create, "cert-a");

        let result = reconciler(&store)
            .synchronize(vec![record("cert-a", &fake_pem("a"))])
            .await;

        assert!(result.is_err());
        assert_eq!(
            store.calls(),
            vec![
                StoreCall::Get("cert-a".to_string()),
                StoreCall::Create("cert-a".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_read_failure_does_not_create() {
        let store = MockSecretStore::new("prod");
        store.fail_on(Operation::Get, "cert-a");

        let result = reconciler(&store)
            .synchronize(vec![record("cert-a", &fake_pem("a"))])
            .await;

        assert!(result.is_err());
        assert!(store.secret_names().is_empty());
        assert_eq!(store.calls(), vec![StoreCall::Get("cert-a".to_string())]);
    }
}
