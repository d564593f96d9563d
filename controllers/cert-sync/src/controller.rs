//! Main controller implementation.
//!
//! The `Controller` builds its clients once and then runs synchronization
//! cycles forever: fetch every certificate, write the Secrets, sleep. A
//! failed cycle is logged and the next one starts after the normal interval;
//! there is no faster retry or backoff.

use crate::builder::build_secrets;
use crate::config::{Config, SyncTarget};
use crate::error::ControllerError;
use crate::kube_client::create_client;
use crate::reconciler::Reconciler;
use secret_store::{KubeSecretStore, SecretStore};
use std::time::Duration;
use tls_fetcher::{CertificateFetcher, FetcherOptions, HostCertFetcher};
use tracing::{error, info, warn};

/// Periodic certificate-to-Secret synchronizer.
pub struct Controller {
    fetcher: Box<dyn CertificateFetcher>,
    reconciler: Reconciler,
    targets: Vec<SyncTarget>,
    interval: Duration,
}

impl Controller {
    /// Creates a new controller instance.
    ///
    /// Fails if the Kubernetes client cannot be built; the controller never
    /// starts with an unusable client.
    pub async fn new(config: &Config) -> Result<Self, ControllerError> {
        info!("Generating the client to connect to Kubernetes");
        let client = create_client(config.connection_mode, &config.kubeconfig)
            .await
            .map_err(|e| {
                error!("Error connecting to Kubernetes API: {}", e);
                e
            })?;

        let store = KubeSecretStore::new(client, &config.namespace);
        let fetcher = HostCertFetcher::new(FetcherOptions {
            timeout: config.tls_timeout,
        })?;

        Ok(Self::with_clients(
            Box::new(fetcher),
            Box::new(store),
            config.targets.clone(),
            config.interval,
        ))
    }

    /// Creates a controller from already built clients.
    pub fn with_clients(
        fetcher: Box<dyn CertificateFetcher>,
        store: Box<dyn SecretStore>,
        targets: Vec<SyncTarget>,
        interval: Duration,
    ) -> Self {
        Self {
            fetcher,
            reconciler: Reconciler::new(store),
            targets,
            interval,
        }
    }

    /// Runs a single fetch and synchronize cycle.
    ///
    /// Returns the number of Secrets synchronized.
    pub async fn run_once(&self) -> Result<usize, ControllerError> {
        let records = build_secrets(self.fetcher.as_ref(), &self.targets).await?;
        let count = records.len();

        info!("Synchronizing the Secrets in the namespace: {}", self.reconciler.namespace());
        self.reconciler.synchronize(records).await?;

        Ok(count)
    }

    /// Runs cycles until the process receives Ctrl-C / SIGINT.
    pub async fn run(self) -> Result<(), ControllerError> {
        info!(
            "Certificate sync controller running ({} targets)",
            self.targets.len()
        );

        let shutdown = tokio::signal::ctrl_c();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                () = self.cycle() => {}
                result = &mut shutdown => {
                    match result {
                        Ok(()) => info!("Shutdown signal received, stopping"),
                        Err(e) => warn!("Failed to listen for shutdown signal, stopping: {}", e),
                    }
                    return Ok(());
                }
            }
        }
    }

    async fn cycle(&self) {
        match self.run_once().await {
            Ok(count) => info!("Synchronized {} Secrets", count),
            Err(ControllerError::Fetch(e)) => {
                error!("Error getting the TLS certificates, skipping synchronization: {}", e);
            }
            Err(e) => error!("Error synchronizing the Secrets: {}", e),
        }

        info!("Next synchronization in {} seconds", self.interval.as_secs());
        tokio::time::sleep(self.interval).await;
    }
}
