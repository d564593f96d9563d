//! Mock CertificateFetcher for unit testing
//!
//! Serves canned PEM text per `host:port` without touching the network and
//! records every host it was asked for, in order.

use crate::error::FetchError;
use crate::fetcher_trait::CertificateFetcher;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, PoisonError};

/// Mock fetcher for testing
///
/// Hosts without a registered certificate fail with a connection error.
#[derive(Debug, Clone, Default)]
pub struct MockCertificateFetcher {
    certificates: Arc<Mutex<HashMap<String, String>>>,
    empty_chains: Arc<Mutex<HashSet<String>>>,
    requests: Arc<Mutex<Vec<String>>>,
}

impl MockCertificateFetcher {
    /// Create an empty mock fetcher
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `pem` for `host_port` (for test setup)
    pub fn add_certificate(&self, host_port: impl Into<String>, pem: impl Into<String>) {
        self.certificates
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(host_port.into(), pem.into());
    }

    /// Make `host_port` complete the handshake without presenting a certificate
    pub fn set_empty_chain(&self, host_port: impl Into<String>) {
        self.empty_chains
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(host_port.into());
    }

    /// Hosts fetched so far, in call order
    #[must_use]
    pub fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait::async_trait]
impl CertificateFetcher for MockCertificateFetcher {
    async fn fetch_leaf_pem(&self, host_port: &str) -> Result<String, FetchError> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(host_port.to_string());

        if self
            .empty_chains
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(host_port)
        {
            return Err(FetchError::EmptyChain(host_port.to_string()));
        }

        self.certificates
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(host_port)
            .cloned()
            .ok_or_else(|| FetchError::Connect {
                address: host_port.to_string(),
                source: std::io::Error::new(
                    std::io::ErrorKind::ConnectionRefused,
                    "mock host unreachable",
                ),
            })
    }
}
