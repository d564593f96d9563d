//! Builds Secret records from the certificates served by each target host.

use crate::config::SyncTarget;
use tls_fetcher::{CertificateFetcher, FetchError};

/// A certificate ready to be written to a Secret.
///
/// Built fresh every cycle and dropped once the cycle is synchronized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretRecord {
    /// Secret name
    pub name: String,
    /// Set by the reconciler when the record is synchronized
    pub namespace: Option<String>,
    /// PEM-encoded leaf certificate
    pub certificate: String,
}

/// Fetch the certificate of every target, in order.
///
/// The first host that fails aborts the whole batch: no records are
/// returned, so nothing is synchronized for this cycle.
pub async fn build_secrets(
    fetcher: &dyn CertificateFetcher,
    targets: &[SyncTarget],
) -> Result<Vec<SecretRecord>, FetchError> {
    let mut records = Vec::with_capacity(targets.len());

    for target in targets {
        let certificate = fetcher.fetch_leaf_pem(&target.tls_host).await?;
        records.push(SecretRecord {
            name: target.secret_name.clone(),
            namespace: None,
            certificate,
        });
    }

    Ok(records)
}
