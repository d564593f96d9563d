//! CertificateFetcher trait for mocking
//!
//! The concrete `HostCertFetcher` implements this trait, and tests can swap in
//! `MockCertificateFetcher` (behind the `test-util` feature) to avoid network access.

use crate::error::FetchError;

/// Retrieves the leaf certificate of a TLS endpoint.
///
/// All async methods must be `Send` to work with Tokio's work-stealing runtime.
#[async_trait::async_trait]
pub trait CertificateFetcher: Send + Sync {
    /// Fetch the leaf certificate presented by `host_port`, PEM-encoded.
    async fn fetch_leaf_pem(&self, host_port: &str) -> Result<String, FetchError>;
}
