//! TLS Certificate Fetcher
//!
//! Dials a remote `host:port`, completes a TLS handshake and returns the
//! leaf certificate the peer presented, re-encoded as PEM text.
//!
//! # Example
//!
//! ```no_run
//! use tls_fetcher::{CertificateFetcher, FetcherOptions, HostCertFetcher};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let fetcher = HostCertFetcher::new(FetcherOptions::default())?;
//! let pem = fetcher.fetch_leaf_pem("example.com:443").await?;
//! assert!(pem.starts_with("-----BEGIN CERTIFICATE-----"));
//! # Ok(())
//! # }
//! ```
//!
//! # Trust
//!
//! The fetcher never verifies the certificate chain. Its job is to harvest
//! whatever certificate an endpoint serves (self-signed, expired, issued for
//! another name), not to authenticate the endpoint. Handshake signatures are
//! still checked, so the peer must hold the private key of the certificate
//! it presents. Do not reuse the fetcher's TLS configuration for anything
//! that relies on the identity of the peer.

pub mod address;
pub mod client;
pub mod error;
#[path = "trait.rs"]
pub mod fetcher_trait;
#[cfg(feature = "test-util")]
pub mod mock;
pub mod verifier;

pub use address::HostAddress;
pub use client::{FetcherOptions, HostCertFetcher, leaf_certificate_pem};
pub use error::FetchError;
pub use fetcher_trait::CertificateFetcher;
#[cfg(feature = "test-util")]
pub use mock::MockCertificateFetcher;
