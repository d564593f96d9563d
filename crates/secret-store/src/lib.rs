//! Kubernetes Secret Store
//!
//! Read, create and replace `v1/Secret` objects in a single namespace.
//! The certificate sync controller only talks to the cluster through the
//! [`SecretStore`] trait, so reconciliation can be unit tested against
//! [`MockSecretStore`] (enable the `test-util` feature).
//!
//! # Example
//!
//! ```no_run
//! use secret_store::{KubeSecretStore, SecretStore, tls_secret};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = kube::Client::try_default().await?;
//! let store = KubeSecretStore::new(client, "default");
//!
//! let secret = tls_secret("example-cert", "default", "-----BEGIN CERTIFICATE-----\n...");
//! if store.get("example-cert").await?.is_none() {
//!     store.create(&secret).await?;
//! }
//! store.update(&secret).await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
#[cfg(feature = "test-util")]
pub mod mock;
pub mod secret;
#[path = "trait.rs"]
pub mod store_trait;

pub use client::KubeSecretStore;
pub use error::SecretStoreError;
#[cfg(feature = "test-util")]
pub use mock::{MockSecretStore, Operation, StoreCall};
pub use secret::{TLS_CERT_KEY, certificate_of, tls_secret};
pub use store_trait::SecretStore;
