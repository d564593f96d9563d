//! TLS certificate fetcher

use crate::address::HostAddress;
use crate::error::FetchError;
use crate::fetcher_trait::CertificateFetcher;
use crate::verifier::AcceptAnyServerCert;
use rustls::ClientConfig;
use rustls::crypto::ring;
use rustls::pki_types::CertificateDer;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio_rustls::TlsConnector;
use tracing::debug;

/// PEM tag used for X.509 certificates
const CERTIFICATE_TAG: &str = "CERTIFICATE";

/// Options for [`HostCertFetcher`]
#[derive(Debug, Clone, Default)]
pub struct FetcherOptions {
    /// Upper bound on connect plus handshake. `None` leaves the transport
    /// defaults in place, so an unresponsive host can block indefinitely.
    pub timeout: Option<Duration>,
}

/// Fetches leaf certificates over TLS without verifying them.
///
/// Every call opens its own connection and closes it before returning, so
/// at most one socket per in-flight fetch is held open.
#[derive(Debug, Clone)]
pub struct HostCertFetcher {
    config: Arc<ClientConfig>,
    options: FetcherOptions,
}

impl HostCertFetcher {
    /// Create a new fetcher
    pub fn new(options: FetcherOptions) -> Result<Self, FetchError> {
        let provider = Arc::new(ring::default_provider());
        let config = ClientConfig::builder_with_provider(Arc::clone(&provider))
            .with_safe_default_protocol_versions()?
            .dangerous()
            .with_custom_certificate_verifier(Arc::new(AcceptAnyServerCert::new(provider)))
            .with_no_client_auth();

        Ok(Self {
            config: Arc::new(config),
            options,
        })
    }

    async fn fetch(&self, address: &HostAddress) -> Result<String, FetchError> {
        let address_str = address.to_string();
        let server_name = address.server_name()?;

        debug!("Dialing {}", address_str);
        let tcp = TcpStream::connect((address.host.as_str(), address.port))
            .await
            .map_err(|source| FetchError::Connect {
                address: address_str.clone(),
                source,
            })?;

        let connector = TlsConnector::from(Arc::clone(&self.config));
        let mut stream = connector
            .connect(server_name, tcp)
            .await
            .map_err(|source| FetchError::Handshake {
                address: address_str.clone(),
                source,
            })?;

        let pem = {
            let (_, session) = stream.get_ref();
            leaf_certificate_pem(&address_str, session.peer_certificates().unwrap_or_default())
        };

        // Connection is released here rather than at the end of the batch.
        if let Err(e) = stream.shutdown().await {
            debug!("Closing TLS connection to {} failed: {}", address_str, e);
        }

        pem
    }
}

#[async_trait::async_trait]
impl CertificateFetcher for HostCertFetcher {
    async fn fetch_leaf_pem(&self, host_port: &str) -> Result<String, FetchError> {
        let address = HostAddress::parse(host_port)?;

        match self.options.timeout {
            Some(limit) => match tokio::time::timeout(limit, self.fetch(&address)).await {
                Ok(result) => result,
                Err(_elapsed) => Err(FetchError::Timeout {
                    address: address.to_string(),
                    seconds: limit.as_secs(),
                }),
            },
            None => self.fetch(&address).await,
        }
    }
}

/// PEM-encode the first (leaf) certificate of a peer chain.
///
/// `address` is only used to label the error when the chain is empty.
pub fn leaf_certificate_pem(
    address: &str,
    chain: &[CertificateDer<'_>],
) -> Result<String, FetchError> {
    let leaf = chain
        .first()
        .ok_or_else(|| FetchError::EmptyChain(address.to_string()))?;

    let block = pem::Pem::new(CERTIFICATE_TAG, leaf.as_ref().to_vec());
    Ok(pem::encode_config(
        &block,
        pem::EncodeConfig::new().set_line_ending(pem::LineEnding::LF),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustls::pki_types::{PrivateKeyDer, PrivatePkcs8KeyDer};
    use std::net::SocketAddr;
    use tokio::io::AsyncReadExt;
    use tokio::net::TcpListener;

    fn self_signed(name: &str) -> (CertificateDer<'static>, PrivateKeyDer<'static>) {
        let rcgen::CertifiedKey { cert, key_pair } =
            rcgen::generate_simple_self_signed(vec![name.to_string()]).unwrap();
        let key = PrivateKeyDer::Pkcs8(PrivatePkcs8KeyDer::from(key_pair.serialize_der()));
        (cert.der().clone(), key)
    }

    /// Starts a TLS server on localhost that serves a fresh self-signed
    /// certificate and returns its address and the certificate.
    async fn spawn_tls_server() -> (SocketAddr, CertificateDer<'static>) {
        let (cert, key) = self_signed("localhost");
        let config = rustls::ServerConfig::builder_with_provider(Arc::new(ring::default_provider()))
            .with_safe_default_protocol_versions()
            .unwrap()
            .with_no_client_auth()
            .with_single_cert(vec![cert.clone()], key)
            .unwrap();
        let acceptor = tokio_rustls::TlsAcceptor::from(Arc::new(config));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let acceptor = acceptor.clone();
                tokio::spawn(async move {
                    if let Ok(mut tls) = acceptor.accept(stream).await {
                        let mut buf = [0u8; 1];
                        let _ = tls.read(&mut buf).await;
                    }
                });
            }
        });

        (addr, cert)
    }

    #[tokio::test]
    async fn test_fetch_returns_leaf_certificate() {
        let (addr, cert) = spawn_tls_server().await;
        let fetcher = HostCertFetcher::new(FetcherOptions::default()).unwrap();

        let pem_text = fetcher.fetch_leaf_pem(&addr.to_string()).await.unwrap();

        let parsed = pem::parse(&pem_text).unwrap();
        assert_eq!(parsed.tag(), "CERTIFICATE");
        assert_eq!(parsed.contents(), cert.as_ref());
    }

    #[tokio::test]
    async fn test_fetch_by_hostname_ignores_trust() {
        // The certificate is self-signed and untrusted; the fetch must still succeed.
        let (addr, cert) = spawn_tls_server().await;
        let fetcher = HostCertFetcher::new(FetcherOptions::default()).unwrap();

        let pem_text = fetcher
            .fetch_leaf_pem(&format!("localhost:{}", addr.port()))
            .await
            .unwrap();

        assert_eq!(pem::parse(&pem_text).unwrap().contents(), cert.as_ref());
    }

    #[tokio::test]
    async fn test_fetcher_is_reusable_across_hosts() {
        let (first_addr, first_cert) = spawn_tls_server().await;
        let (second_addr, second_cert) = spawn_tls_server().await;
        let fetcher = HostCertFetcher::new(FetcherOptions::default()).unwrap();

        let first = fetcher.fetch_leaf_pem(&first_addr.to_string()).await.unwrap();
        let second = fetcher.fetch_leaf_pem(&second_addr.to_string()).await.unwrap();

        assert_eq!(pem::parse(&first).unwrap().contents(), first_cert.as_ref());
        assert_eq!(pem::parse(&second).unwrap().contents(), second_cert.as_ref());
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn test_fetch_connection_refused() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let fetcher = HostCertFetcher::new(FetcherOptions::default()).unwrap();
        let err = fetcher.fetch_leaf_pem(&addr.to_string()).await.unwrap_err();

        assert!(matches!(err, FetchError::Connect { .. }), "unexpected error: {err}");
    }

    #[tokio::test]
    async fn test_fetch_times_out_on_silent_host() {
        // Accepts TCP through the backlog but never speaks TLS.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let fetcher = HostCertFetcher::new(FetcherOptions {
            timeout: Some(Duration::from_millis(200)),
        })
        .unwrap();
        let err = fetcher.fetch_leaf_pem(&addr.to_string()).await.unwrap_err();

        assert!(matches!(err, FetchError::Timeout { .. }), "unexpected error: {err}");
        drop(listener);
    }

    #[tokio::test]
    async fn test_fetch_rejects_invalid_address() {
        let fetcher = HostCertFetcher::new(FetcherOptions::default()).unwrap();
        let err = fetcher.fetch_leaf_pem("no-port-here").await.unwrap_err();
        assert!(matches!(err, FetchError::InvalidAddress { .. }));
    }

    #[test]
    fn test_leaf_certificate_pem_empty_chain() {
        let err = leaf_certificate_pem("host1:443", &[]).unwrap_err();
        assert!(matches!(err, FetchError::EmptyChain(ref addr) if addr == "host1:443"));
    }

    #[test]
    fn test_leaf_certificate_pem_uses_first_certificate() {
        let (leaf, _) = self_signed("leaf.example");
        let (intermediate, _) = self_signed("intermediate.example");

        let pem_text = leaf_certificate_pem("host1:443", &[leaf.clone(), intermediate]).unwrap();

        assert_eq!(pem::parse(&pem_text).unwrap().contents(), leaf.as_ref());
    }

    #[test]
    fn test_leaf_certificate_pem_armor() {
        let (leaf, _) = self_signed("leaf.example");
        let pem_text = leaf_certificate_pem("host1:443", &[leaf]).unwrap();

        assert!(pem_text.starts_with("-----BEGIN CERTIFICATE-----\n"));
        assert!(pem_text.trim_end().ends_with("-----END CERTIFICATE-----"));
        assert!(!pem_text.contains('\r'));
    }
}
