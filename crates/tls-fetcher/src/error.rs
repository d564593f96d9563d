//! Certificate fetch errors

use thiserror::Error;

/// Errors that can occur while retrieving a certificate from a TLS host
#[derive(Debug, Error)]
pub enum FetchError {
    /// The target is not a valid `host:port` string
    #[error("Invalid address {address}: {reason}")]
    InvalidAddress {
        /// Address as supplied by the caller
        address: String,
        /// What is wrong with it
        reason: String,
    },

    /// The host part cannot be used as a TLS server name
    #[error("Invalid server name: {0}")]
    InvalidServerName(String),

    /// TCP connection could not be established
    #[error("Failed to connect to {address}: {source}")]
    Connect {
        /// Address being dialed
        address: String,
        /// Underlying socket error
        #[source]
        source: std::io::Error,
    },

    /// TLS handshake failed
    #[error("TLS handshake with {address} failed: {source}")]
    Handshake {
        /// Address being dialed
        address: String,
        /// Underlying TLS/socket error
        #[source]
        source: std::io::Error,
    },

    /// Connect and handshake did not finish within the configured timeout
    #[error("Timed out after {seconds}s fetching the certificate of {address}")]
    Timeout {
        /// Address being dialed
        address: String,
        /// Configured timeout
        seconds: u64,
    },

    /// The peer completed the handshake without presenting any certificate
    #[error("No certificates presented by {0}")]
    EmptyChain(String),

    /// The TLS client configuration could not be built
    #[error("TLS configuration error: {0}")]
    Tls(#[from] rustls::Error),
}
