//! Test utilities for unit testing the controller
//!
//! Helpers for building targets and certificate text without a network.

use crate::config::SyncTarget;

/// PEM-armored placeholder whose body identifies where it came from
pub fn fake_pem(label: &str) -> String {
    format!("-----BEGIN CERTIFICATE-----\n{label}\n-----END CERTIFICATE-----\n")
}

/// Targets from `(secret name, host:port)` pairs
pub fn targets(pairs: &[(&str, &str)]) -> Vec<SyncTarget> {
    pairs
        .iter()
        .map(|(secret_name, tls_host)| SyncTarget {
            secret_name: (*secret_name).to_string(),
            tls_host: (*tls_host).to_string(),
        })
        .collect()
}
