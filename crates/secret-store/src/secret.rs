//! Helpers to build and read TLS certificate Secrets

use k8s_openapi::api::core::v1::Secret;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use std::collections::BTreeMap;

/// Data key holding the PEM certificate
pub const TLS_CERT_KEY: &str = "tls.crt";

/// Build a Secret carrying `certificate_pem` under [`TLS_CERT_KEY`].
///
/// The certificate goes through `stringData`; the API server folds it into
/// `data` on write.
#[must_use]
pub fn tls_secret(name: &str, namespace: &str, certificate_pem: &str) -> Secret {
    Secret {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some(namespace.to_string()),
            ..Default::default()
        },
        string_data: Some(BTreeMap::from([(
            TLS_CERT_KEY.to_string(),
            certificate_pem.to_string(),
        )])),
        ..Default::default()
    }
}

/// Certificate text stored in a Secret, from `data` or else `stringData`.
#[must_use]
pub fn certificate_of(secret: &Secret) -> Option<String> {
    secret
        .data
        .as_ref()
        .and_then(|data| data.get(TLS_CERT_KEY))
        .map(|bytes| String::from_utf8_lossy(&bytes.0).into_owned())
        .or_else(|| {
            secret
                .string_data
                .as_ref()
                .and_then(|data| data.get(TLS_CERT_KEY))
                .cloned()
        })
}
