//! Kubernetes client construction.
//!
//! The controller runs either outside the cluster with a kubeconfig file
//! (the way kubectl connects) or inside it with the pod's service account.

use crate::error::ControllerError;
use kube::Client;
use kube::config::{Config, KubeConfigOptions, Kubeconfig};
use std::fmt;
use std::path::Path;
use tracing::info;

/// How credentials for the API server are discovered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionMode {
    /// Load credentials from a kubeconfig file
    Kubectl,
    /// Use the service account mounted into the pod
    InCluster,
}

impl From<&str> for ConnectionMode {
    fn from(value: &str) -> Self {
        if value == "kubectl" {
            Self::Kubectl
        } else {
            Self::InCluster
        }
    }
}

impl fmt::Display for ConnectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Kubectl => write!(f, "kubectl"),
            Self::InCluster => write!(f, "incluster"),
        }
    }
}

/// Build a Kubernetes client for `mode`. `kubeconfig` is only read in
/// kubectl mode.
pub async fn create_client(
    mode: ConnectionMode,
    kubeconfig: &Path,
) -> Result<Client, ControllerError> {
    let config = match mode {
        ConnectionMode::InCluster => {
            info!("Using in-cluster service account credentials");
            Config::incluster().map_err(|e| {
                ControllerError::KubeConfig(format!("in-cluster configuration unavailable: {e}"))
            })?
        }
        ConnectionMode::Kubectl => {
            info!("Using kubeconfig {}", kubeconfig.display());
            let file = Kubeconfig::read_from(kubeconfig).map_err(|e| {
                ControllerError::KubeConfig(format!(
                    "failed to read kubeconfig {}: {e}",
                    kubeconfig.display()
                ))
            })?;
            Config::from_custom_kubeconfig(file, &KubeConfigOptions::default())
                .await
                .map_err(|e| {
                    ControllerError::KubeConfig(format!("failed to load kubeconfig: {e}"))
                })?
        }
    };

    Ok(Client::try_from(config)?)
}
