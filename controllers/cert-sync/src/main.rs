//! Certificate Sync Controller
//!
//! Copies the TLS certificate served by each configured `host:port` into a
//! Kubernetes Secret (`tls.crt`, PEM) and keeps it current by fetching it
//! again on a fixed interval.
//!
//! The certificates are retrieved without any trust verification; see the
//! `tls-fetcher` crate.

mod builder;
mod config;
mod controller;
mod error;
mod kube_client;
mod reconciler;
#[cfg(test)]
mod test_utils;

use crate::config::{Cli, Config};
use crate::controller::Controller;
use crate::error::ControllerError;
use crate::kube_client::ConnectionMode;
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), ControllerError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // kube and the certificate fetcher both build rustls configs
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        warn!("A rustls crypto provider was already installed");
    }

    info!("Starting Certificate Sync Controller");

    let config = Config::try_from(Cli::parse()).map_err(|e| {
        error!("{}", e);
        e
    })?;

    info!("Configuration:");
    info!("  Connection mode: {}", config.connection_mode);
    if config.connection_mode == ConnectionMode::Kubectl {
        info!("  Kubeconfig: {}", config.kubeconfig.display());
    }
    info!("  Namespace: {}", config.namespace);
    info!("  Interval: {}s", config.interval.as_secs());
    for target in &config.targets {
        info!("  Secret {} <- {}", target.secret_name, target.tls_host);
    }

    // Initialize and run controller
    let controller = Controller::new(&config).await?;
    controller.run().await?;

    Ok(())
}
