//! Command-line configuration.
//!
//! Flags are parsed once at startup into an immutable [`Config`]. The
//! repeatable `--secret-name` and `--tls-host` flags are paired by position,
//! so their counts must match.

use crate::error::ControllerError;
use crate::kube_client::ConnectionMode;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Seconds between the end of one synchronization and the start of the next
pub const DEFAULT_INTERVAL_SECONDS: u64 = 20;

/// Copies the TLS certificate served by each host into a Kubernetes Secret
#[derive(Parser, Debug)]
#[command(name = "cert-sync-controller", version, about, long_about = None)]
pub struct Cli {
    /// What type of connection to use: "kubectl" reads a kubeconfig file,
    /// any other value uses the in-cluster service account
    #[arg(long, env = "CONNECTION_MODE", default_value = "kubectl")]
    pub connection_mode: String,

    /// Path to the kubeconfig file [default: ~/.kube/config]
    #[arg(long, env = "KUBECONFIG_PATH")]
    pub kubeconfig: Option<PathBuf>,

    /// Namespace where the Secrets are synchronized
    #[arg(long, env = "SYNC_NAMESPACE", default_value = "default")]
    pub namespace: String,

    /// Name of a Secret to create with the PEM certificate (repeatable,
    /// paired with --tls-host by position)
    #[arg(long = "secret-name", value_name = "NAME")]
    pub secret_names: Vec<String>,

    /// HOST:PORT dialed to get a TLS certificate (repeatable)
    #[arg(long = "tls-host", value_name = "HOST:PORT")]
    pub tls_hosts: Vec<String>,

    /// Seconds to wait between synchronizations
    #[arg(long, env = "SYNC_INTERVAL_SECONDS", default_value_t = DEFAULT_INTERVAL_SECONDS)]
    pub interval_seconds: u64,

    /// Timeout in seconds for connecting to a TLS host [default: none]
    #[arg(long, env = "TLS_TIMEOUT_SECONDS")]
    pub tls_timeout_seconds: Option<u64>,
}

/// A Secret and the host whose certificate it holds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncTarget {
    /// Secret name
    pub secret_name: String,
    /// `host:port` to fetch the certificate from
    pub tls_host: String,
}

/// Validated controller configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// How to reach the cluster
    pub connection_mode: ConnectionMode,
    /// kubeconfig used in kubectl mode
    pub kubeconfig: PathBuf,
    /// Target namespace
    pub namespace: String,
    /// Secrets to synchronize, in flag order
    pub targets: Vec<SyncTarget>,
    /// Pause between cycles
    pub interval: Duration,
    /// Connect and handshake timeout per host
    pub tls_timeout: Option<Duration>,
}

impl TryFrom<Cli> for Config {
    type Error = ControllerError;

    fn try_from(cli: Cli) -> Result<Self, Self::Error> {
        if cli.secret_names.len() != cli.tls_hosts.len() {
            return Err(ControllerError::InvalidConfig(format!(
                "The number of Secrets to generate and the TLS hosts to visit must be the same \
                 ({} secret names, {} TLS hosts)",
                cli.secret_names.len(),
                cli.tls_hosts.len()
            )));
        }
        if cli.interval_seconds == 0 {
            return Err(ControllerError::InvalidConfig(
                "interval-seconds must be greater than zero".to_string(),
            ));
        }

        let targets = cli
            .secret_names
            .into_iter()
            .zip(cli.tls_hosts)
            .map(|(secret_name, tls_host)| SyncTarget {
                secret_name,
                tls_host,
            })
            .collect();

        Ok(Self {
            connection_mode: ConnectionMode::from(cli.connection_mode.as_str()),
            kubeconfig: cli.kubeconfig.unwrap_or_else(default_kubeconfig),
            namespace: cli.namespace,
            targets,
            interval: Duration::from_secs(cli.interval_seconds),
            tls_timeout: cli.tls_timeout_seconds.map(Duration::from_secs),
        })
    }
}

/// `<home>/.kube/config`, relative to the working directory if there is no home
fn default_kubeconfig() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_default()
        .join(".kube")
        .join("config")
}
