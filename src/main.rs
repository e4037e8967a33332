//! Client-certificate access gate.
//!
//! # Architecture Overview
//!
//! ```text
//!                 ┌──────────────────────────────────────────────────────┐
//!                 │                      CERT GATE                       │
//!   TLS proxy     │  ┌─────────┐    ┌─────────┐    ┌──────────────┐      │
//!   (verdict +  ──┼─▶│  http   │───▶│  gate   │───▶│   identity   │      │
//!    subject)     │  │ server  │    │ verdict │    │   DN parser  │      │
//!                 │  └────┬────┘    └────┬────┘    └──────┬───────┘      │
//!                 │       │              │ deny           │ allow        │
//!                 │       │              ▼                ▼              │
//!   Response      │  ┌────┴────┐    ┌─────────┐    ┌──────────────┐      │
//!   ◀─────────────┼──│response │◀───│ outcome │◀───│    audit     │──▶ user_access.log
//!                 │  │  pages  │    │         │    │  file sink   │      │
//!                 │  └─────────┘    └─────────┘    └──────────────┘      │
//!                 │                                                      │
//!                 │  config · observability · lifecycle                  │
//!                 └──────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use cert_gate::config::{load_config, validate_config, ConfigError, GateConfig};
use cert_gate::lifecycle::{wait_for_signal, Shutdown};
use cert_gate::observability::{logging, metrics};
use cert_gate::HttpServer;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "cert-gate")]
#[command(about = "Client-certificate access gate behind a TLS-terminating proxy")]
struct Args {
    /// Path to the TOML configuration file
    #[arg(long, env = "CERT_GATE_CONFIG")]
    config: Option<PathBuf>,

    /// Bind address, overrides listener.bind_address
    #[arg(long, env = "CERT_GATE_BIND")]
    bind: Option<String>,

    /// Audit log path, overrides audit.path
    #[arg(long, env = "CERT_GATE_AUDIT_LOG")]
    audit_log: Option<PathBuf>,
}

fn resolve_config(args: &Args) -> Result<GateConfig, ConfigError> {
    let mut config = match args.config {
        Some(ref path) => load_config(path)?,
        None => GateConfig::default(),
    };

    if let Some(ref bind) = args.bind {
        config.listener.bind_address = bind.clone();
    }
    if let Some(ref path) = args.audit_log {
        config.audit.path = path.clone();
    }

    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = resolve_config(&args)?;

    logging::init_logging(&config.observability)?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        bind_address = %config.listener.bind_address,
        audit_log = ?config.audit.path,
        verify_header = %config.proxy.verify_header,
        subject_header = %config.proxy.subject_header,
        "cert-gate starting"
    );

    if config.observability.metrics_enabled {
        let addr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config)?;
    let server_shutdown = shutdown.subscribe();
    let signal_shutdown = shutdown.clone();
    tokio::spawn(async move {
        wait_for_signal().await;
        signal_shutdown.trigger();
    });

    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
