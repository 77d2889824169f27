//! # switchyard
//!
//! Daemon binary — wires the state store and server together and runs
//! until signalled.

#![deny(unsafe_code)]

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use switchyard_server::config::{self, ServerConfig};
use switchyard_server::metrics;
use switchyard_server::server::SwitchyardServer;
use switchyard_store::StateStore;
use tracing_subscriber::EnvFilter;

/// Switchyard proxy-configuration daemon.
#[derive(Parser, Debug)]
#[command(name = "switchyard", about = "Switchyard proxy-configuration daemon")]
struct Cli {
    /// Host to bind.
    #[arg(long)]
    host: Option<String>,

    /// Port to bind (0 for auto-assign).
    #[arg(long)]
    port: Option<u16>,

    /// Directory for state documents.
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

impl Cli {
    /// Resolve the effective config: defaults, then env, then CLI flags.
    fn resolve_config(self) -> ServerConfig {
        let mut cfg = ServerConfig::default();
        config::apply_env_overrides(&mut cfg);
        if let Some(host) = self.host {
            cfg.host = host;
        }
        if let Some(port) = self.port {
            cfg.port = port;
        }
        if let Some(data_dir) = self.data_dir {
            cfg.data_dir = data_dir;
        }
        cfg
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Cli::parse().resolve_config();

    let metrics_handle = metrics::install_recorder();
    let store = StateStore::new(&config.data_dir);
    let server = SwitchyardServer::new(config, store, metrics_handle);

    let (addr, serve_handle) = server.listen().await.context("failed to bind server")?;
    tracing::info!(%addr, data_dir = %server.store().data_dir().display(), "switchyard ready");

    shutdown_signal().await;
    tracing::info!("shutdown signal received");

    // Tell clients, drop them from the registry, then stop serving.
    server.drain_connections().await;
    server
        .shutdown()
        .graceful_shutdown(vec![serve_handle], None)
        .await;

    Ok(())
}

/// Wait for SIGINT or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();

    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                tokio::select! {
                    result = ctrl_c => {
                        if let Err(e) = result {
                            tracing::warn!(error = %e, "ctrl-c handler failed");
                        }
                    }
                    _ = term.recv() => {}
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "SIGTERM handler unavailable");
                if let Err(e) = ctrl_c.await {
                    tracing::warn!(error = %e, "ctrl-c handler failed");
                }
            }
        }
    }

    #[cfg(not(unix))]
    if let Err(e) = ctrl_c.await {
        tracing::warn!(error = %e, "ctrl-c handler failed");
    }
}
