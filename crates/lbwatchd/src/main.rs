//! lbwatchd — the lbwatch exporter daemon.
//!
//! Single binary that assembles the exporter:
//! - Gauge registry
//! - Hetzner Cloud client
//! - Refresh worker
//! - Exposition server
//! - Signal-driven shutdown
//!
//! # Usage
//!
//! ```text
//! HETZNER_API_TOKEN=... lbwatchd --web.listen-address :9115
//! ```

mod config;

use clap::Parser;
use tokio::net::TcpListener;
use tracing::{error, info};

use lbwatch_hcloud::{HcloudClient, HcloudConfig};
use lbwatch_metrics::{register_gauges, Registry};
use lbwatch_worker::{coordinate, RefreshWorker, ShutdownConfig, WorkerConfig};

use crate::config::{Cli, LogFormat};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_format);

    if let Err(e) = run(cli).await {
        error!(error = %e, "lbwatchd exiting with error");
        return Err(e);
    }
    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,lbwatch=debug"));

    match format {
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(filter).init(),
        LogFormat::Json => tracing_subscriber::fmt().json().with_env_filter(filter).init(),
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    info!(version = env!("CARGO_PKG_VERSION"), "lbwatchd starting");

    // ── Registry ───────────────────────────────────────────────

    let registry = Registry::new();
    register_gauges(&registry).await?;

    // ── Provider client ────────────────────────────────────────

    let client = HcloudClient::new(HcloudConfig {
        endpoint: cli.endpoint.clone(),
        token: cli.api_key,
        request_timeout: cli.request_timeout,
    })?;
    info!(endpoint = %cli.endpoint, "hetzner cloud client initialized");

    // ── Exposition server ──────────────────────────────────────

    let listener = TcpListener::bind(cli.listen_address).await?;
    let server = lbwatch_api::ServerHandle::spawn(listener, lbwatch_api::build_router(registry.clone()))?;

    // ── Refresh worker ─────────────────────────────────────────

    let worker = RefreshWorker::new(
        client,
        registry,
        WorkerConfig {
            interval: cli.refresh_interval,
            max_backoff: cli.max_backoff,
        },
    )
    .spawn();

    // ── Shutdown ───────────────────────────────────────────────

    coordinate(
        worker,
        shutdown_signal(),
        move || server.shutdown(),
        ShutdownConfig {
            ack_timeout: cli.ack_timeout,
            drain_timeout: cli.drain_timeout,
        },
    )
    .await?;

    info!("lbwatchd stopped");
    Ok(())
}

/// Resolves on SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "failed to listen for SIGINT");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
