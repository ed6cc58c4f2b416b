//! Command line and environment configuration.

use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

use clap::{Parser, ValueEnum};
use thiserror::Error;

use lbwatch_core::parse_duration;
use lbwatch_hcloud::DEFAULT_ENDPOINT;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid duration {0:?} (expected e.g. 500ms, 5s, 2m)")]
    Duration(String),

    #[error("duration must be greater than zero")]
    ZeroDuration,

    #[error("invalid listen address {0:?} (expected host:port or :port)")]
    ListenAddress(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "lbwatchd", about = "Hetzner Cloud load balancer exporter", version)]
pub struct Cli {
    /// Hetzner Cloud API token.
    #[arg(long = "hetzner.api-key", env = "HETZNER_API_TOKEN", hide_env_values = true)]
    pub api_key: String,

    /// Hetzner Cloud API base URL.
    #[arg(long = "hetzner.endpoint", env = "HETZNER_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// Transport timeout for a single API request.
    #[arg(
        long = "hetzner.request-timeout",
        env = "HETZNER_REQUEST_TIMEOUT",
        default_value = "30s",
        value_parser = duration_arg
    )]
    pub request_timeout: Duration,

    /// Address to listen on for telemetry (`:port` listens on all interfaces).
    #[arg(
        long = "web.listen-address",
        env = "WEB_LISTEN_ADDRESS",
        default_value = ":9115",
        value_parser = listen_address_arg
    )]
    pub listen_address: SocketAddr,

    /// Wait between two polls of the API.
    #[arg(long = "refresh.interval", env = "REFRESH_INTERVAL", default_value = "2s", value_parser = duration_arg)]
    pub refresh_interval: Duration,

    /// Longest wait between polls while the API keeps failing.
    #[arg(
        long = "refresh.max-backoff",
        env = "REFRESH_MAX_BACKOFF",
        default_value = "60s",
        value_parser = duration_arg
    )]
    pub max_backoff: Duration,

    /// How long shutdown waits for the refresh worker to stop.
    #[arg(
        long = "shutdown.ack-timeout",
        env = "SHUTDOWN_ACK_TIMEOUT",
        default_value = "10s",
        value_parser = duration_arg
    )]
    pub ack_timeout: Duration,

    /// How long shutdown waits for in-flight scrapes.
    #[arg(
        long = "shutdown.drain-timeout",
        env = "SHUTDOWN_DRAIN_TIMEOUT",
        default_value = "5s",
        value_parser = duration_arg
    )]
    pub drain_timeout: Duration,

    /// Log output format.
    #[arg(long = "log.format", env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

fn duration_arg(s: &str) -> Result<Duration, ConfigError> {
    let duration = parse_duration(s).ok_or_else(|| ConfigError::Duration(s.to_string()))?;
    if duration.is_zero() {
        return Err(ConfigError::ZeroDuration);
    }
    Ok(duration)
}

/// Parse `host:port`, or `:port` for all IPv4 interfaces.
fn listen_address_arg(s: &str) -> Result<SocketAddr, ConfigError> {
    let s = s.trim();
    if let Some(port) = s.strip_prefix(':') {
        let port: u16 = port
            .parse()
            .map_err(|_| ConfigError::ListenAddress(s.to_string()))?;
        return Ok(SocketAddr::from((Ipv4Addr::UNSPECIFIED, port)));
    }
    s.parse()
        .map_err(|_| ConfigError::ListenAddress(s.to_string()))
}
