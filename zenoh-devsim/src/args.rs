//! CLI argument parsing.

use std::path::PathBuf;

use clap::Parser;

/// Simulated temperature/humidity device publishing to Zenoh.
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "zenoh-devsim")]
#[command(about = "Publishes simulated telemetry to Zenoh")]
#[command(version)]
pub struct DevsimArgs {
    /// Device connection string (Endpoint=<locator>;DeviceId=<id>[;Mode=client|peer]).
    #[arg(short = 'c', long = "connection-string", visible_alias = "connectionString")]
    pub connection_string: Option<String>,

    /// Telemetry send interval in milliseconds (minimum 1000, default 5000).
    #[arg(short = 's', long = "send-interval", visible_alias = "sendInterval")]
    pub send_interval: Option<u64>,

    /// Log every telemetry message sent.
    #[arg(short = 'l', long)]
    pub logging: bool,

    /// Path to an optional configuration file (JSON5 format).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Override the key expression prefix.
    #[arg(long)]
    pub key_prefix: Option<String>,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,
}
