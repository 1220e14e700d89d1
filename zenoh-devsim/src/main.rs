//! Simulated telemetry device for Zenoh.
//!
//! Publishes a synthetic temperature/humidity reading at a fixed interval
//! until Ctrl+C or SIGTERM.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};

use devsim_common::{ConnectionString, init_tracing};
use devsim_framework::spawn_shutdown_listener;

use zenoh_devsim::args::DevsimArgs;
use zenoh_devsim::config::DevsimConfig;

#[tokio::main]
async fn main() -> ExitCode {
    let args = DevsimArgs::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if tracing::dispatcher::has_been_set() {
                error!(error = %format!("{:#}", e), "Device simulator exiting");
            } else {
                eprintln!("Error: {:#}", e);
            }
            ExitCode::from(zenoh_devsim::exit_status(&e))
        }
    }
}

async fn run(args: DevsimArgs) -> Result<()> {
    let config = DevsimConfig::from_args(&args);

    // Initialize logging first so configuration errors are reported through it
    let log_config = match &config {
        Ok(config) => config.logging.clone(),
        Err(_) => {
            let mut fallback = DevsimConfig::default();
            fallback.apply_args(&args);
            fallback.logging
        }
    };
    init_tracing(&log_config).context("Failed to initialize logging")?;

    let config = config?;
    let settings = config.publisher_settings()?;

    match ConnectionString::parse(&settings.connection_string) {
        Ok(cs) => info!(
            device = %cs.device_id,
            endpoints = ?cs.endpoints,
            mode = cs.mode.as_str(),
            interval_ms = settings.send_interval.as_millis() as u64,
            "Starting zenoh-devsim"
        ),
        Err(_) => info!("Starting zenoh-devsim"),
    }

    let summary = zenoh_devsim::run(settings, spawn_shutdown_listener()).await?;

    info!(
        sent = summary.publish.sent,
        failed = summary.publish.failed,
        "Device simulator stopped"
    );

    Ok(())
}
