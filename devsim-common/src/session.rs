use std::time::Duration;

use zenoh::Session;

use crate::config::ZenohConfig;
use crate::error::{Error, Result};

/// Open a Zenoh session using the provided configuration.
///
/// Fails with [`Error::Timeout`] if the session is not established within
/// `timeout`.
pub async fn connect(config: &ZenohConfig, timeout: Duration) -> Result<Session> {
    let zenoh_config = build_zenoh_config(config, timeout)?;

    tracing::info!(
        mode = %config.mode,
        connect = ?config.connect,
        "Connecting to Zenoh"
    );

    let session = tokio::time::timeout(timeout, zenoh::open(zenoh_config))
        .await
        .map_err(|_| Error::Timeout(timeout.as_millis() as u64))??;

    tracing::info!(zid = %session.zid(), "Connected to Zenoh");

    Ok(session)
}

/// Translate a [`ZenohConfig`] into a native Zenoh configuration.
///
/// When endpoints are given, opening the session fails unless one of them
/// answers within `connect_timeout`, whatever the mode.
pub fn build_zenoh_config(
    config: &ZenohConfig,
    connect_timeout: Duration,
) -> Result<zenoh::Config> {
    let mut zenoh_config = zenoh::Config::default();

    let mode_str = match config.mode.as_str() {
        "client" | "peer" => format!("\"{}\"", config.mode),
        other => {
            return Err(Error::Config(format!(
                "Invalid Zenoh mode: '{}'. Expected 'client' or 'peer'",
                other
            )));
        }
    };

    zenoh_config
        .insert_json5("mode", &mode_str)
        .map_err(|e| Error::Config(format!("Failed to set mode: {}", e)))?;

    if !config.connect.is_empty() {
        let endpoints_json = serde_json::to_string(&config.connect)
            .map_err(|e| Error::Config(format!("Failed to serialize connect endpoints: {}", e)))?;

        zenoh_config
            .insert_json5("connect/endpoints", &endpoints_json)
            .map_err(|e| Error::Config(format!("Failed to set connect endpoints: {}", e)))?;

        // Peers default to retrying forever in the background.
        zenoh_config
            .insert_json5("connect/exit_on_failure", "true")
            .map_err(|e| Error::Config(format!("Failed to set connect/exit_on_failure: {}", e)))?;

        zenoh_config
            .insert_json5("connect/timeout_ms", &connect_timeout.as_millis().to_string())
            .map_err(|e| Error::Config(format!("Failed to set connect/timeout_ms: {}", e)))?;
    }

    Ok(zenoh_config)
}
