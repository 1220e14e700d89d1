//! Configuration for the device simulator.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use devsim_common::{KEY_PREFIX, LoggingConfig};
use devsim_framework::{
    DEFAULT_CONNECT_TIMEOUT_MS, DEFAULT_DRAIN_TIMEOUT_MS, DEFAULT_SEND_INTERVAL_MS,
    PublisherSettings, SimulatorError,
};

use crate::args::DevsimArgs;

/// Complete simulator configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DevsimConfig {
    /// Simulated device settings.
    #[serde(default)]
    pub simulator: SimulatorConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Simulated device settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulatorConfig {
    /// Device connection string.
    #[serde(default)]
    pub connection_string: String,

    /// Send interval in milliseconds (default: 5000, minimum: 1000).
    #[serde(default = "default_send_interval")]
    pub send_interval_ms: u64,

    /// Log every telemetry message sent.
    #[serde(default)]
    pub log_telemetry: bool,

    /// Key expression prefix (default: "zensight/devsim").
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,

    /// Time allowed to establish the Zenoh session (default: 10000).
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_ms: u64,

    /// Time allowed for in-flight sends on shutdown (default: 5000).
    #[serde(default = "default_drain_timeout")]
    pub drain_timeout_ms: u64,
}

fn default_send_interval() -> u64 {
    DEFAULT_SEND_INTERVAL_MS
}

fn default_key_prefix() -> String {
    KEY_PREFIX.to_string()
}

fn default_connect_timeout() -> u64 {
    DEFAULT_CONNECT_TIMEOUT_MS
}

fn default_drain_timeout() -> u64 {
    DEFAULT_DRAIN_TIMEOUT_MS
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            connection_string: String::new(),
            send_interval_ms: default_send_interval(),
            log_telemetry: false,
            key_prefix: default_key_prefix(),
            connect_timeout_ms: default_connect_timeout(),
            drain_timeout_ms: default_drain_timeout(),
        }
    }
}

impl DevsimConfig {
    /// Load configuration from a JSON5 file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, SimulatorError> {
        devsim_common::load_config(path).map_err(|e| SimulatorError::config(e.to_string()))
    }

    /// Build the configuration from CLI arguments, reading `--config` first
    /// when given. CLI values take precedence over file values.
    pub fn from_args(args: &DevsimArgs) -> Result<Self, SimulatorError> {
        let mut config = match &args.config {
            Some(path) => Self::load_from_file(path)?,
            None => Self::default(),
        };
        config.apply_args(args);
        Ok(config)
    }

    /// Overlay CLI arguments on this configuration.
    pub fn apply_args(&mut self, args: &DevsimArgs) {
        if let Some(ref cs) = args.connection_string {
            self.simulator.connection_string = cs.clone();
        }
        if let Some(interval) = args.send_interval {
            self.simulator.send_interval_ms = interval;
        }
        if args.logging {
            self.simulator.log_telemetry = true;
        }
        if let Some(ref prefix) = args.key_prefix {
            self.simulator.key_prefix = prefix.clone();
        }
        if let Some(ref level) = args.log_level {
            self.logging.level = level.clone();
        }
    }

    /// Validated settings for the publish loop.
    pub fn publisher_settings(&self) -> Result<PublisherSettings, SimulatorError> {
        let sim = &self.simulator;

        let settings = PublisherSettings::new(sim.connection_string.trim())
            .with_send_interval(Duration::from_millis(sim.send_interval_ms))
            .with_log_telemetry(sim.log_telemetry)
            .with_key_prefix(sim.key_prefix.clone())
            .with_connect_timeout(Duration::from_millis(sim.connect_timeout_ms))
            .with_drain_timeout(Duration::from_millis(sim.drain_timeout_ms));

        if let Err(e) = settings.validate() {
            tracing::error!(error = %e, "Configuration error");
            return Err(e);
        }
        Ok(settings)
    }
}
