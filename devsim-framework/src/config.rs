//! Validated publisher settings.

use std::time::Duration;

use devsim_common::KEY_PREFIX;
use devsim_common::keyexpr::validate_prefix;

use crate::error::{Result, SimulatorError};

/// Shortest accepted send interval, in milliseconds.
pub const MIN_SEND_INTERVAL_MS: u64 = 1000;

/// Default send interval, in milliseconds.
pub const DEFAULT_SEND_INTERVAL_MS: u64 = 5000;

/// Default time allowed to establish the session, in milliseconds.
pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 10_000;

/// Default time allowed for in-flight cycles on shutdown, in milliseconds.
pub const DEFAULT_DRAIN_TIMEOUT_MS: u64 = 5000;

/// Settings consumed by the [`LifecycleController`](crate::LifecycleController).
///
/// Built once at startup and never mutated. Use [`validate`](Self::validate)
/// before handing it to the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublisherSettings {
    /// Device connection string.
    pub connection_string: String,
    /// Time between two ticks.
    pub send_interval: Duration,
    /// Log every outgoing body and message id.
    pub log_telemetry: bool,
    /// Key prefix telemetry is published under.
    pub key_prefix: String,
    /// Time allowed to establish the session.
    pub connect_timeout: Duration,
    /// Time allowed for in-flight cycles to finish on shutdown.
    pub drain_timeout: Duration,
}

impl PublisherSettings {
    /// Settings with defaults for everything except the connection string.
    pub fn new(connection_string: impl Into<String>) -> Self {
        Self {
            connection_string: connection_string.into(),
            send_interval: Duration::from_millis(DEFAULT_SEND_INTERVAL_MS),
            log_telemetry: false,
            key_prefix: KEY_PREFIX.to_string(),
            connect_timeout: Duration::from_millis(DEFAULT_CONNECT_TIMEOUT_MS),
            drain_timeout: Duration::from_millis(DEFAULT_DRAIN_TIMEOUT_MS),
        }
    }

    pub fn with_send_interval(mut self, interval: Duration) -> Self {
        self.send_interval = interval;
        self
    }

    pub fn with_log_telemetry(mut self, enabled: bool) -> Self {
        self.log_telemetry = enabled;
        self
    }

    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = prefix.into();
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn with_drain_timeout(mut self, timeout: Duration) -> Self {
        self.drain_timeout = timeout;
        self
    }

    /// Validate the settings.
    ///
    /// The connection string is only checked for presence here; its format is
    /// checked when connecting.
    pub fn validate(&self) -> Result<()> {
        if self.connection_string.trim().is_empty() {
            return Err(SimulatorError::config("Connection string must be set"));
        }

        if self.send_interval < Duration::from_millis(MIN_SEND_INTERVAL_MS) {
            return Err(SimulatorError::config(format!(
                "Send interval is too short: {} ms (minimum {} ms)",
                self.send_interval.as_millis(),
                MIN_SEND_INTERVAL_MS
            )));
        }

        if self.connect_timeout.is_zero() {
            return Err(SimulatorError::config("connect_timeout_ms must be > 0"));
        }

        validate_prefix(&self.key_prefix)
            .map_err(|e| SimulatorError::config(format!("Invalid key prefix: {}", e)))?;

        Ok(())
    }
}
