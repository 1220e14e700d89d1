//! ZenSight Device Simulator Common Library
//!
//! Shared types and utilities for the simulated device publisher:
//!
//! - [`telemetry`] - Simulated readings and outbound messages
//! - [`credential`] - Device connection string parsing
//! - [`config`] - Configuration loading (JSON5 format)
//! - [`session`] - Zenoh session management
//! - [`keyexpr`] - Key expression builders and validation
//! - [`error`] - Error types

pub mod config;
pub mod credential;
pub mod error;
pub mod keyexpr;
pub mod session;
pub mod telemetry;

// Re-export commonly used types at the crate root
pub use config::{LogFormat, LoggingConfig, ZenohConfig, load_config, parse_config};
pub use credential::{ConnectionString, SessionMode};
pub use error::{Error, Result};
pub use keyexpr::{KEY_PREFIX, all_devices_wildcard, telemetry_key};
pub use session::connect;
pub use telemetry::{CONTENT_ENCODING, CONTENT_TYPE, OutboundMessage, Reading};

/// Initialize tracing with the given configuration.
///
/// `RUST_LOG` takes precedence over the configured level when set.
///
/// # Example
///
/// ```ignore
/// use devsim_common::{LoggingConfig, LogFormat, init_tracing};
///
/// let config = LoggingConfig {
///     level: "info".to_string(),
///     format: LogFormat::Json,
/// };
/// init_tracing(&config)?;
/// ```
pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    match config.format {
        LogFormat::Text => {
            tracing_subscriber::registry()
                .with(fmt::layer())
                .with(filter)
                .try_init()
                .map_err(|e| Error::Config(format!("Failed to initialize tracing: {}", e)))?;
        }
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(fmt::layer().json())
                .with(filter)
                .try_init()
                .map_err(|e| Error::Config(format!("Failed to initialize tracing: {}", e)))?;
        }
    }

    Ok(())
}
