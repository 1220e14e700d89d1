//! ZenSight Device Simulator Framework
//!
//! The publish loop of a simulated telemetry device.
//!
//! # Overview
//!
//! This framework provides:
//! - [`Connector`] / [`Transport`] for the session to the ingestion endpoint,
//!   with [`ZenohConnector`] as the production implementation
//! - [`TelemetryGenerator`] for synthetic readings from an injectable RNG
//! - [`PublishCycle`] for one isolated generate → serialize → send pass
//! - [`LifecycleController`] for connecting, ticking, draining and closing
//! - [`PublisherSettings`] for the validated configuration record
//! - [`SimulatorError`] for categorized failures
//!
//! # Example
//!
//! ```ignore
//! use devsim_framework::{
//!     LifecycleController, PublisherSettings, TelemetryGenerator, ZenohConnector,
//!     spawn_shutdown_listener,
//! };
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = PublisherSettings::new("Endpoint=tcp/127.0.0.1:7447;DeviceId=sim01");
//!     settings.validate()?;
//!
//!     let controller = LifecycleController::new(
//!         settings.clone(),
//!         ZenohConnector::from_settings(&settings),
//!         TelemetryGenerator::from_os_rng(),
//!     );
//!
//!     // Run until Ctrl+C
//!     controller.run(spawn_shutdown_listener()).await?;
//!     Ok(())
//! }
//! ```

mod config;
mod controller;
mod cycle;
mod error;
mod generator;
mod signal;
mod stats;
mod transport;

pub use config::{
    DEFAULT_CONNECT_TIMEOUT_MS, DEFAULT_DRAIN_TIMEOUT_MS, DEFAULT_SEND_INTERVAL_MS,
    MIN_SEND_INTERVAL_MS, PublisherSettings,
};
pub use controller::{LifecycleController, LifecycleState, RunSummary};
pub use cycle::PublishCycle;
pub use error::{ErrorKind, Result, SimulatorError};
pub use generator::TelemetryGenerator;
pub use signal::{shutdown_signal, spawn_shutdown_listener};
pub use stats::{PublishSnapshot, PublishStats};
pub use transport::{Connector, Transport, ZenohConnector, ZenohTransport};

// Re-export commonly used types from devsim-common
pub use devsim_common::{LogFormat, LoggingConfig, OutboundMessage, Reading};
