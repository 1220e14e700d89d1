//! Simulated telemetry device for Zenoh.
//!
//! Connects to a Zenoh router (or joins as a peer) using a device connection
//! string, then publishes a synthetic temperature/humidity reading on every
//! tick until Ctrl+C or SIGTERM.
//!
//! # Key Expressions
//!
//! ```text
//! zensight/devsim/<device_id>/telemetry
//! ```
//!
//! # Payload
//!
//! ```text
//! {"Temperature":23.41,"Humidity":61.07}
//! ```
//!
//! Encoding `application/json;utf-8`; the attachment carries the message id.

pub mod args;
pub mod config;

use tokio::sync::watch;

use devsim_framework::{
    ErrorKind, LifecycleController, PublisherSettings, RunSummary, SimulatorError,
    TelemetryGenerator, ZenohConnector,
};

/// Exit status for a configuration error.
pub const EXIT_CONFIGURATION: u8 = 2;

/// Exit status for a connection error or any other startup failure.
pub const EXIT_FAILURE: u8 = 1;

/// Run the simulator against Zenoh until `shutdown` fires.
pub async fn run(
    settings: PublisherSettings,
    shutdown: watch::Receiver<bool>,
) -> Result<RunSummary, SimulatorError> {
    let connector = ZenohConnector::from_settings(&settings);
    let controller =
        LifecycleController::new(settings, connector, TelemetryGenerator::from_os_rng());

    controller.run(shutdown).await
}

/// Process exit status for a failed run.
pub fn exit_status(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<SimulatorError>().map(SimulatorError::kind) {
        Some(ErrorKind::Configuration) => EXIT_CONFIGURATION,
        _ => EXIT_FAILURE,
    }
}
