//! One generate → serialize → send pass.

use std::sync::Arc;

use rand::Rng;
use rand::rngs::SmallRng;
use tracing::{debug, info, warn};

use devsim_common::OutboundMessage;

use crate::error::{Result, SimulatorError};
use crate::generator::TelemetryGenerator;
use crate::stats::PublishStats;
use crate::transport::Transport;

/// The unit of work run on every tick.
///
/// [`run_once`](Self::run_once) never fails: a cycle's error is logged,
/// counted and dropped, so it cannot affect other cycles or the scheduler.
pub struct PublishCycle<T, R = SmallRng> {
    transport: Arc<T>,
    generator: Arc<TelemetryGenerator<R>>,
    stats: Arc<PublishStats>,
    log_telemetry: bool,
}

impl<T, R> Clone for PublishCycle<T, R> {
    fn clone(&self) -> Self {
        Self {
            transport: self.transport.clone(),
            generator: self.generator.clone(),
            stats: self.stats.clone(),
            log_telemetry: self.log_telemetry,
        }
    }
}

impl<T, R> PublishCycle<T, R>
where
    T: Transport,
    R: Rng + Send + 'static,
{
    pub fn new(
        transport: Arc<T>,
        generator: Arc<TelemetryGenerator<R>>,
        stats: Arc<PublishStats>,
        log_telemetry: bool,
    ) -> Self {
        Self {
            transport,
            generator,
            stats,
            log_telemetry,
        }
    }

    /// Run one cycle, logging instead of returning any failure.
    pub async fn run_once(&self) {
        self.stats.record_attempt();

        match self.publish().await {
            Ok(message_id) => {
                self.stats.record_sent();
                debug!(message_id = %message_id, "Telemetry sent");
            }
            Err(e) => {
                self.stats.record_failed();
                warn!(error = %e, "Telemetry send error");
            }
        }
    }

    async fn publish(&self) -> Result<String> {
        let reading = self.generator.generate();
        let message = OutboundMessage::from_reading(&reading)
            .map_err(|e| SimulatorError::send("unassigned", e))?;

        if self.log_telemetry {
            info!(body = %message.body, message_id = %message.message_id, "Sending telemetry");
        } else {
            debug!(body = %message.body, message_id = %message.message_id, "Sending telemetry");
        }

        self.transport.send(&message).await?;

        Ok(message.message_id)
    }
}
