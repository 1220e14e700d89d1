//! Scheduler and lifecycle control.

use std::fmt;
use std::sync::Arc;

use rand::Rng;
use rand::rngs::SmallRng;
use tokio::sync::watch;
use tokio::task::{JoinError, JoinSet};
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use crate::config::PublisherSettings;
use crate::cycle::PublishCycle;
use crate::error::Result;
use crate::generator::TelemetryGenerator;
use crate::stats::{PublishSnapshot, PublishStats};
use crate::transport::{Connector, Transport};

/// Lifecycle of the publisher.
///
/// ```text
/// Idle → Connecting → Running → Draining → Stopped
///             └──────────────────────────────↗ (connection error)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Idle,
    Connecting,
    Running,
    Draining,
    Stopped,
}

impl LifecycleState {
    pub fn as_str(&self) -> &'static str {
        match self {
            LifecycleState::Idle => "idle",
            LifecycleState::Connecting => "connecting",
            LifecycleState::Running => "running",
            LifecycleState::Draining => "draining",
            LifecycleState::Stopped => "stopped",
        }
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a completed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Ticks fired while running.
    pub ticks: u64,
    /// Publish counters at shutdown.
    pub publish: PublishSnapshot,
    /// Cycles still in flight when shutdown began that finished in time.
    pub drained: usize,
    /// Cycles aborted because the drain timeout elapsed.
    pub aborted: usize,
}

/// Owns the ticking clock and the connection.
///
/// Handles:
/// - Connecting once (a failure ends the run)
/// - Spawning one independent [`PublishCycle`] per tick
/// - Stopping the clock on cancellation
/// - Draining in-flight cycles within `drain_timeout`
/// - Closing the connection exactly once
///
/// # Example
///
/// ```ignore
/// use devsim_framework::{LifecycleController, PublisherSettings, TelemetryGenerator, ZenohConnector};
///
/// let settings = PublisherSettings::new(connection_string);
/// settings.validate()?;
///
/// let controller = LifecycleController::new(
///     settings.clone(),
///     ZenohConnector::from_settings(&settings),
///     TelemetryGenerator::from_os_rng(),
/// );
///
/// let summary = controller.run(shutdown_rx).await?;
/// ```
pub struct LifecycleController<C, R = SmallRng> {
    settings: PublisherSettings,
    connector: C,
    generator: Arc<TelemetryGenerator<R>>,
    stats: Arc<PublishStats>,
    state: watch::Sender<LifecycleState>,
}

impl<C, R> LifecycleController<C, R>
where
    C: Connector,
    R: Rng + Send + 'static,
{
    /// Create a controller in the `Idle` state.
    ///
    /// `settings` are expected to be validated already.
    pub fn new(
        settings: PublisherSettings,
        connector: C,
        generator: TelemetryGenerator<R>,
    ) -> Self {
        let (state, _) = watch::channel(LifecycleState::Idle);

        Self {
            settings,
            connector,
            generator: Arc::new(generator),
            stats: Arc::new(PublishStats::new()),
            state,
        }
    }

    /// Current state.
    pub fn state(&self) -> LifecycleState {
        *self.state.borrow()
    }

    /// Watch state transitions.
    pub fn subscribe(&self) -> watch::Receiver<LifecycleState> {
        self.state.subscribe()
    }

    /// Shared publish counters.
    pub fn stats(&self) -> Arc<PublishStats> {
        self.stats.clone()
    }

    /// Get a reference to the settings.
    pub fn settings(&self) -> &PublisherSettings {
        &self.settings
    }

    /// Connect, publish on every tick until `shutdown` turns `true` (or its
    /// sender is dropped), then drain and close.
    ///
    /// Only a connection failure is returned as an error; cycle failures are
    /// logged and counted.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) -> Result<RunSummary> {
        self.transition(LifecycleState::Connecting);

        let transport = match self
            .connector
            .connect(&self.settings.connection_string)
            .await
        {
            Ok(transport) => Arc::new(transport),
            Err(e) => {
                error!(error = %e, "Connection error");
                self.transition(LifecycleState::Stopped);
                return Err(e);
            }
        };

        let cycle = PublishCycle::new(
            transport.clone(),
            self.generator.clone(),
            self.stats.clone(),
            self.settings.log_telemetry,
        );

        self.transition(LifecycleState::Running);

        info!(
            interval_ms = self.settings.send_interval.as_millis() as u64,
            log_telemetry = self.settings.log_telemetry,
            "Publishing telemetry. Press Ctrl+C to stop."
        );

        let period = self.settings.send_interval;
        let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut in_flight = JoinSet::new();
        let mut ticks = 0u64;
        let mut cancelled = *shutdown.borrow_and_update();

        while !cancelled {
            tokio::select! {
                biased;

                changed = shutdown.changed() => {
                    cancelled = changed.is_err() || *shutdown.borrow_and_update();
                }
                _ = ticker.tick() => {
                    ticks += 1;
                    let cycle = cycle.clone();
                    in_flight.spawn(async move { cycle.run_once().await });

                    while let Some(result) = in_flight.try_join_next() {
                        log_join_result(result);
                    }
                }
            }
        }

        info!(ticks, "Received shutdown signal");
        self.transition(LifecycleState::Draining);

        let pending = in_flight.len();
        if pending > 0 {
            info!(in_flight = pending, "Waiting for in-flight cycles");
        }

        let aborted =
            match tokio::time::timeout(self.settings.drain_timeout, drain(&mut in_flight)).await {
                Ok(()) => 0,
                Err(_) => {
                    let remaining = in_flight.len();
                    warn!(
                        remaining,
                        timeout_ms = self.settings.drain_timeout.as_millis() as u64,
                        "Drain timeout elapsed, aborting in-flight cycles"
                    );
                    in_flight.abort_all();
                    while in_flight.join_next().await.is_some() {}
                    remaining
                }
            };

        transport.close().await;
        self.transition(LifecycleState::Stopped);

        let summary = RunSummary {
            ticks,
            publish: self.stats.snapshot(),
            drained: pending - aborted,
            aborted,
        };

        info!(
            ticks = summary.ticks,
            sent = summary.publish.sent,
            failed = summary.publish.failed,
            aborted = summary.aborted,
            success_rate = %format_args!("{:.1}%", summary.publish.success_rate()),
            "Final statistics"
        );

        Ok(summary)
    }

    fn transition(&self, next: LifecycleState) {
        let previous = self.state.send_replace(next);
        debug!(from = %previous, to = %next, "Lifecycle transition");
    }
}

async fn drain(in_flight: &mut JoinSet<()>) {
    while let Some(result) = in_flight.join_next().await {
        log_join_result(result);
    }
}

fn log_join_result(result: std::result::Result<(), JoinError>) {
    if let Err(e) = result {
        if e.is_panic() {
            error!(error = %e, "Publish cycle panicked");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_display() {
        assert_eq!(LifecycleState::Running.to_string(), "running");
        assert_eq!(LifecycleState::Draining.as_str(), "draining");
    }
}
