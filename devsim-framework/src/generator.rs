//! Synthetic reading generation.

use std::sync::Mutex;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use devsim_common::Reading;
use devsim_common::telemetry::{HUMIDITY_MAX, TEMPERATURE_MAX};

/// Produces independent, uniformly distributed readings.
///
/// The random source is injected and guarded by a mutex that is held only
/// for the two draws, so concurrent cycles can share one generator.
#[derive(Debug)]
pub struct TelemetryGenerator<R = SmallRng> {
    rng: Mutex<R>,
}

impl TelemetryGenerator<SmallRng> {
    /// Generator seeded from OS entropy.
    pub fn from_os_rng() -> Self {
        Self::new(SmallRng::from_os_rng())
    }

    /// Deterministic generator.
    pub fn seeded(seed: u64) -> Self {
        Self::new(SmallRng::seed_from_u64(seed))
    }
}

impl<R: Rng> TelemetryGenerator<R> {
    pub fn new(rng: R) -> Self {
        Self {
            rng: Mutex::new(rng),
        }
    }

    /// Draw one reading: temperature in `[0, 40)`, humidity in `[0, 100)`.
    pub fn generate(&self) -> Reading {
        // RNG state stays valid even if a holder panicked.
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());

        let temperature = rng.random_range(0.0..TEMPERATURE_MAX);
        let humidity = rng.random_range(0.0..HUMIDITY_MAX);

        Reading::new(temperature, humidity)
    }
}
