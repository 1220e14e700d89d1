//! Publish counters shared by all cycles.

use std::sync::atomic::{AtomicU64, Ordering};

/// Lock-free counters updated by every publish cycle.
#[derive(Debug, Default)]
pub struct PublishStats {
    attempted: AtomicU64,
    sent: AtomicU64,
    failed: AtomicU64,
}

impl PublishStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_attempt(&self) {
        self.attempted.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_sent(&self) {
        self.sent.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_failed(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Point-in-time copy of the counters.
    pub fn snapshot(&self) -> PublishSnapshot {
        PublishSnapshot {
            attempted: self.attempted.load(Ordering::Relaxed),
            sent: self.sent.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
        }
    }
}

/// Copy of [`PublishStats`] at one instant.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PublishSnapshot {
    /// Cycles started.
    pub attempted: u64,
    /// Messages accepted by the transport.
    pub sent: u64,
    /// Cycles that failed to build or send their message.
    pub failed: u64,
}

impl PublishSnapshot {
    /// Cycles that have finished, successfully or not.
    pub fn completed(&self) -> u64 {
        self.sent + self.failed
    }

    /// Success rate as a percentage.
    pub fn success_rate(&self) -> f64 {
        if self.completed() == 0 {
            100.0
        } else {
            (self.sent as f64 / self.completed() as f64) * 100.0
        }
    }
}
