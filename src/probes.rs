//! Periodic store liveness probe.
//!
//! Runs on a fixed interval independent of request traffic. A single
//! failed ping only increments a counter; once the configured number of
//! consecutive failures is reached the process terminates rather than
//! degrading gracefully, so the orchestrator can restart it against a
//! healthy store.

use std::time::Duration;

use sqlx::PgPool;

/// Outcome of feeding one probe result into the failure counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeVerdict {
    /// The store responded; the counter was reset.
    Healthy,
    /// The ping failed but the threshold is not reached yet.
    Degraded,
    /// Consecutive failures reached the threshold.
    Fatal,
}

/// Counts consecutive probe failures against a threshold.
#[derive(Debug)]
pub struct FailureCounter {
    consecutive: u32,
    threshold: u32,
}

impl FailureCounter {
    /// Creates a counter that turns fatal after `threshold` consecutive
    /// failures. A threshold of zero is clamped to one.
    #[must_use]
    pub fn new(threshold: u32) -> Self {
        Self {
            consecutive: 0,
            threshold: threshold.max(1),
        }
    }

    /// Feeds one probe outcome into the counter.
    pub fn record(&mut self, ok: bool) -> ProbeVerdict {
        if ok {
            self.consecutive = 0;
            return ProbeVerdict::Healthy;
        }

        self.consecutive = self.consecutive.saturating_add(1);
        if self.consecutive >= self.threshold {
            ProbeVerdict::Fatal
        } else {
            ProbeVerdict::Degraded
        }
    }
}

/// Spawns the liveness probe loop.
///
/// Pings the store every `interval`; after `failure_threshold`
/// consecutive failures the process exits with a non-zero status.
pub fn spawn_store_probe(pool: PgPool, interval: Duration, failure_threshold: u32) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // The first tick fires immediately; skip it so a slow cold
        // start is not counted as a failure.
        ticker.tick().await;

        let mut failures = FailureCounter::new(failure_threshold);

        loop {
            ticker.tick().await;

            let ok = sqlx::query("SELECT 1").execute(&pool).await.is_ok();

            match failures.record(ok) {
                ProbeVerdict::Healthy => {}
                ProbeVerdict::Degraded => {
                    tracing::warn!("store liveness probe failed");
                }
                ProbeVerdict::Fatal => {
                    tracing::error!("store liveness probe failed repeatedly, exiting");
                    std::process::exit(1);
                }
            }
        }
    });
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn success_resets_the_counter() {
        let mut counter = FailureCounter::new(3);
        assert_eq!(counter.record(false), ProbeVerdict::Degraded);
        assert_eq!(counter.record(false), ProbeVerdict::Degraded);
        assert_eq!(counter.record(true), ProbeVerdict::Healthy);
        // The streak starts over after a success.
        assert_eq!(counter.record(false), ProbeVerdict::Degraded);
    }

    #[test]
    fn threshold_turns_fatal() {
        let mut counter = FailureCounter::new(3);
        assert_eq!(counter.record(false), ProbeVerdict::Degraded);
        assert_eq!(counter.record(false), ProbeVerdict::Degraded);
        assert_eq!(counter.record(false), ProbeVerdict::Fatal);
    }

    #[test]
    fn zero_threshold_is_clamped_to_one() {
        let mut counter = FailureCounter::new(0);
        assert_eq!(counter.record(false), ProbeVerdict::Fatal);
    }

    #[test]
    fn healthy_streak_never_trips() {
        let mut counter = FailureCounter::new(1);
        for _ in 0..10 {
            assert_eq!(counter.record(true), ProbeVerdict::Healthy);
        }
    }
}
