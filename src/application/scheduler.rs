//! Fixed-cadence tick loop.
//!
//! The loop runs one unit of work, then sleeps for the full interval. Work
//! duration is not subtracted from the sleep and there is no overlap guard:
//! a slow tick shifts the period, a hung tick stalls the loop. Cancellation is
//! observed between ticks only.

use async_trait::async_trait;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// One schedulable unit of work. `run_once` must contain its own failures.
#[async_trait]
pub trait Unit: Send + Sync {
    fn name(&self) -> &'static str;

    async fn run_once(&self);
}

pub struct Scheduler {
    interval: Duration,
    cancel: CancellationToken,
}

impl Scheduler {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            cancel: CancellationToken::new(),
        }
    }

    /// Token that stops [`Scheduler::run`] at the next tick boundary.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Runs exactly one tick.
    pub async fn tick<U: Unit + ?Sized>(&self, unit: &U) {
        debug!("{}: tick", unit.name());
        unit.run_once().await;
    }

    /// Runs ticks until cancelled.
    pub async fn run<U: Unit + ?Sized>(&self, unit: &U) {
        info!(
            "{}: starting loop (interval: {:?})",
            unit.name(),
            self.interval
        );

        while !self.cancel.is_cancelled() {
            self.tick(unit).await;

            tokio::select! {
                _ = self.cancel.cancelled() => break,
                _ = tokio::time::sleep(self.interval) => {}
            }
        }

        info!("{}: loop stopped", unit.name());
    }
}
