//! Interval scheduler.
//!
//! Drives one [`Interval`] to completion by asking the batch executor for
//! successive batches. Batch size is derived from the time elapsed since the
//! interval started, measured after the previous batch joined, so slow
//! scenarios throttle the achieved rate below the configured ramp.

use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

use crate::executor::BatchExecutor;
use crate::interval::{Interval, StopCondition};
use crate::types::RunRecord;

/// Pause between empty batches of a time-bounded interval.
const IDLE_BACKOFF: Duration = Duration::from_millis(10);

pub struct IntervalScheduler<'a> {
    index: usize,
    interval: &'a Interval,
    batch: &'a BatchExecutor,
}

impl<'a> IntervalScheduler<'a> {
    pub fn new(index: usize, interval: &'a Interval, batch: &'a BatchExecutor) -> Self {
        Self {
            index,
            interval,
            batch,
        }
    }

    /// Run the interval until its stop condition is met.
    pub async fn run(&self) -> Vec<RunRecord> {
        match self.interval.stop_condition() {
            StopCondition::Duration(limit) if limit.is_zero() => {
                self.batch
                    .run_batch(self.index, 1, self.interval.base_batch())
                    .await
            }
            StopCondition::Duration(limit) => self.run_for(limit).await,
            StopCondition::Iterations(count) => self.run_iterations(count).await,
        }
    }

    async fn run_for(&self, limit: Duration) -> Vec<RunRecord> {
        let start = Instant::now();
        let mut records = Vec::new();
        let mut iteration = 0u64;

        loop {
            let elapsed = start.elapsed();
            if elapsed >= limit {
                break;
            }
            iteration += 1;
            let copies = self.interval.copies_at(elapsed);
            self.log_batch(iteration, copies, elapsed);

            if copies == 0 {
                tokio::time::sleep(IDLE_BACKOFF.min(limit - elapsed)).await;
                continue;
            }
            records.extend(self.batch.run_batch(self.index, iteration, copies).await);
        }

        records
    }

    async fn run_iterations(&self, count: u64) -> Vec<RunRecord> {
        let start = Instant::now();
        let mut records = Vec::new();

        for iteration in 1..=count {
            let elapsed = start.elapsed();
            let copies = self.interval.copies_at(elapsed);
            self.log_batch(iteration, copies, elapsed);
            records.extend(self.batch.run_batch(self.index, iteration, copies).await);
        }

        records
    }

    fn log_batch(&self, iteration: u64, copies: usize, elapsed: Duration) {
        debug!(
            interval = self.index,
            iteration,
            copies,
            elapsed_ms = elapsed.as_millis() as u64,
            "launching batch"
        );
    }
}
