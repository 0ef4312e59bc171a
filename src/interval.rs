//! Interval configuration.
//!
//! An interval is one span of scheduling with a base concurrency and a ramp
//! rate. Intervals can only be built through the validating constructors, so
//! holding an [`Interval`] means its configuration is sound.

use std::time::Duration;

use crate::error::ConfigError;

/// Upper bound for `base_copies`, `ramp_rate` and any computed batch size.
pub const MAX_BATCH_COPIES: f64 = 1_000_000.0;

/// When an interval stops launching batches.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StopCondition {
    /// Launch batches until this much time has elapsed since the interval started
    Duration(Duration),
    /// Launch exactly this many batches
    Iterations(u64),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    stop: StopCondition,
    base_copies: f64,
    ramp_rate: f64,
}

impl Interval {
    /// Time-bounded interval.
    pub fn duration(
        duration: Duration,
        base_copies: f64,
        ramp_rate: f64,
    ) -> Result<Self, ConfigError> {
        Self::new(StopCondition::Duration(duration), base_copies, ramp_rate)
    }

    /// Iteration-bounded interval. `iterations` must be at least 1.
    pub fn iterations(
        iterations: u64,
        base_copies: f64,
        ramp_rate: f64,
    ) -> Result<Self, ConfigError> {
        Self::new(StopCondition::Iterations(iterations), base_copies, ramp_rate)
    }

    /// Validate and build an interval.
    ///
    /// `base_copies` and `ramp_rate` must lie in `[0, MAX_BATCH_COPIES]`.
    pub fn new(
        stop: StopCondition,
        base_copies: f64,
        ramp_rate: f64,
    ) -> Result<Self, ConfigError> {
        if !(0.0..=MAX_BATCH_COPIES).contains(&base_copies) {
            return Err(ConfigError::InvalidBaseCopies(base_copies));
        }
        if !(0.0..=MAX_BATCH_COPIES).contains(&ramp_rate) {
            return Err(ConfigError::InvalidRampRate(ramp_rate));
        }
        if let StopCondition::Iterations(0) = stop {
            return Err(ConfigError::InvalidIterationCount(0));
        }
        Ok(Self {
            stop,
            base_copies,
            ramp_rate,
        })
    }

    /// Interval used when a simulation has none configured: one invocation.
    pub fn single() -> Self {
        Self {
            stop: StopCondition::Duration(Duration::ZERO),
            base_copies: 1.0,
            ramp_rate: 0.0,
        }
    }

    pub fn stop_condition(&self) -> StopCondition {
        self.stop
    }

    pub fn base_copies(&self) -> f64 {
        self.base_copies
    }

    pub fn ramp_rate(&self) -> f64 {
        self.ramp_rate
    }

    /// Batch size after `elapsed` has passed inside the interval:
    /// `floor(base_copies + ramp_rate * seconds)`, capped at `MAX_BATCH_COPIES`.
    pub fn copies_at(&self, elapsed: Duration) -> usize {
        let copies = (self.base_copies + self.ramp_rate * elapsed.as_secs_f64()).floor();
        if copies <= 0.0 {
            0
        } else {
            copies.min(MAX_BATCH_COPIES) as usize
        }
    }

    /// Batch size with no ramp applied.
    pub fn base_batch(&self) -> usize {
        self.copies_at(Duration::ZERO)
    }
}
