//! Simulation engine.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tracing::info;

use crate::error::ConfigError;
use crate::executor::{BatchExecutor, RunExecutor};
use crate::interval::Interval;
use crate::scenario::Scenario;
use crate::scheduler::IntervalScheduler;
use crate::stats::{aggregate, SimulationResults};
use crate::telemetry::Telemetry;

/// Runs a scenario through an ordered list of intervals.
///
/// Intervals are appended fluently and validated as they are added, so a
/// misconfigured simulation fails before any scenario executes:
///
/// ```rust,ignore
/// let results = Simulation::new(scenario)
///     .with_duration(Duration::from_secs(30), 1.0, 0.5)?
///     .with_iterations(10, 8.0, 0.0)?
///     .run()
///     .await;
/// ```
pub struct Simulation {
    scenario: Arc<dyn Scenario>,
    intervals: Vec<Interval>,
    telemetry: Telemetry,
}

impl Simulation {
    pub fn new(scenario: impl Scenario + 'static) -> Self {
        Self::from_arc(Arc::new(scenario))
    }

    pub fn from_arc(scenario: Arc<dyn Scenario>) -> Self {
        Self {
            scenario,
            intervals: Vec::new(),
            telemetry: Telemetry::default(),
        }
    }

    pub fn with_telemetry(mut self, telemetry: Telemetry) -> Self {
        self.telemetry = telemetry;
        self
    }

    /// Append a time-bounded interval.
    pub fn with_duration(
        self,
        duration: Duration,
        base_copies: f64,
        ramp_rate: f64,
    ) -> Result<Self, ConfigError> {
        Ok(self.add_interval(Interval::duration(duration, base_copies, ramp_rate)?))
    }

    /// Append an iteration-bounded interval.
    pub fn with_iterations(
        self,
        iterations: u64,
        base_copies: f64,
        ramp_rate: f64,
    ) -> Result<Self, ConfigError> {
        Ok(self.add_interval(Interval::iterations(iterations, base_copies, ramp_rate)?))
    }

    pub fn add_interval(mut self, interval: Interval) -> Self {
        self.intervals.push(interval);
        self
    }

    pub fn with_intervals(mut self, intervals: impl IntoIterator<Item = Interval>) -> Self {
        self.intervals.extend(intervals);
        self
    }

    pub fn intervals(&self) -> &[Interval] {
        &self.intervals
    }

    pub fn scenario_name(&self) -> &str {
        self.scenario.name()
    }

    /// Run every interval in order and aggregate the results.
    ///
    /// Interval `k + 1` starts only after interval `k` reached its stop
    /// condition. With no intervals configured, [`Interval::single`] is used
    /// and the scenario runs exactly once.
    ///
    /// Scenario failures never make this fail; they are counted in the
    /// returned results. The engine keeps no state between calls: calling
    /// `run` again re-executes every interval from scratch and returns fresh,
    /// independent results.
    pub async fn run(&self) -> SimulationResults {
        let default_interval = [Interval::single()];
        let intervals: &[Interval] = if self.intervals.is_empty() {
            &default_interval
        } else {
            &self.intervals
        };

        let runner = RunExecutor::new(self.scenario.clone(), self.telemetry.clone());
        let batch = BatchExecutor::new(runner);

        info!(
            scenario = %self.scenario.name(),
            intervals = intervals.len(),
            "starting simulation"
        );
        let start = Instant::now();
        let mut records = Vec::new();

        for (index, interval) in intervals.iter().enumerate() {
            info!(
                interval = index,
                stop = ?interval.stop_condition(),
                base_copies = interval.base_copies(),
                ramp_rate = interval.ramp_rate(),
                "interval started"
            );
            let interval_records = IntervalScheduler::new(index, interval, &batch).run().await;
            info!(
                interval = index,
                runs = interval_records.len(),
                "interval finished"
            );
            records.extend(interval_records);
        }

        let results = aggregate(records);
        info!(
            scenario = %self.scenario.name(),
            total = results.total_runs,
            successes = results.successes,
            failures = results.failures,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "simulation complete"
        );
        results
    }
}
