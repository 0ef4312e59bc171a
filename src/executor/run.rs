//! Run executor: invokes one scenario instance and records its outcome.

use std::sync::Arc;

use tokio::time::Instant;
use tracing::{error, Instrument};

use crate::scenario::{Scenario, ScenarioContext};
use crate::telemetry::Telemetry;
use crate::types::{RunRecord, RunStatus};

/// Executes single scenario invocations.
///
/// Errors and panics raised by the scenario stop here: they become a failed
/// [`RunRecord`] and an error log entry, never an error for the caller.
#[derive(Clone)]
pub struct RunExecutor {
    scenario: Arc<dyn Scenario>,
    telemetry: Telemetry,
}

impl RunExecutor {
    pub fn new(scenario: Arc<dyn Scenario>, telemetry: Telemetry) -> Self {
        Self {
            scenario,
            telemetry,
        }
    }

    pub fn scenario_name(&self) -> &str {
        self.scenario.name()
    }

    /// Invoke the scenario exactly once and time it.
    pub async fn execute(&self, ctx: ScenarioContext) -> RunRecord {
        let name = self.scenario.name();
        let interval = ctx.interval;
        let iteration = ctx.iteration;
        let span = self.telemetry.tracer.start(name);

        let start = Instant::now();
        let future = self.scenario.execute(ctx).instrument(span.clone());

        // Spawned so a panicking scenario surfaces as a JoinError
        let result = tokio::spawn(future).await;
        let duration_ms = start.elapsed().as_millis() as u64;

        let success = match result {
            Ok(Ok(outcome)) => outcome.success,
            Ok(Err(e)) => {
                error!(scenario = %name, error = %e, "scenario execution failed");
                false
            }
            Err(join_error) => {
                let panic_msg = if join_error.is_panic() {
                    format!("Scenario panicked: {}", join_error)
                } else {
                    format!("Scenario task cancelled: {}", join_error)
                };
                error!(scenario = %name, error = %panic_msg, "scenario execution aborted");
                false
            }
        };

        self.telemetry.record_run(name, success, duration_ms);
        self.telemetry.tracer.finish(span, RunStatus::from(success));

        RunRecord {
            interval,
            iteration,
            success,
            duration_ms,
        }
    }
}
