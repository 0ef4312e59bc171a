// I/O-simulated scenario

use std::time::Duration;

use crabdance_loadsim::{Outcome, Scenario, ScenarioContext, ScenarioFuture};
use rand::Rng;

/// A scenario that simulates I/O delays
///
/// Uses tokio::time::sleep to stand in for database queries, API calls, etc.
#[derive(Clone)]
pub struct SleepScenario {
    pub latency_ms: u64,
    pub jitter_ms: u64,
}

impl Scenario for SleepScenario {
    fn name(&self) -> &str {
        "sleep"
    }

    fn execute(&self, _ctx: ScenarioContext) -> ScenarioFuture {
        let jitter = if self.jitter_ms > 0 {
            rand::thread_rng().gen_range(0..self.jitter_ms)
        } else {
            0
        };
        let delay = Duration::from_millis(self.latency_ms + jitter);
        Box::pin(async move {
            tokio::time::sleep(delay).await;
            Ok(Outcome::success())
        })
    }
}
