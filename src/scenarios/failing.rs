// Failing scenario

use std::time::Duration;

use crabdance_loadsim::{Outcome, Scenario, ScenarioContext, ScenarioError, ScenarioFuture};
use rand::Rng;

/// A scenario that fails based on a configured probability
///
/// Half of the failures are raised as errors and half are returned as a
/// failed outcome, so both paths through the run executor get exercised.
#[derive(Clone)]
pub struct FailingScenario {
    pub failure_rate: f64,
    pub latency_ms: u64,
}

impl Scenario for FailingScenario {
    fn name(&self) -> &str {
        "failing"
    }

    fn execute(&self, ctx: ScenarioContext) -> ScenarioFuture {
        let mut rng = rand::thread_rng();
        let roll: f64 = rng.gen();
        let raise: bool = rng.gen();
        let failure_rate = self.failure_rate;
        let delay = Duration::from_millis(self.latency_ms);

        Box::pin(async move {
            tokio::time::sleep(delay).await;
            if roll >= failure_rate {
                return Ok(Outcome::success());
            }
            if raise {
                Err(ScenarioError::failed(format!(
                    "run {} (iteration {}, copy {}): random failure triggered",
                    ctx.run_id, ctx.iteration, ctx.copy
                )))
            } else {
                Ok(Outcome::failure())
            }
        })
    }
}
