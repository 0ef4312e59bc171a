// No-op scenario

use crabdance_loadsim::{Outcome, Scenario, ScenarioContext, ScenarioFuture};

/// Succeeds immediately; measures harness overhead.
#[derive(Clone)]
pub struct NoopScenario;

impl Scenario for NoopScenario {
    fn name(&self) -> &str {
        "noop"
    }

    fn execute(&self, _ctx: ScenarioContext) -> ScenarioFuture {
        Box::pin(async { Ok(Outcome::success()) })
    }
}
