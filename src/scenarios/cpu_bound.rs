// CPU-intensive scenario

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crabdance_loadsim::{Outcome, Scenario, ScenarioContext, ScenarioError, ScenarioFuture};

/// A scenario that performs CPU-intensive hashing
///
/// Work runs on the blocking pool so it does not starve the scheduler.
#[derive(Clone)]
pub struct CpuBoundScenario {
    pub iterations: usize,
}

impl Scenario for CpuBoundScenario {
    fn name(&self) -> &str {
        "cpu"
    }

    fn execute(&self, ctx: ScenarioContext) -> ScenarioFuture {
        let iterations = self.iterations;
        Box::pin(async move {
            let digest = tokio::task::spawn_blocking(move || {
                let mut hasher = DefaultHasher::new();
                for i in 0..iterations {
                    (ctx.copy, i).hash(&mut hasher);
                }
                hasher.finish()
            })
            .await
            .map_err(ScenarioError::custom)?;

            tracing::trace!(digest, "cpu scenario finished");
            Ok(Outcome::success())
        })
    }
}
