//! Batch executor: runs a set of concurrent invocations behind a barrier.

use futures::future::join_all;
use tracing::error;

use crate::executor::run::RunExecutor;
use crate::scenario::ScenarioContext;
use crate::types::RunRecord;

#[derive(Clone)]
pub struct BatchExecutor {
    runner: RunExecutor,
}

impl BatchExecutor {
    pub fn new(runner: RunExecutor) -> Self {
        Self { runner }
    }

    /// Launch `count` concurrent runs and wait for every one of them.
    ///
    /// Always returns exactly `count` records. Their order carries no meaning.
    pub async fn run_batch(
        &self,
        interval: usize,
        iteration: u64,
        count: usize,
    ) -> Vec<RunRecord> {
        if count == 0 {
            return Vec::new();
        }

        let handles: Vec<_> = (0..count)
            .map(|copy| {
                let runner = self.runner.clone();
                let ctx = ScenarioContext::new(runner.scenario_name(), interval, iteration, copy);
                tokio::spawn(async move { runner.execute(ctx).await })
            })
            .collect();

        join_all(handles)
            .await
            .into_iter()
            .enumerate()
            .map(|(copy, joined)| match joined {
                Ok(record) => record,
                Err(e) => {
                    error!(
                        scenario = %self.runner.scenario_name(),
                        interval,
                        iteration,
                        copy,
                        error = %e,
                        "run task failed to complete"
                    );
                    RunRecord {
                        interval,
                        iteration,
                        success: false,
                        duration_ms: 0,
                    }
                }
            })
            .collect()
    }
}
