//! Scenario contract.
//!
//! A scenario is the caller's unit of work under test. The harness only needs
//! a name (used to tag telemetry) and an asynchronous `execute` that yields an
//! [`Outcome`] or fails with a [`ScenarioError`].

use std::error::Error as StdError;
use std::future::Future;
use std::io;
use std::pin::Pin;
use uuid::Uuid;

use crate::types::Outcome;

/// Boxed future returned by [`Scenario::execute`].
pub type ScenarioFuture = Pin<Box<dyn Future<Output = Result<Outcome, ScenarioError>> + Send>>;

/// Error raised by a scenario invocation.
///
/// The run executor treats every variant as a failed run.
#[derive(Debug, thiserror::Error)]
pub enum ScenarioError {
    #[error("Scenario failed: {0}")]
    Failed(String),
    #[error("Scenario I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Scenario error: {0}")]
    Custom(Box<dyn StdError + Send + Sync>),
}

impl ScenarioError {
    /// Create a failure from a message
    pub fn failed(msg: impl Into<String>) -> Self {
        Self::Failed(msg.into())
    }

    /// Wrap an arbitrary error raised by the code under test
    pub fn custom(err: impl StdError + Send + Sync + 'static) -> Self {
        Self::Custom(Box::new(err))
    }
}

/// Context handed to every scenario invocation.
#[derive(Debug, Clone)]
pub struct ScenarioContext {
    pub scenario: String,
    /// Zero-based interval index
    pub interval: usize,
    /// One-based batch counter within the interval
    pub iteration: u64,
    /// Zero-based position of this copy inside its batch
    pub copy: usize,
    pub run_id: Uuid,
}

impl ScenarioContext {
    pub fn new(scenario: impl Into<String>, interval: usize, iteration: u64, copy: usize) -> Self {
        Self {
            scenario: scenario.into(),
            interval,
            iteration,
            copy,
            run_id: Uuid::new_v4(),
        }
    }
}

/// Scenario trait
pub trait Scenario: Send + Sync {
    /// Name used to tag metrics, spans and log entries
    fn name(&self) -> &str;

    fn execute(&self, ctx: ScenarioContext) -> ScenarioFuture;
}

/// Scenario backed by a closure returning a future.
#[derive(Clone)]
pub struct FnScenario<F> {
    name: String,
    func: F,
}

impl<F, Fut> Scenario for FnScenario<F>
where
    F: Fn(ScenarioContext) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Outcome, ScenarioError>> + Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn execute(&self, ctx: ScenarioContext) -> ScenarioFuture {
        Box::pin((self.func)(ctx))
    }
}

/// Build a [`Scenario`] from a name and an async closure.
///
/// Capture shared clients in the closure and clone cheap handles inside it;
/// the closure runs once per invocation.
pub fn scenario_fn<F, Fut>(name: impl Into<String>, func: F) -> FnScenario<F>
where
    F: Fn(ScenarioContext) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Outcome, ScenarioError>> + Send + 'static,
{
    FnScenario {
        name: name.into(),
        func,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fn_scenario_receives_context() {
        let scenario = scenario_fn("echo", |ctx: ScenarioContext| async move {
            Ok(Outcome::from(ctx.copy % 2 == 0))
        });

        assert_eq!(scenario.name(), "echo");
        let even = scenario.execute(ScenarioContext::new("echo", 0, 1, 2)).await;
        let odd = scenario.execute(ScenarioContext::new("echo", 0, 1, 3)).await;
        assert!(even.expect("even copy").success);
        assert!(!odd.expect("odd copy").success);
    }

    #[test]
    fn test_scenario_error_display() {
        let err = ScenarioError::failed("boom");
        assert_eq!(err.to_string(), "Scenario failed: boom");

        let io_err: ScenarioError = io::Error::new(io::ErrorKind::Other, "disk").into();
        assert!(matches!(io_err, ScenarioError::Io(_)));
    }

    #[test]
    fn test_context_run_ids_are_unique() {
        let a = ScenarioContext::new("s", 0, 1, 0);
        let b = ScenarioContext::new("s", 0, 1, 0);
        assert_ne!(a.run_id, b.run_id);
    }
}
