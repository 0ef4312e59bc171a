//! Load simulation harness.
//!
//! This crate repeatedly executes a caller-supplied asynchronous [`Scenario`]
//! under a configurable concurrency ramp and aggregates the outcomes into
//! [`SimulationResults`].
//!
//! A simulation is an ordered list of [`Interval`]s. Each interval is either
//! time-bounded or iteration-bounded and runs batches of concurrent scenario
//! invocations whose size grows with the time elapsed inside the interval.
//!
//! ```rust,ignore
//! use std::time::Duration;
//! use crabdance_loadsim::{scenario_fn, Outcome, Simulation};
//!
//! let results = Simulation::new(scenario_fn("checkout", |_ctx| async {
//!     tokio::time::sleep(Duration::from_millis(50)).await;
//!     Ok(Outcome::success())
//! }))
//! .with_duration(Duration::from_secs(10), 1.0, 2.0)?
//! .run()
//! .await;
//!
//! println!("p99: {:?}", results.percentile("p99"));
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod executor;
pub mod export;
pub mod interval;
pub mod metrics;
pub mod report;
pub mod scenario;
pub mod scheduler;
pub mod stats;
pub mod telemetry;
pub mod types;

pub use config::{profile, IntervalSpec, SimulationFile};
pub use engine::Simulation;
pub use error::{ConfigError, ExportError};
pub use executor::{BatchExecutor, RunExecutor};
pub use interval::{Interval, StopCondition, MAX_BATCH_COPIES};
pub use metrics::{LatencyStats, MetricsCollector};
pub use scenario::{
    scenario_fn, FnScenario, Scenario, ScenarioContext, ScenarioError, ScenarioFuture,
};
pub use scheduler::IntervalScheduler;
pub use stats::{aggregate, SimulationResults, PERCENTILES};
pub use telemetry::{
    MetricsSink, NoopMetrics, Telemetry, Tracer, TracingTracer, COUNTER_FAIL, COUNTER_OK,
    HISTOGRAM_DURATION,
};
pub use types::{Outcome, RunRecord, RunStatus};
