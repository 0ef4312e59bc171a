//! Instrumentation collaborators.
//!
//! The executors never touch global metric registries. Instead a
//! [`Telemetry`] bundle is built once and injected into the simulation, so
//! each engine (and each test) gets an isolated sink.

use std::fmt;
use std::sync::Arc;

use tracing::field;

use crate::types::RunStatus;

/// Counter incremented once per successful run
pub const COUNTER_OK: &str = "simulations.ok";
/// Counter incremented once per failed run
pub const COUNTER_FAIL: &str = "simulations.fail";
/// Histogram observed once per run, in milliseconds
pub const HISTOGRAM_DURATION: &str = "simulations.duration";

/// Receives per-run metric events, tagged with the scenario name.
pub trait MetricsSink: Send + Sync {
    fn increment_counter(&self, name: &'static str, scenario: &str);

    fn observe_histogram(&self, name: &'static str, scenario: &str, value_ms: u64);
}

/// Opens and closes one span per run.
pub trait Tracer: Send + Sync {
    fn start(&self, scenario: &str) -> tracing::Span;

    fn finish(&self, span: tracing::Span, status: RunStatus);
}

/// Metrics sink that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopMetrics;

impl MetricsSink for NoopMetrics {
    fn increment_counter(&self, _name: &'static str, _scenario: &str) {}

    fn observe_histogram(&self, _name: &'static str, _scenario: &str, _value_ms: u64) {}
}

/// Tracer backed by `tracing` spans.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingTracer;

impl Tracer for TracingTracer {
    fn start(&self, scenario: &str) -> tracing::Span {
        tracing::info_span!("simulation.run", scenario = %scenario, status = field::Empty)
    }

    fn finish(&self, span: tracing::Span, status: RunStatus) {
        span.record("status", status.as_str());
    }
}

/// Collaborators handed to the run executor.
#[derive(Clone)]
pub struct Telemetry {
    pub metrics: Arc<dyn MetricsSink>,
    pub tracer: Arc<dyn Tracer>,
}

impl Telemetry {
    pub fn new(metrics: Arc<dyn MetricsSink>, tracer: Arc<dyn Tracer>) -> Self {
        Self { metrics, tracer }
    }

    /// Default tracer with the given metrics sink.
    pub fn with_metrics(metrics: Arc<dyn MetricsSink>) -> Self {
        Self {
            metrics,
            tracer: Arc::new(TracingTracer),
        }
    }

    /// Emit the completion event for one run.
    pub(crate) fn record_run(&self, scenario: &str, success: bool, duration_ms: u64) {
        let counter = if success { COUNTER_OK } else { COUNTER_FAIL };
        self.metrics.increment_counter(counter, scenario);
        self.metrics
            .observe_histogram(HISTOGRAM_DURATION, scenario, duration_ms);
    }
}

impl Default for Telemetry {
    fn default() -> Self {
        Self::with_metrics(Arc::new(NoopMetrics))
    }
}

impl fmt::Debug for Telemetry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Telemetry").finish_non_exhaustive()
    }
}
