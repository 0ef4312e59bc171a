//! Metrics collector - thread-safe per-scenario counters with latency tracking

use std::collections::HashMap;
use std::sync::Arc;

use hdrhistogram::Histogram;
use parking_lot::RwLock;
use sysinfo::{CpuRefreshKind, MemoryRefreshKind, RefreshKind, System};
use tokio::time::Instant;

use crate::telemetry::{MetricsSink, COUNTER_FAIL, COUNTER_OK, HISTOGRAM_DURATION};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScenarioCounters {
    pub ok: u64,
    pub fail: u64,
}

impl ScenarioCounters {
    pub fn total(&self) -> u64 {
        self.ok + self.fail
    }
}

#[derive(Debug, Clone, Default)]
pub struct SystemMetrics {
    pub cpu_usage: f32,
    pub memory_used_mb: u64,
    pub memory_total_mb: u64,
}

#[derive(Debug, Clone)]
pub struct LatencyStats {
    pub min: u64,
    pub p50: u64,
    pub p95: u64,
    pub p99: u64,
    pub max: u64,
    pub mean: f64,
    pub count: u64,
}

/// In-process [`MetricsSink`] used by the CLI and by tests.
///
/// Cloning shares the underlying state.
#[derive(Clone)]
pub struct MetricsCollector {
    counters: Arc<RwLock<HashMap<String, ScenarioCounters>>>,
    latencies: Arc<RwLock<HashMap<String, Histogram<u64>>>>,
    system_metrics: Arc<RwLock<SystemMetrics>>,
    system: Arc<RwLock<Option<System>>>,
    start_time: Instant,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self {
            counters: Arc::new(RwLock::new(HashMap::new())),
            latencies: Arc::new(RwLock::new(HashMap::new())),
            system_metrics: Arc::new(RwLock::new(SystemMetrics::default())),
            system: Arc::new(RwLock::new(None)),
            start_time: Instant::now(),
        }
    }

    /// Counter value for one scenario, by metric name.
    pub fn counter(&self, name: &str, scenario: &str) -> u64 {
        let counters = self.counters.read();
        let Some(entry) = counters.get(scenario) else {
            return 0;
        };
        match name {
            COUNTER_OK => entry.ok,
            COUNTER_FAIL => entry.fail,
            _ => 0,
        }
    }

    pub fn counters(&self, scenario: &str) -> ScenarioCounters {
        self.counters
            .read()
            .get(scenario)
            .cloned()
            .unwrap_or_default()
    }

    /// Names of every scenario that reported at least one event, sorted.
    pub fn scenarios(&self) -> Vec<String> {
        let mut names: Vec<String> = self.counters.read().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn latency_percentiles(&self, scenario: &str) -> Option<LatencyStats> {
        let latencies = self.latencies.read();
        let hist = latencies.get(scenario)?;
        Some(LatencyStats {
            min: hist.min(),
            p50: hist.value_at_quantile(0.50),
            p95: hist.value_at_quantile(0.95),
            p99: hist.value_at_quantile(0.99),
            max: hist.max(),
            mean: hist.mean(),
            count: hist.len(),
        })
    }

    /// Update system metrics (CPU, memory)
    pub fn update_system_metrics(&self) {
        let mut guard = self.system.write();
        let system = guard.get_or_insert_with(|| {
            System::new_with_specifics(
                RefreshKind::new()
                    .with_cpu(CpuRefreshKind::everything())
                    .with_memory(MemoryRefreshKind::everything()),
            )
        });
        system.refresh_cpu_all();
        system.refresh_memory();

        let mut metrics = self.system_metrics.write();
        metrics.cpu_usage = system.global_cpu_usage();
        metrics.memory_used_mb = system.used_memory() / 1024 / 1024;
        metrics.memory_total_mb = system.total_memory() / 1024 / 1024;
    }

    pub fn system_snapshot(&self) -> SystemMetrics {
        self.system_metrics.read().clone()
    }

    pub fn elapsed_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsSink for MetricsCollector {
    fn increment_counter(&self, name: &'static str, scenario: &str) {
        let mut counters = self.counters.write();
        let entry = counters.entry(scenario.to_string()).or_default();
        match name {
            COUNTER_OK => entry.ok += 1,
            COUNTER_FAIL => entry.fail += 1,
            other => tracing::debug!(counter = other, "ignoring unknown counter"),
        }
    }

    fn observe_histogram(&self, name: &'static str, scenario: &str, value_ms: u64) {
        if name != HISTOGRAM_DURATION {
            tracing::debug!(histogram = name, "ignoring unknown histogram");
            return;
        }
        let mut latencies = self.latencies.write();
        if !latencies.contains_key(scenario) {
            // 3 significant digits, auto-resizing
            match Histogram::new(3) {
                Ok(hist) => {
                    latencies.insert(scenario.to_string(), hist);
                }
                Err(e) => {
                    tracing::warn!(error = %e, "failed to create latency histogram");
                    return;
                }
            }
        }
        if let Some(hist) = latencies.get_mut(scenario) {
            if let Err(e) = hist.record(value_ms) {
                tracing::warn!(scenario, value_ms, error = %e, "failed to record latency");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_are_tagged_by_scenario() {
        let collector = MetricsCollector::new();
        collector.increment_counter(COUNTER_OK, "login");
        collector.increment_counter(COUNTER_OK, "login");
        collector.increment_counter(COUNTER_FAIL, "login");
        collector.increment_counter(COUNTER_FAIL, "search");

        assert_eq!(collector.counter(COUNTER_OK, "login"), 2);
        assert_eq!(collector.counter(COUNTER_FAIL, "login"), 1);
        assert_eq!(collector.counter(COUNTER_OK, "search"), 0);
        assert_eq!(collector.counters("search").total(), 1);
        assert_eq!(collector.scenarios(), vec!["login", "search"]);
    }

    #[test]
    fn test_duration_histogram() {
        let collector = MetricsCollector::new();
        assert!(collector.latency_percentiles("login").is_none());

        for ms in [10, 20, 30, 40] {
            collector.observe_histogram(HISTOGRAM_DURATION, "login", ms);
        }
        let stats = collector.latency_percentiles("login").expect("histogram");
        assert_eq!(stats.count, 4);
        assert_eq!(stats.min, 10);
        assert_eq!(stats.max, 40);
        assert!((stats.mean - 25.0).abs() < 0.5);
    }

    #[test]
    fn test_clones_share_state() {
        let collector = MetricsCollector::new();
        let clone = collector.clone();
        clone.increment_counter(COUNTER_OK, "a");
        assert_eq!(collector.counter(COUNTER_OK, "a"), 1);
    }
}
