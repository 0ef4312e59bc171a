//! Results aggregation.
//!
//! Records are collected on the orchestrating task and reduced once at the
//! end of a simulation, so nothing here needs synchronization.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::RunRecord;

/// Reported percentiles as `(key, quantile in per-mille)`.
///
/// Per-mille integers keep the `floor(n * q)` index exact.
pub const PERCENTILES: [(&str, u64); 8] = [
    ("p25", 250),
    ("p50", 500),
    ("p75", 750),
    ("p80", 800),
    ("p90", 900),
    ("p95", 950),
    ("p99", 990),
    ("p99.9", 999),
];

/// Summary of a completed simulation.
///
/// Invariant: `total_runs == successes + failures == records.len()`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationResults {
    pub total_runs: u64,
    pub successes: u64,
    pub failures: u64,
    pub mean_duration_ms: f64,
    pub std_dev_ms: f64,
    pub median_ms: u64,
    pub min_ms: u64,
    pub max_ms: u64,
    pub percentiles: BTreeMap<String, u64>,
    pub records: Vec<RunRecord>,
}

impl SimulationResults {
    /// Percentile by key, e.g. `"p95"` or `"p99.9"`.
    pub fn percentile(&self, key: &str) -> Option<u64> {
        self.percentiles.get(key).copied()
    }

    /// Fraction of runs that succeeded, `0.0` when nothing ran.
    pub fn success_rate(&self) -> f64 {
        if self.total_runs == 0 {
            0.0
        } else {
            self.successes as f64 / self.total_runs as f64
        }
    }
}

/// Reduce run records into summary statistics.
///
/// The median and percentiles use nearest-rank on a zero-indexed sorted
/// sequence: the median is `sorted[n / 2]` and quantile `q` is
/// `sorted[floor(n * q)]`. With no records all statistics are zero.
pub fn aggregate(records: Vec<RunRecord>) -> SimulationResults {
    let n = records.len();
    if n == 0 {
        return SimulationResults {
            percentiles: PERCENTILES
                .iter()
                .map(|(key, _)| (key.to_string(), 0))
                .collect(),
            ..SimulationResults::default()
        };
    }

    let successes = records.iter().filter(|r| r.success).count() as u64;
    let failures = n as u64 - successes;

    let mean = records.iter().map(|r| r.duration_ms as f64).sum::<f64>() / n as f64;
    let variance = records
        .iter()
        .map(|r| (r.duration_ms as f64 - mean).powi(2))
        .sum::<f64>()
        / n as f64;

    // Stable sort, ties keep their original order
    let mut sorted: Vec<u64> = records.iter().map(|r| r.duration_ms).collect();
    sorted.sort();

    let percentiles = PERCENTILES
        .iter()
        .map(|(key, permille)| {
            let index = (n as u64 * permille / 1000) as usize;
            (key.to_string(), sorted[index])
        })
        .collect();

    SimulationResults {
        total_runs: n as u64,
        successes,
        failures,
        mean_duration_ms: mean,
        std_dev_ms: variance.sqrt(),
        median_ms: sorted[n / 2],
        min_ms: sorted[0],
        max_ms: sorted[n - 1],
        percentiles,
        records,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(duration_ms: u64, success: bool) -> RunRecord {
        RunRecord {
            interval: 0,
            iteration: 1,
            success,
            duration_ms,
        }
    }

    #[test]
    fn test_empty_records_are_all_zero() {
        let results = aggregate(Vec::new());
        assert_eq!(results.total_runs, 0);
        assert_eq!(results.mean_duration_ms, 0.0);
        assert_eq!(results.std_dev_ms, 0.0);
        assert_eq!(results.median_ms, 0);
        assert_eq!(results.percentiles.len(), PERCENTILES.len());
        assert!(results.percentiles.values().all(|v| *v == 0));
        assert_eq!(results.success_rate(), 0.0);
    }

    #[test]
    fn test_counts_partition_on_success() {
        let results = aggregate(vec![
            record(5, true),
            record(7, false),
            record(9, true),
        ]);
        assert_eq!(results.total_runs, 3);
        assert_eq!(results.successes, 2);
        assert_eq!(results.failures, 1);
        assert_eq!(results.records.len(), 3);
    }

    #[test]
    fn test_mean_and_population_std_dev() {
        // Population std dev of {2,4,4,4,5,5,7,9} is exactly 2
        let durations = [2, 4, 4, 4, 5, 5, 7, 9];
        let results = aggregate(durations.iter().map(|d| record(*d, true)).collect());
        assert_eq!(results.mean_duration_ms, 5.0);
        assert!((results.std_dev_ms - 2.0).abs() < 1e-9);
        assert_eq!(results.min_ms, 2);
        assert_eq!(results.max_ms, 9);
    }

    #[test]
    fn test_median_is_upper_middle_for_even_count() {
        let results = aggregate(vec![
            record(40, true),
            record(10, true),
            record(30, true),
            record(20, true),
        ]);
        // sorted [10, 20, 30, 40], index 4 / 2 = 2
        assert_eq!(results.median_ms, 30);
    }

    #[test]
    fn test_nearest_rank_percentiles() {
        // durations 1..=10 shuffled
        let durations = [7, 3, 10, 1, 5, 9, 2, 8, 4, 6];
        let results = aggregate(durations.iter().map(|d| record(*d, true)).collect());
        assert_eq!(results.percentile("p25"), Some(3)); // index 2
        assert_eq!(results.percentile("p50"), Some(6)); // index 5
        assert_eq!(results.percentile("p75"), Some(8)); // index 7
        assert_eq!(results.percentile("p80"), Some(9)); // index 8
        assert_eq!(results.percentile("p90"), Some(10)); // index 9
        assert_eq!(results.percentile("p95"), Some(10)); // index 9
        assert_eq!(results.percentile("p99"), Some(10));
        assert_eq!(results.percentile("p99.9"), Some(10));
        assert_eq!(results.percentile("p42"), None);
    }

    #[test]
    fn test_percentiles_are_monotonic() {
        let durations: Vec<u64> = (0..1000u64).map(|i| (i * 7919) % 613).collect();
        let results = aggregate(durations.iter().map(|d| record(*d, true)).collect());
        let ordered: Vec<u64> = PERCENTILES
            .iter()
            .map(|(key, _)| results.percentile(key).unwrap())
            .collect();
        assert!(ordered.windows(2).all(|w| w[0] <= w[1]));
        assert!(results.min_ms <= ordered[0]);
        assert!(*ordered.last().unwrap() <= results.max_ms);
    }

    #[test]
    fn test_single_record() {
        let results = aggregate(vec![record(42, false)]);
        assert_eq!(results.median_ms, 42);
        assert_eq!(results.percentile("p99.9"), Some(42));
        assert_eq!(results.std_dev_ms, 0.0);
        assert_eq!(results.failures, 1);
    }
}
