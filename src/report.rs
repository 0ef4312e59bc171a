//! Console reporting: periodic progress while a simulation runs and a final
//! summary once it completes.

use std::io::{self, Write};

use tokio::time::{interval, Duration};

use crate::metrics::MetricsCollector;
use crate::stats::SimulationResults;

/// Log live progress every `interval_secs` seconds until the task is aborted.
pub async fn start_periodic_reporter(collector: MetricsCollector, interval_secs: u64) {
    let mut ticker = interval(Duration::from_secs(interval_secs.max(1)));
    // First tick completes immediately
    ticker.tick().await;

    loop {
        ticker.tick().await;
        collector.update_system_metrics();
        log_live_metrics(&collector);
    }
}

/// Emit one progress line per scenario plus host utilisation.
pub fn log_live_metrics(collector: &MetricsCollector) {
    let elapsed = collector.elapsed_seconds();
    let system = collector.system_snapshot();

    for scenario in collector.scenarios() {
        let counters = collector.counters(&scenario);
        let throughput = if elapsed > 0 {
            counters.total() as f64 / elapsed as f64
        } else {
            0.0
        };
        match collector.latency_percentiles(&scenario) {
            Some(latency) => tracing::info!(
                scenario = %scenario,
                ok = counters.ok,
                fail = counters.fail,
                throughput = %format!("{throughput:.2}/s"),
                p50_ms = latency.p50,
                p99_ms = latency.p99,
                "progress"
            ),
            None => tracing::info!(
                scenario = %scenario,
                ok = counters.ok,
                fail = counters.fail,
                "progress"
            ),
        }
    }

    tracing::info!(
        elapsed_s = elapsed,
        cpu = %format!("{:.1}%", system.cpu_usage),
        memory_mb = system.memory_used_mb,
        memory_total_mb = system.memory_total_mb,
        "system"
    );
}

/// Print final summary report
pub fn print_final_report(scenario: &str, results: &SimulationResults, elapsed: Duration) {
    let stdout = io::stdout();
    emit_final_report(&mut stdout.lock(), scenario, results, elapsed);
}

/// Write and flush the report, logging a warning instead of failing.
fn emit_final_report<W: Write>(
    out: &mut W,
    scenario: &str,
    results: &SimulationResults,
    elapsed: Duration,
) -> bool {
    match write_final_report(out, scenario, results, elapsed).and_then(|()| out.flush()) {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "failed to write final report");
            false
        }
    }
}

pub fn write_final_report<W: Write>(
    out: &mut W,
    scenario: &str,
    results: &SimulationResults,
    elapsed: Duration,
) -> io::Result<()> {
    writeln!(out, "\n╔════════════════════════════════════════════════════════════════╗")?;
    writeln!(out, "║                    SIMULATION REPORT                           ║")?;
    writeln!(out, "╚════════════════════════════════════════════════════════════════╝")?;

    writeln!(out, "\n📊 RUNS ({scenario})")?;
    writeln!(out, "   Total:                {:>10}", results.total_runs)?;
    writeln!(out, "   Succeeded:            {:>10}", results.successes)?;
    writeln!(out, "   Failed:               {:>10}", results.failures)?;

    if results.total_runs > 0 {
        writeln!(out, "   Success Rate:         {:>10.2}%", results.success_rate() * 100.0)?;
        let secs = elapsed.as_secs_f64();
        if secs > 0.0 {
            writeln!(
                out,
                "   Throughput:           {:>10.2} runs/sec",
                results.total_runs as f64 / secs
            )?;
        }

        writeln!(out, "\n📈 LATENCY")?;
        writeln!(out, "   Min:                  {:>10} ms", results.min_ms)?;
        writeln!(out, "   Median:               {:>10} ms", results.median_ms)?;
        writeln!(out, "   Mean:                 {:>10.2} ms", results.mean_duration_ms)?;
        writeln!(out, "   Std Dev:              {:>10.2} ms", results.std_dev_ms)?;
        writeln!(out, "   Max:                  {:>10} ms", results.max_ms)?;
        for (key, value) in &results.percentiles {
            writeln!(out, "   {:<22}{:>10} ms", format!("{}:", key.to_uppercase()), value)?;
        }
    }

    writeln!(out, "\n⏱️  Duration: {:.2} seconds", elapsed.as_secs_f64())?;
    writeln!(out, "════════════════════════════════════════════════════════════════\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::aggregate;
    use crate::types::RunRecord;

    #[test]
    fn test_final_report_lists_percentiles() {
        let records = (1..=4)
            .map(|i| RunRecord {
                interval: 0,
                iteration: i,
                success: i != 2,
                duration_ms: i * 10,
            })
            .collect();
        let results = aggregate(records);

        let mut buf = Vec::new();
        write_final_report(&mut buf, "checkout", &results, Duration::from_secs(2)).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert!(text.contains("RUNS (checkout)"));
        assert!(text
            .lines()
            .any(|l| l.trim_start().starts_with("Failed:") && l.trim_end().ends_with(" 1")));
        assert!(text.contains("P99.9:"));
        assert!(text.contains("Throughput:"));
    }

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_final_report_write_error_is_reported_not_raised() {
        let results = aggregate(Vec::new());
        let err = write_final_report(&mut ClosedPipe, "idle", &results, Duration::ZERO)
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);

        assert!(!emit_final_report(&mut ClosedPipe, "idle", &results, Duration::ZERO));
        assert!(emit_final_report(&mut Vec::new(), "idle", &results, Duration::ZERO));
    }

    #[test]
    fn test_final_report_without_runs_skips_latency() {
        let results = aggregate(Vec::new());
        let mut buf = Vec::new();
        write_final_report(&mut buf, "idle", &results, Duration::ZERO).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(!text.contains("LATENCY"));
    }
}
