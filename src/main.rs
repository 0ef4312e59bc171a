use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use crabdance_loadsim::{
    export, profile, report, Interval, MetricsCollector, Scenario, Simulation, SimulationFile,
    Telemetry,
};
use tokio::time::Instant;
use tracing_subscriber::EnvFilter;

mod cli;
mod scenarios;

use cli::{Cli, ScenarioKind};
use scenarios::cpu_bound::CpuBoundScenario;
use scenarios::failing::FailingScenario;
use scenarios::noop::NoopScenario;
use scenarios::sleep::SleepScenario;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over --verbose
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = tracing_subscriber::fmt().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let intervals = collect_intervals(&cli)?;
    let scenario = build_scenario(&cli.scenario);

    tracing::info!("Load Simulation Starting...");
    tracing::info!("Scenario: {}", scenario.name());
    tracing::info!("Intervals: {}", intervals.len().max(1));

    let collector = MetricsCollector::new();
    let telemetry = Telemetry::with_metrics(Arc::new(collector.clone()));

    let reporter = (cli.report_interval > 0).then(|| {
        let collector = collector.clone();
        let interval_secs = cli.report_interval;
        tokio::spawn(async move {
            report::start_periodic_reporter(collector, interval_secs).await;
        })
    });

    let simulation = Simulation::from_arc(scenario)
        .with_telemetry(telemetry)
        .with_intervals(intervals);

    let start = Instant::now();
    let results = simulation.run().await;
    let elapsed = start.elapsed();

    if let Some(handle) = reporter {
        handle.abort();
    }

    report::print_final_report(simulation.scenario_name(), &results, elapsed);

    if let Some(path) = &cli.csv {
        export::write_csv_file(&results.records, path)
            .with_context(|| format!("failed to write CSV to {}", path.display()))?;
        tracing::info!("Wrote {} records to {}", results.records.len(), path.display());
    }
    if let Some(path) = &cli.json {
        export::write_json_file(&results, path)
            .with_context(|| format!("failed to write JSON to {}", path.display()))?;
        tracing::info!("Wrote results to {}", path.display());
    }

    tracing::info!("Simulation complete");
    Ok(())
}

/// Merge interval sources: profile, then config file, then `--interval` flags.
fn collect_intervals(cli: &Cli) -> Result<Vec<Interval>> {
    let mut intervals = Vec::new();

    if let Some(name) = &cli.profile {
        intervals.extend(profile(name)?);
    }
    if let Some(path) = &cli.config {
        let file = SimulationFile::load(path)?;
        if let Some(name) = &file.name {
            tracing::info!("Loaded simulation '{}' from {}", name, path.display());
        }
        intervals.extend(file.intervals()?);
    }
    for spec in &cli.intervals {
        intervals.push(spec.to_interval()?);
    }

    Ok(intervals)
}

fn build_scenario(kind: &ScenarioKind) -> Arc<dyn Scenario> {
    match kind {
        ScenarioKind::Noop => Arc::new(NoopScenario),
        ScenarioKind::Sleep(args) => Arc::new(SleepScenario {
            latency_ms: args.latency_ms,
            jitter_ms: args.jitter_ms,
        }),
        ScenarioKind::Cpu(args) => Arc::new(CpuBoundScenario {
            iterations: args.iterations,
        }),
        ScenarioKind::Failing(args) => Arc::new(FailingScenario {
            failure_rate: args.failure_rate.clamp(0.0, 1.0),
            latency_ms: args.latency_ms,
        }),
    }
}
