use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use crabdance_loadsim::IntervalSpec;

/// Load simulation tool
#[derive(Parser, Debug)]
#[command(name = "loadsim")]
#[command(about = "Run a scenario under a configurable concurrency ramp and report latency statistics")]
#[command(version)]
pub struct Cli {
    /// Interval spec, repeatable: `duration=30s,base=1,ramp=0.5` or `iterations=10,base=4`
    #[arg(long = "interval", short = 'i', global = true)]
    pub intervals: Vec<IntervalSpec>,

    /// TOML simulation file with an `[[interval]]` array
    #[arg(long, global = true, env = "LOADSIM_CONFIG")]
    pub config: Option<PathBuf>,

    /// Preset ramp profile: smoke, ramp, soak, spike
    #[arg(long, global = true, env = "LOADSIM_PROFILE")]
    pub profile: Option<String>,

    /// Write raw run records as CSV
    #[arg(long, global = true)]
    pub csv: Option<PathBuf>,

    /// Write the full results as JSON
    #[arg(long, global = true)]
    pub json: Option<PathBuf>,

    /// Progress reporting interval in seconds (0 disables)
    #[arg(long, default_value = "5", global = true)]
    pub report_interval: u64,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub scenario: ScenarioKind,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ScenarioKind {
    /// Return success immediately
    Noop,

    /// Sleep for a fixed latency, simulating I/O-bound work
    Sleep(SleepArgs),

    /// Burn CPU for a number of hashing rounds
    Cpu(CpuArgs),

    /// Fail with a configured probability
    Failing(FailingArgs),
}

#[derive(Args, Debug, Clone)]
pub struct SleepArgs {
    /// Latency per invocation in milliseconds
    #[arg(long, default_value = "100")]
    pub latency_ms: u64,

    /// Random extra latency in milliseconds, uniform in [0, jitter)
    #[arg(long, default_value = "0")]
    pub jitter_ms: u64,
}

#[derive(Args, Debug, Clone)]
pub struct CpuArgs {
    /// Hashing rounds per invocation
    #[arg(long, default_value = "10000")]
    pub iterations: usize,
}

#[derive(Args, Debug, Clone)]
pub struct FailingArgs {
    /// Failure rate as decimal (0.0-1.0)
    #[arg(long, default_value = "0.1")]
    pub failure_rate: f64,

    /// Latency per invocation in milliseconds
    #[arg(long, default_value = "10")]
    pub latency_ms: u64,
}
