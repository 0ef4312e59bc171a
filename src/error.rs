//! Error types for the load simulation harness.
//!
//! Configuration problems surface synchronously as [`ConfigError`] before any
//! scenario executes. Scenario failures never show up here: they are folded
//! into failed [`crate::RunRecord`]s by the run executor.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Invalid interval or simulation configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Base concurrency was negative, too large or not a number
    #[error("base copies must be a number in [0, 1000000], got {0}")]
    InvalidBaseCopies(f64),

    /// Ramp rate was negative, too large or not a number
    #[error("ramp rate must be a number in [0, 1000000], got {0}")]
    InvalidRampRate(f64),

    /// Iteration-bounded interval with fewer than one iteration
    #[error("iteration count must be >= 1, got {0}")]
    InvalidIterationCount(i64),

    /// Interval declared neither a duration nor an iteration count
    #[error("interval must set either `duration` or `iterations`")]
    MissingStopCondition,

    /// Interval declared both a duration and an iteration count
    #[error("interval must not set both `duration` and `iterations`")]
    ConflictingStopCondition,

    /// Interval spec string could not be parsed
    #[error("invalid interval spec `{spec}`: {reason}")]
    InvalidSpec { spec: String, reason: String },

    /// Requested ramp profile does not exist
    #[error("unknown profile `{0}` (expected one of: smoke, ramp, soak, spike)")]
    UnknownProfile(String),

    /// Simulation file could not be read
    #[error("failed to read simulation file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Simulation file is not valid TOML for the expected layout
    #[error("invalid simulation file: {0}")]
    Toml(#[from] toml::de::Error),
}

impl ConfigError {
    pub(crate) fn invalid_spec(spec: impl Into<String>, reason: impl Into<String>) -> Self {
        ConfigError::InvalidSpec {
            spec: spec.into(),
            reason: reason.into(),
        }
    }
}

/// Failure while exporting results.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV export failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON export failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error during export: {0}")]
    Io(#[from] io::Error),
}
