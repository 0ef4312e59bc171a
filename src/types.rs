//! Core value types shared by the executors, scheduler and aggregator.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Result of a single scenario invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub success: bool,
}

impl Outcome {
    pub fn success() -> Self {
        Self { success: true }
    }

    pub fn failure() -> Self {
        Self { success: false }
    }
}

impl From<bool> for Outcome {
    fn from(success: bool) -> Self {
        Self { success }
    }
}

/// One completed scenario invocation.
///
/// Created by the run executor and never mutated afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunRecord {
    /// Zero-based index of the interval that produced this record
    pub interval: usize,
    /// One-based batch counter within the interval
    pub iteration: u64,
    pub success: bool,
    /// Wall-clock duration in whole milliseconds
    pub duration_ms: u64,
}

/// Status a run span is closed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunStatus {
    Ok,
    Error,
}

impl RunStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunStatus::Ok => "ok",
            RunStatus::Error => "error",
        }
    }
}

impl From<bool> for RunStatus {
    fn from(success: bool) -> Self {
        if success {
            RunStatus::Ok
        } else {
            RunStatus::Error
        }
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
