//! Scenario execution: single runs and concurrent batches.

pub mod batch;
pub mod run;

pub use batch::BatchExecutor;
pub use run::RunExecutor;
