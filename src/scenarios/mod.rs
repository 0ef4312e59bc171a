// Built-in demo scenarios, selected by CLI subcommand

pub mod cpu_bound;
pub mod failing;
pub mod noop;
pub mod sleep;
