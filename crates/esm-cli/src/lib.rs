//! Run orchestration and logging for the `esm` command.
//!
//! The binary parses flags and prints summaries; everything a run does lives
//! here so it can be driven from tests.

pub mod logging;
pub mod pipeline;
pub mod types;

pub use pipeline::{default_output_dir, run};
pub use types::{RunOutcome, RunResult};
