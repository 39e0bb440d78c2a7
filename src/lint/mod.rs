//! Lint orchestration and result types.

mod runner;
mod types;

pub use runner::Runner;
pub use types::{LintResult, Severity, SkippedFile, Violation, ViolationRule};
