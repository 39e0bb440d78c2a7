//! Diff extraction.
//!
//! Runs `git diff` through the [`Git`] trait and turns unified diff text
//! into a map of changed lines per file.

mod changed;
mod git;
mod parse;
mod source;

pub use changed::ChangedLines;
pub use git::{Git, GitCli, GitError};
pub use parse::parse_unified_diff;
pub use source::{DiffTarget, Extraction, Extractor};
