//! Docguard - documentation linter for git hooks.
//!
//! Docguard checks that the TypeScript/JavaScript declarations touched by a
//! change carry a TSDoc block with the tags their kind requires, and that the
//! documentation is written in English.
//!
//! # Architecture
//!
//! One pipeline, each stage in its own module:
//!
//! - `diff`: runs `git diff` and maps files to changed line numbers
//! - `scan`: classifies lines and finds the declaration owning a change
//! - `validate`: checks the documentation block above a declaration
//! - `lint`: runs the pipeline over a set of changes and collects violations
//! - `config`: YAML configuration with the tag rules and heuristics
//! - `report`: output formatting (pretty, JSON, SARIF)

pub mod cli;
pub mod config;
pub mod diff;
pub mod lint;
pub mod report;
pub mod scan;
pub mod validate;

pub use config::Config;
pub use diff::{ChangedLines, Extractor, Git, GitCli, GitError};
pub use lint::{LintResult, Runner, Violation, ViolationRule};
pub use scan::{find_declaration, DeclarationKind, DeclarationMatch};
pub use validate::{Finding, Validator};
