//! Diff source resolution.
//!
//! Decides what the working tree is compared against and collects the
//! changed lines from the branch range, the index and the working tree.

use std::fmt;

use super::git::Git;
use super::parse::parse_unified_diff;
use super::ChangedLines;
use crate::config::DiffConfig;

/// What committed changes are compared against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffTarget {
    /// A `<base>..HEAD` revision range.
    Range(String),
    /// No branch comparison; only staged changes.
    StagedOnly,
}

impl fmt::Display for DiffTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiffTarget::Range(range) => write!(f, "{}", range),
            DiffTarget::StagedOnly => write!(f, "staged changes"),
        }
    }
}

/// Changed lines and the target they were computed against.
#[derive(Debug, Clone)]
pub struct Extraction {
    pub changed: ChangedLines,
    pub target: DiffTarget,
}

/// Collects changed lines through a [`Git`] collaborator.
pub struct Extractor<'a, G: Git> {
    git: &'a G,
    config: &'a DiffConfig,
    base: Option<String>,
    staged_only: bool,
}

impl<'a, G: Git> Extractor<'a, G> {
    pub fn new(git: &'a G, config: &'a DiffConfig) -> Self {
        Self {
            git,
            config,
            base: None,
            staged_only: false,
        }
    }

    /// Compare against an explicit base ref instead of resolving one.
    pub fn base(mut self, base: Option<String>) -> Self {
        self.base = base;
        self
    }

    /// Only look at staged changes.
    pub fn staged_only(mut self, staged_only: bool) -> Self {
        self.staged_only = staged_only;
        self
    }

    /// Resolve the comparison target.
    pub fn resolve_target(&self) -> DiffTarget {
        if let Some(base) = &self.base {
            return DiffTarget::Range(format!("{}..HEAD", base));
        }
        if self.staged_only {
            return DiffTarget::StagedOnly;
        }

        let remote = self.config.remote.as_str();

        match self.git.run(&["rev-parse", "--abbrev-ref", "HEAD"]) {
            Ok(output) => {
                let branch = output.trim();
                if !branch.is_empty() && branch != "HEAD" {
                    match self.git.run(&["ls-remote", "--heads", remote, branch]) {
                        Ok(heads) if !heads.trim().is_empty() => {
                            return DiffTarget::Range(format!("{}/{}..HEAD", remote, branch));
                        }
                        Ok(_) => tracing::debug!("branch {} has no counterpart on {}", branch, remote),
                        Err(e) => tracing::debug!("ls-remote failed: {}", e),
                    }
                }
            }
            Err(e) => tracing::debug!("could not resolve current branch: {}", e),
        }

        for candidate in &self.config.base_branches {
            let reference = format!("{}/{}", remote, candidate);
            if self.git.run(&["rev-parse", "--verify", reference.as_str()]).is_ok() {
                return DiffTarget::Range(format!("{}..HEAD", reference));
            }
        }

        tracing::info!("no base branch found, checking staged changes only");
        DiffTarget::StagedOnly
    }

    /// Collect changed lines from every applicable source.
    pub fn extract(&self) -> Extraction {
        let target = self.resolve_target();
        tracing::debug!("diff target: {}", target);

        let mut changed = ChangedLines::new();

        if let DiffTarget::Range(range) = &target {
            changed.union(self.diff(&[range.as_str()]));
        }
        if self.staged_only || self.config.include_staged {
            changed.union(self.diff(&["--staged"]));
        }
        if !self.staged_only && self.config.include_unstaged {
            changed.union(self.diff(&[]));
        }

        tracing::debug!(
            "{} changed lines in {} files",
            changed.total_lines(),
            changed.len()
        );

        Extraction { changed, target }
    }

    /// Run one `git diff` and parse it. Failures count as no changes.
    fn diff(&self, extra: &[&str]) -> ChangedLines {
        let unified = format!("-U{}", self.config.unified);
        let mut args = vec!["diff", unified.as_str(), "--no-color"];
        args.extend_from_slice(extra);

        match self.git.run(&args) {
            Ok(text) => parse_unified_diff(&text, self.config.context_lines),
            Err(e) => {
                tracing::warn!("{}", e);
                ChangedLines::new()
            }
        }
    }
}
