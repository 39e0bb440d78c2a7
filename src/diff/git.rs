//! Git subprocess access.

use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;

/// Errors from running git.
#[derive(Debug, Error)]
pub enum GitError {
    #[error("failed to run git: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("`git {command}` exited with {status}: {stderr}")]
    Failed {
        command: String,
        status: String,
        stderr: String,
    },

    #[error("`git {command}` produced non-UTF-8 output")]
    NonUtf8 { command: String },
}

/// Runs git commands and returns their standard output.
pub trait Git {
    fn run(&self, args: &[&str]) -> Result<String, GitError>;
}

/// [`Git`] backed by the `git` executable.
#[derive(Debug, Clone)]
pub struct GitCli {
    repo_root: PathBuf,
}

impl GitCli {
    pub fn new<P: AsRef<Path>>(repo_root: P) -> Self {
        Self {
            repo_root: repo_root.as_ref().to_path_buf(),
        }
    }

    pub fn repo_root(&self) -> &Path {
        &self.repo_root
    }

    /// Top-level directory of the repository containing `dir`.
    pub fn toplevel(dir: &Path) -> Result<PathBuf, GitError> {
        let output = GitCli::new(dir).run(&["rev-parse", "--show-toplevel"])?;
        Ok(PathBuf::from(output.trim()))
    }
}

impl Git for GitCli {
    fn run(&self, args: &[&str]) -> Result<String, GitError> {
        let command = args.join(" ");
        tracing::debug!("git {}", command);

        let output = Command::new("git")
            .args(args)
            .current_dir(&self.repo_root)
            .output()?;

        if !output.status.success() {
            return Err(GitError::Failed {
                command,
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        String::from_utf8(output.stdout).map_err(|_| GitError::NonUtf8 { command })
    }
}
