//! Command-line interface for docguard.

use clap::{ArgAction, Parser, Subcommand};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::{self, Config};
use crate::diff::{Extractor, GitCli};
use crate::lint::Runner;
use crate::report::{self, ReportContext};

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILED: i32 = 1;
pub const EXIT_ERROR: i32 = 2;

/// Default config template written by `init`.
const CONFIG_TEMPLATE: &str = include_str!("templates/docguard.yaml");

/// Documentation linter for git hooks.
///
/// Docguard looks at the lines changed in a git diff, finds the class,
/// function or property each change belongs to, and checks that the
/// declaration carries a TSDoc block with the required tags, written in
/// English.
#[derive(Parser)]
#[command(name = "docguard")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check the documentation of changed declarations
    #[command(visible_alias = "lint")]
    Check(CheckArgs),
    /// Write a docguard config file with the default rules
    Init(InitArgs),
}

/// Arguments for the check command.
#[derive(Parser)]
pub struct CheckArgs {
    /// Path to config YAML file (default: auto-discover in the repository root)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output format: pretty, json, or sarif
    #[arg(short, long, default_value = "pretty")]
    pub format: String,

    /// Compare against this ref instead of resolving a base branch
    #[arg(long, value_name = "REF", conflicts_with = "staged")]
    pub base: Option<String>,

    /// Only check staged changes
    #[arg(long)]
    pub staged: bool,

    /// Extra lines around each hunk treated as changed
    #[arg(long, value_name = "N")]
    pub context: Option<usize>,

    /// Check every declaration in these files or directories instead of a diff
    #[arg(long, value_name = "PATH", num_args = 1..)]
    pub all: Vec<PathBuf>,
}

/// Arguments for the init command.
#[derive(Parser)]
pub struct InitArgs {
    /// Output file path
    #[arg(short, long, default_value = "docguard.yaml")]
    pub output: PathBuf,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

/// Repository root: the git top level, or the current directory outside a
/// repository.
fn repo_root() -> anyhow::Result<PathBuf> {
    let cwd = std::env::current_dir()?;
    let root = match GitCli::toplevel(&cwd) {
        Ok(root) => root,
        Err(e) => {
            tracing::debug!("not in a git repository: {}", e);
            cwd
        }
    };
    Ok(root.canonicalize().unwrap_or(root))
}

/// Collect lintable files under `root`.
fn collect_files(root: &Path, config: &Config) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_entry(|e| {
            let name = e.file_name().to_string_lossy();
            // Skip hidden and dependency directories
            if e.depth() > 0 && e.file_type().is_dir() && name.starts_with('.') {
                return false;
            }
            !(e.file_type().is_dir() && name == "node_modules")
        })
    {
        let entry = entry?;
        if entry.file_type().is_file() && config.is_supported_file(entry.path()) {
            files.push(entry.path().to_path_buf());
        }
    }

    Ok(files)
}

/// Run the check command.
pub fn run_check(args: &CheckArgs) -> anyhow::Result<i32> {
    // Validate format
    if args.format != "pretty" && args.format != "json" && args.format != "sarif" {
        eprintln!(
            "Error: invalid format {:?}, must be 'pretty', 'json', or 'sarif'",
            args.format
        );
        return Ok(EXIT_ERROR);
    }

    let root = repo_root()?;

    // Load config
    let (mut config, config_path) = match Config::load(&root, args.config.as_deref()) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(EXIT_ERROR);
        }
    };

    if let Err(e) = config::validate(&config) {
        eprintln!("Error: invalid config: {}", e);
        return Ok(EXIT_ERROR);
    }

    if let Some(context) = args.context {
        config.diff.context_lines = context;
    }

    let mut runner = Runner::new(&root, &config)?;

    let (target, result) = if args.all.is_empty() {
        let git = GitCli::new(&root);
        let extraction = Extractor::new(&git, &config.diff)
            .base(args.base.clone())
            .staged_only(args.staged)
            .extract();

        if extraction.changed.is_empty() {
            tracing::info!("no changed lines against {}", extraction.target);
        }

        (extraction.target.to_string(), runner.run(&extraction.changed))
    } else {
        let mut files = Vec::new();
        for path in &args.all {
            let abs_path = match path.canonicalize() {
                Ok(p) => p,
                Err(e) => {
                    eprintln!("Error: cannot access path {:?}: {}", path, e);
                    return Ok(EXIT_ERROR);
                }
            };
            if abs_path.is_dir() {
                files.extend(collect_files(&abs_path, &config)?);
            } else {
                files.push(abs_path);
            }
        }

        let target = args
            .all
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        (target, runner.lint_paths(&files))
    };

    let ctx = ReportContext {
        target,
        config: config_path.map(|p| {
            p.strip_prefix(&root)
                .unwrap_or(&p)
                .display()
                .to_string()
        }),
    };

    match args.format.as_str() {
        "json" => report::write_json(&ctx, &result)?,
        "sarif" => report::write_sarif(&result)?,
        _ => report::write_pretty(&ctx, &result),
    }

    if result.has_errors() {
        Ok(EXIT_FAILED)
    } else {
        Ok(EXIT_SUCCESS)
    }
}

/// Run the init command.
pub fn run_init(args: &InitArgs) -> anyhow::Result<i32> {
    // Check if output already exists
    if args.output.exists() && !args.force {
        eprintln!("Error: file already exists: {}", args.output.display());
        eprintln!("Use --force to overwrite it or --output to specify a different path");
        return Ok(EXIT_ERROR);
    }

    // Create output directory if needed
    if let Some(parent) = args.output.parent() {
        if !parent.as_os_str().is_empty() && parent != Path::new(".") {
            if let Err(e) = std::fs::create_dir_all(parent) {
                eprintln!("Error: failed to create directory: {}", e);
                return Ok(EXIT_ERROR);
            }
        }
    }

    if let Err(e) = std::fs::write(&args.output, CONFIG_TEMPLATE) {
        eprintln!("Error: failed to write config: {}", e);
        return Ok(EXIT_ERROR);
    }

    println!("Created {}", args.output.display());
    println!();
    println!("Next steps:");
    println!("  1. Edit {} to adjust the tag rules for your project", args.output.display());
    println!("  2. Add `docguard check` to your pre-commit or pre-push hook");

    Ok(EXIT_SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_template_matches_defaults() {
        let config = Config::parse_str(CONFIG_TEMPLATE).unwrap();
        let defaults = Config::default();
        assert_eq!(config.rules, defaults.rules);
        assert_eq!(config.extensions, defaults.extensions);
        assert_eq!(config.excluded_paths, defaults.excluded_paths);
        assert_eq!(config.language.threshold, defaults.language.threshold);
        assert_eq!(config.language.stop_words, defaults.language.stop_words);
        assert_eq!(config.diff.base_branches, defaults.diff.base_branches);
        assert!(config::validate(&config).is_ok());
    }

    #[test]
    fn test_init_writes_and_refuses_overwrite() {
        let temp = TempDir::new().unwrap();
        let output = temp.path().join("cfg/docguard.yaml");
        let args = InitArgs {
            output: output.clone(),
            force: false,
        };

        assert_eq!(run_init(&args).unwrap(), EXIT_SUCCESS);
        assert!(output.is_file());
        assert_eq!(run_init(&args).unwrap(), EXIT_ERROR);

        let forced = InitArgs {
            output,
            force: true,
        };
        assert_eq!(run_init(&forced).unwrap(), EXIT_SUCCESS);
    }

    #[test]
    fn test_collect_files_filters_extensions() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join("src")).unwrap();
        std::fs::create_dir_all(temp.path().join("node_modules/lib")).unwrap();
        std::fs::create_dir_all(temp.path().join(".cache")).unwrap();
        std::fs::write(temp.path().join("src/app.ts"), "").unwrap();
        std::fs::write(temp.path().join("src/view.jsx"), "").unwrap();
        std::fs::write(temp.path().join("src/notes.md"), "").unwrap();
        std::fs::write(temp.path().join("node_modules/lib/index.js"), "").unwrap();
        std::fs::write(temp.path().join(".cache/x.ts"), "").unwrap();

        let mut files = collect_files(temp.path(), &Config::default()).unwrap();
        files.sort();
        let names: Vec<String> = files
            .iter()
            .map(|p| p.strip_prefix(temp.path()).unwrap().display().to_string())
            .collect();
        assert_eq!(names, vec!["src/app.ts", "src/view.jsx"]);
    }

    #[test]
    fn test_cli_parses_check_flags() {
        let cli = Cli::try_parse_from([
            "docguard", "-v", "check", "--format", "json", "--staged", "--context", "3",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 1);
        match cli.command {
            Commands::Check(args) => {
                assert_eq!(args.format, "json");
                assert!(args.staged);
                assert_eq!(args.context, Some(3));
                assert!(args.all.is_empty());
            }
            Commands::Init(_) => panic!("expected check"),
        }

        assert!(Cli::try_parse_from(["docguard", "check", "--base", "main", "--staged"]).is_err());
    }
}
