//! Lint runner that ties the diff, the locator and the validator together.

use globset::GlobSet;
use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::diff::ChangedLines;
use crate::scan::{declaration_at, find_declaration, find_documented_declaration, is_inside_doc_block, DeclarationMatch};
use crate::validate::Validator;

use super::{LintResult, Severity, SkippedFile, Violation};

/// Validates the declarations that own changed lines.
pub struct Runner {
    root: PathBuf,
    config: Config,
    excluded: GlobSet,
    validator: Validator,
    /// Declarations already validated, by file and line index.
    validated: HashSet<(String, usize)>,
}

impl Runner {
    /// Create a runner for the repository at `root`.
    pub fn new<P: AsRef<Path>>(root: P, config: &Config) -> anyhow::Result<Self> {
        Ok(Self {
            root: root.as_ref().to_path_buf(),
            config: config.clone(),
            excluded: config.excluded_matcher()?,
            validator: Validator::new(config)?,
            validated: HashSet::new(),
        })
    }

    /// Whether `file` (repository-relative) is subject to linting.
    pub fn is_linted(&self, file: &str) -> bool {
        self.config.is_supported_file(Path::new(file)) && !self.excluded.is_match(file)
    }

    /// Lint the declarations touched by `changed`.
    pub fn run(&mut self, changed: &ChangedLines) -> LintResult {
        let mut result = LintResult::new();

        for (file, lines) in changed.iter() {
            if !self.is_linted(file) {
                tracing::debug!("skipping {}", file);
                continue;
            }

            let content = match self.read(file) {
                Ok(content) => content,
                Err(skipped) => {
                    result.skipped.push(skipped);
                    continue;
                }
            };

            result.merge(self.lint_source(file, &content, lines));
        }

        result
    }

    /// Lint every declaration in the given files.
    pub fn lint_paths(&mut self, files: &[PathBuf]) -> LintResult {
        let mut result = LintResult::new();

        for path in files {
            let file = self.relative(path);
            if !self.is_linted(&file) {
                tracing::debug!("skipping {}", file);
                continue;
            }

            let content = match self.read(&file) {
                Ok(content) => content,
                Err(skipped) => {
                    result.skipped.push(skipped);
                    continue;
                }
            };

            let lines: Vec<&str> = content.lines().collect();
            let declarations: Vec<DeclarationMatch> = (0..lines.len())
                .filter_map(|i| declaration_at(&lines, i))
                .collect();

            let mut file_result = self.lint_declarations(&file, &lines, declarations);
            file_result.scanned = 1;
            result.merge(file_result);
        }

        result
    }

    /// Lint the declarations owning `changed` lines (1-based) of one file.
    ///
    /// Changes inside documentation blocks are resolved first, downward to
    /// the documented declaration; other changes are resolved upward.
    pub fn lint_source(&mut self, file: &str, content: &str, changed: &BTreeSet<usize>) -> LintResult {
        let lines: Vec<&str> = content.lines().collect();

        let (doc_changes, code_changes): (Vec<usize>, Vec<usize>) = changed
            .iter()
            .filter(|&&line| line >= 1 && line <= lines.len())
            .map(|&line| line - 1)
            .partition(|&index| is_inside_doc_block(&lines, index));

        let declarations: Vec<DeclarationMatch> = doc_changes
            .iter()
            .filter_map(|&index| find_documented_declaration(&lines, index))
            .chain(code_changes.iter().filter_map(|&index| find_declaration(&lines, index)))
            .collect();

        let mut result = self.lint_declarations(file, &lines, declarations);
        result.scanned = 1;
        result
    }

    fn lint_declarations(
        &mut self,
        file: &str,
        lines: &[&str],
        mut declarations: Vec<DeclarationMatch>,
    ) -> LintResult {
        let mut result = LintResult::new();

        declarations.sort_by_key(|d| d.index);
        declarations.dedup();

        for decl in declarations {
            if !self.validated.insert((file.to_string(), decl.index)) {
                continue;
            }
            result.declarations += 1;

            let declaration = lines[decl.index].trim().to_string();
            tracing::debug!("{}:{} {} `{}`", file, decl.line_number(), decl.kind, declaration);

            for finding in self.validator.validate(lines, &decl) {
                result.violations.push(Violation {
                    rule: finding.rule,
                    message: finding.message,
                    file: file.to_string(),
                    line: decl.line_number(),
                    declaration: declaration.clone(),
                    severity: Severity::Error,
                });
            }
        }

        result
    }

    fn read(&self, file: &str) -> Result<String, SkippedFile> {
        fs::read_to_string(self.root.join(file)).map_err(|e| {
            let reason = match e.kind() {
                io::ErrorKind::NotFound => "file not found (deleted or renamed)".to_string(),
                _ => e.to_string(),
            };
            tracing::warn!("skipping {}: {}", file, reason);
            SkippedFile {
                file: file.to_string(),
                reason,
            }
        })
    }

    fn relative(&self, path: &Path) -> String {
        path.strip_prefix(&self.root)
            .unwrap_or(path)
            .to_string_lossy()
            .replace('\\', "/")
    }
}
