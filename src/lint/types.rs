//! Core types for lint results.

use serde::{Deserialize, Serialize};

/// Severity of a violation. Every documentation problem fails the hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
        }
    }
}

/// Rule names for documentation violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ViolationRule {
    #[serde(rename = "missing_doc_block")]
    MissingDocBlock,
    #[serde(rename = "malformed_doc_block")]
    MalformedDocBlock,
    #[serde(rename = "missing_tag")]
    MissingTag,
    #[serde(rename = "undocumented_param")]
    UndocumentedParam,
    #[serde(rename = "missing_return_tag")]
    MissingReturnTag,
    #[serde(rename = "non_english")]
    NonEnglish,
}

impl ViolationRule {
    pub const ALL: [ViolationRule; 6] = [
        ViolationRule::MissingDocBlock,
        ViolationRule::MalformedDocBlock,
        ViolationRule::MissingTag,
        ViolationRule::UndocumentedParam,
        ViolationRule::MissingReturnTag,
        ViolationRule::NonEnglish,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ViolationRule::MissingDocBlock => "missing_doc_block",
            ViolationRule::MalformedDocBlock => "malformed_doc_block",
            ViolationRule::MissingTag => "missing_tag",
            ViolationRule::UndocumentedParam => "undocumented_param",
            ViolationRule::MissingReturnTag => "missing_return_tag",
            ViolationRule::NonEnglish => "non_english",
        }
    }
}

impl std::fmt::Display for ViolationRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single documentation problem.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Violation {
    pub rule: ViolationRule,
    pub message: String,
    pub file: String,
    /// 1-based line of the declaration.
    pub line: usize,
    /// Trimmed declaration text.
    pub declaration: String,
    pub severity: Severity,
}

/// A changed file that could not be linted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedFile {
    pub file: String,
    pub reason: String,
}

/// Results of a lint run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LintResult {
    pub violations: Vec<Violation>,
    #[serde(default)]
    pub skipped: Vec<SkippedFile>,
    /// Number of files read and scanned.
    pub scanned: usize,
    /// Number of distinct declarations validated.
    pub declarations: usize,
}

impl LintResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge another result into this one.
    pub fn merge(&mut self, other: LintResult) {
        self.violations.extend(other.violations);
        self.skipped.extend(other.skipped);
        self.scanned += other.scanned;
        self.declarations += other.declarations;
    }

    /// Check if there are any error-severity violations.
    pub fn has_errors(&self) -> bool {
        self.violations
            .iter()
            .any(|v| v.severity == Severity::Error)
    }

    /// Number of declarations with at least one violation.
    pub fn failing_declarations(&self) -> usize {
        let mut seen: Vec<(&str, usize)> = self
            .violations
            .iter()
            .map(|v| (v.file.as_str(), v.line))
            .collect();
        seen.sort_unstable();
        seen.dedup();
        seen.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn violation(file: &str, line: usize, rule: ViolationRule) -> Violation {
        Violation {
            rule,
            message: String::new(),
            file: file.to_string(),
            line,
            declaration: String::new(),
            severity: Severity::Error,
        }
    }

    #[test]
    fn test_rule_names_match_serde() {
        for rule in ViolationRule::ALL {
            let json = serde_json::to_string(&rule).unwrap();
            assert_eq!(json, format!("\"{}\"", rule.as_str()));
            assert_eq!(rule.to_string(), rule.as_str());
        }
        assert_eq!(serde_json::to_string(&Severity::Error).unwrap(), "\"error\"");
    }

    #[test]
    fn test_failing_declarations() {
        let mut result = LintResult::new();
        assert!(!result.has_errors());

        result.violations.push(violation("a.ts", 3, ViolationRule::MissingTag));
        result.violations.push(violation("a.ts", 3, ViolationRule::NonEnglish));
        result.violations.push(violation("b.ts", 3, ViolationRule::MissingDocBlock));
        assert!(result.has_errors());
        assert_eq!(result.failing_declarations(), 2);
    }

    #[test]
    fn test_merge() {
        let mut a = LintResult {
            scanned: 1,
            declarations: 2,
            ..Default::default()
        };
        let b = LintResult {
            violations: vec![violation("b.ts", 1, ViolationRule::MissingTag)],
            skipped: vec![SkippedFile {
                file: "gone.ts".to_string(),
                reason: "not found".to_string(),
            }],
            scanned: 2,
            declarations: 1,
        };
        a.merge(b);
        assert_eq!(a.scanned, 3);
        assert_eq!(a.declarations, 3);
        assert_eq!(a.violations.len(), 1);
        assert_eq!(a.skipped.len(), 1);
    }
}
