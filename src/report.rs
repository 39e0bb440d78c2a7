//! Output formatting for docguard results.
//!
//! Supports three output formats:
//! - Pretty: colored terminal output grouped by file and declaration
//! - JSON: structured output for programmatic consumption
//! - SARIF: Static Analysis Results Interchange Format for IDE/CI integration

use colored::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::lint::{LintResult, Severity, SkippedFile, Violation, ViolationRule};

/// What a report describes: the diff target and the config in effect.
#[derive(Debug, Clone)]
pub struct ReportContext {
    /// Diff range, "staged changes" or the list of paths for a full check.
    pub target: String,
    /// Config file path, or `None` for the built-in defaults.
    pub config: Option<String>,
}

impl ReportContext {
    fn config_label(&self) -> &str {
        self.config.as_deref().unwrap_or("built-in defaults")
    }
}

// =============================================================================
// JSON Format
// =============================================================================

/// JSON report structure.
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonReport {
    pub version: String,
    pub target: String,
    pub config: String,
    pub passed: bool,
    pub files_scanned: usize,
    pub declarations_checked: usize,
    pub violations: Vec<JsonViolation>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<SkippedFile>,
}

/// JSON violation structure.
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonViolation {
    pub rule: String,
    pub severity: String,
    pub file: String,
    pub line: usize,
    pub declaration: String,
    pub message: String,
}

/// Build the JSON report for a result.
pub fn json_report(ctx: &ReportContext, result: &LintResult) -> JsonReport {
    JsonReport {
        version: env!("CARGO_PKG_VERSION").to_string(),
        target: ctx.target.clone(),
        config: ctx.config_label().to_string(),
        passed: !result.has_errors(),
        files_scanned: result.scanned,
        declarations_checked: result.declarations,
        violations: result.violations.iter().map(violation_to_json).collect(),
        skipped: result.skipped.clone(),
    }
}

/// Write results in JSON format.
pub fn write_json(ctx: &ReportContext, result: &LintResult) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(&json_report(ctx, result))?;
    println!("{}", json);
    Ok(())
}

fn violation_to_json(v: &Violation) -> JsonViolation {
    JsonViolation {
        rule: v.rule.as_str().to_string(),
        severity: v.severity.to_string(),
        file: v.file.clone(),
        line: v.line,
        declaration: v.declaration.clone(),
        message: v.message.clone(),
    }
}

// =============================================================================
// SARIF Format
// =============================================================================

const SARIF_VERSION: &str = "2.1.0";
const SARIF_SCHEMA: &str = "https://raw.githubusercontent.com/oasis-tcs/sarif-spec/master/Schemata/sarif-schema-2.1.0.json";
const TOOL_NAME: &str = "docguard";

#[derive(Debug, Serialize, Deserialize)]
pub struct SarifReport {
    pub version: String,
    #[serde(rename = "$schema")]
    pub schema: String,
    pub runs: Vec<SarifRun>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SarifRun {
    pub tool: SarifTool,
    pub results: Vec<SarifResult>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SarifTool {
    pub driver: SarifDriver,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SarifDriver {
    pub name: String,
    pub version: String,
    pub rules: Vec<SarifRule>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SarifRule {
    pub id: String,
    pub name: String,
    #[serde(rename = "shortDescription")]
    pub short_description: SarifMessage,
    #[serde(rename = "fullDescription")]
    pub full_description: SarifMessage,
    #[serde(rename = "defaultConfiguration")]
    pub default_config: SarifRuleConfig,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SarifRuleConfig {
    pub level: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SarifResult {
    #[serde(rename = "ruleId")]
    pub rule_id: String,
    pub level: String,
    pub message: SarifMessage,
    pub locations: Vec<SarifLocation>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SarifMessage {
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SarifLocation {
    #[serde(rename = "physicalLocation")]
    pub physical_location: SarifPhysicalLocation,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SarifPhysicalLocation {
    #[serde(rename = "artifactLocation")]
    pub artifact_location: SarifArtifact,
    pub region: SarifRegion,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SarifArtifact {
    pub uri: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SarifRegion {
    #[serde(rename = "startLine")]
    pub start_line: usize,
}

/// Rule metadata for SARIF output.
struct RuleInfo {
    name: &'static str,
    short_description: &'static str,
    full_description: &'static str,
}

fn get_rule_info(rule: ViolationRule) -> RuleInfo {
    match rule {
        ViolationRule::MissingDocBlock => RuleInfo {
            name: "MissingDocBlock",
            short_description: "Declaration has no documentation block",
            full_description: "A changed class, function or property is not directly preceded by a /** ... */ documentation block.",
        },
        ViolationRule::MalformedDocBlock => RuleInfo {
            name: "MalformedDocBlock",
            short_description: "Comment block closed without a /** opener",
            full_description: "The comment above the declaration ends with */ but no matching /** opener was found.",
        },
        ViolationRule::MissingTag => RuleInfo {
            name: "MissingTag",
            short_description: "Documentation block is missing a required tag",
            full_description: "The documentation block does not contain one of the tags required for the declaration's kind.",
        },
        ViolationRule::UndocumentedParam => RuleInfo {
            name: "UndocumentedParam",
            short_description: "Parameter is not documented with @param",
            full_description: "A parameter in the function signature is not named by any @param tag in its documentation block.",
        },
        ViolationRule::MissingReturnTag => RuleInfo {
            name: "MissingReturnTag",
            short_description: "Function returns a value but has no @returns tag",
            full_description: "The function declares a non-void return type but its documentation block has no @returns tag.",
        },
        ViolationRule::NonEnglish => RuleInfo {
            name: "NonEnglish",
            short_description: "Documentation does not appear to be written in English",
            full_description: "The documentation block contains several stop words from another language.",
        },
    }
}

fn map_severity_to_level(severity: &Severity) -> &'static str {
    match severity {
        Severity::Error => "error",
    }
}

/// Build the SARIF report for a result.
pub fn sarif_report(result: &LintResult) -> SarifReport {
    // Rules in a stable order
    let rule_set: BTreeSet<&'static str> = result.violations.iter().map(|v| v.rule.as_str()).collect();

    let rules: Vec<SarifRule> = ViolationRule::ALL
        .into_iter()
        .filter(|r| rule_set.contains(r.as_str()))
        .map(|rule| {
            let info = get_rule_info(rule);
            SarifRule {
                id: rule.as_str().to_string(),
                name: info.name.to_string(),
                short_description: SarifMessage {
                    text: info.short_description.to_string(),
                },
                full_description: SarifMessage {
                    text: info.full_description.to_string(),
                },
                default_config: SarifRuleConfig {
                    level: "error".to_string(),
                },
            }
        })
        .collect();

    let results: Vec<SarifResult> = result
        .violations
        .iter()
        .map(|v| SarifResult {
            rule_id: v.rule.as_str().to_string(),
            level: map_severity_to_level(&v.severity).to_string(),
            message: SarifMessage {
                text: v.message.clone(),
            },
            locations: vec![SarifLocation {
                physical_location: SarifPhysicalLocation {
                    artifact_location: SarifArtifact {
                        uri: v.file.replace('\\', "/"),
                    },
                    region: SarifRegion {
                        start_line: v.line.max(1),
                    },
                },
            }],
        })
        .collect();

    SarifReport {
        version: SARIF_VERSION.to_string(),
        schema: SARIF_SCHEMA.to_string(),
        runs: vec![SarifRun {
            tool: SarifTool {
                driver: SarifDriver {
                    name: TOOL_NAME.to_string(),
                    version: env!("CARGO_PKG_VERSION").to_string(),
                    rules,
                },
            },
            results,
        }],
    }
}

/// Write results in SARIF format.
pub fn write_sarif(result: &LintResult) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(&sarif_report(result))?;
    println!("{}", json);
    Ok(())
}

// =============================================================================
// Pretty Format
// =============================================================================

/// Write results in pretty (human-readable) format.
pub fn write_pretty(ctx: &ReportContext, result: &LintResult) {
    // Header
    println!();
    print!("  ");
    print!("{}", "docguard".cyan().bold());
    println!(" v{}", env!("CARGO_PKG_VERSION"));
    println!();

    print!("  {}", "Checking: ".dimmed());
    println!("{}", ctx.target);
    print!("  {}", "Config:   ".dimmed());
    println!("{}", ctx.config_label());
    println!();

    write_result_summary(result);
    println!();

    if !result.violations.is_empty() {
        write_violations(&result.violations);
    }

    if !result.skipped.is_empty() {
        write_skipped(&result.skipped);
        println!();
    }

    write_final_status(result);
    println!();
}

fn write_result_summary(result: &LintResult) {
    if result.has_errors() {
        print!("  {}", "✗ FAIL".red());
    } else {
        print!("  {}", "✓ PASS".green());
    }

    print!(
        "  {} declaration{} checked in {} file{}",
        result.declarations,
        plural(result.declarations),
        result.scanned,
        plural(result.scanned)
    );

    if result.has_errors() {
        let failing = result.failing_declarations();
        print!(
            "  {}",
            format!("({} with errors)", failing).red()
        );
    }

    println!();
}

/// Violations grouped by file, then by declaration.
fn write_violations(violations: &[Violation]) {
    let mut current_file: Option<&str> = None;
    let mut current_line: Option<usize> = None;

    for v in violations {
        if current_file != Some(v.file.as_str()) {
            if current_file.is_some() {
                println!();
            }
            println!("  {}", v.file.blue().bold());
            current_file = Some(v.file.as_str());
            current_line = None;
        }

        if current_line != Some(v.line) {
            println!(
                "    {} {}",
                format!("error at line {}:", v.line).red(),
                v.declaration
            );
            current_line = Some(v.line);
        }

        write_severity_tag(&v.severity);
        print!("{:<20}", v.rule.as_str().dimmed());
        println!("{}", v.message);
    }
    println!();
}

fn write_severity_tag(severity: &Severity) {
    match severity {
        Severity::Error => print!("      {} ", "ERROR".red()),
    }
}

fn write_skipped(skipped: &[SkippedFile]) {
    println!("  {} ({}):", "Skipped".dimmed(), skipped.len());
    for s in skipped {
        print!("    {}", s.file.blue());
        println!("  {}", s.reason.dimmed());
    }
}

fn write_final_status(result: &LintResult) {
    let total = result.violations.len();
    print!("  {}", format!("Total errors: {}", total).dimmed());
    print!("  ");

    if result.has_errors() {
        print!("{}", "FAILED".red());
    } else {
        print!("{}", "PASSED".green());
    }
    println!();
}

fn plural(n: usize) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> LintResult {
        LintResult {
            violations: vec![
                Violation {
                    rule: ViolationRule::MissingTag,
                    message: "missing tag @returns".to_string(),
                    file: "src/math.ts".to_string(),
                    line: 7,
                    declaration: "export function add(a: number, b: number): number {".to_string(),
                    severity: Severity::Error,
                },
                Violation {
                    rule: ViolationRule::NonEnglish,
                    message: "documentation appears to be non-English (matched: el, la); documentation must be written in English".to_string(),
                    file: "src/math.ts".to_string(),
                    line: 7,
                    declaration: "export function add(a: number, b: number): number {".to_string(),
                    severity: Severity::Error,
                },
            ],
            skipped: vec![SkippedFile {
                file: "src/gone.ts".to_string(),
                reason: "file not found (deleted or renamed)".to_string(),
            }],
            scanned: 1,
            declarations: 2,
        }
    }

    fn ctx() -> ReportContext {
        ReportContext {
            target: "origin/main..HEAD".to_string(),
            config: None,
        }
    }

    #[test]
    fn test_json_report_fields() {
        let report = json_report(&ctx(), &sample());
        assert!(!report.passed);
        assert_eq!(report.config, "built-in defaults");
        assert_eq!(report.declarations_checked, 2);

        let value = serde_json::to_value(&report).unwrap();
        let v = &value["violations"][0];
        assert_eq!(v["rule"], "missing_tag");
        assert_eq!(v["severity"], "error");
        assert_eq!(v["line"], 7);
        assert_eq!(value["skipped"][0]["file"], "src/gone.ts");
    }

    #[test]
    fn test_json_report_passes_without_violations() {
        let report = json_report(&ctx(), &LintResult::new());
        assert!(report.passed);
        let value = serde_json::to_value(&report).unwrap();
        assert!(value.get("skipped").is_none());
    }

    #[test]
    fn test_sarif_report() {
        let report = sarif_report(&sample());
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["version"], "2.1.0");
        assert!(value["$schema"].as_str().unwrap().contains("sarif-schema-2.1.0"));

        let run = &value["runs"][0];
        assert_eq!(run["tool"]["driver"]["name"], "docguard");
        let rules = run["tool"]["driver"]["rules"].as_array().unwrap();
        let ids: Vec<&str> = rules.iter().map(|r| r["id"].as_str().unwrap()).collect();
        assert_eq!(ids, vec!["missing_tag", "non_english"]);

        let result = &run["results"][0];
        assert_eq!(result["ruleId"], "missing_tag");
        assert_eq!(result["level"], "error");
        let location = &result["locations"][0]["physicalLocation"];
        assert_eq!(location["artifactLocation"]["uri"], "src/math.ts");
        assert_eq!(location["region"]["startLine"], 7);
    }
}
