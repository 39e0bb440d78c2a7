//! Integration tests for the diff → locate → validate pipeline.

use std::collections::BTreeSet;
use std::path::PathBuf;

use docguard::config::Config;
use docguard::diff::parse_unified_diff;
use docguard::lint::{LintResult, Runner, ViolationRule};

fn testdata_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("testdata")
}

fn run_sample_diff(config: &Config) -> LintResult {
    let diff = std::fs::read_to_string(testdata_path().join("changes.diff"))
        .expect("should read sample diff");
    let changed = parse_unified_diff(&diff, 0);

    let mut runner = Runner::new(testdata_path().join("repo"), config).expect("should build runner");
    runner.run(&changed)
}

#[test]
fn test_sample_diff_violations() {
    let result = run_sample_diff(&Config::default());

    let found: Vec<(&str, usize, ViolationRule)> = result
        .violations
        .iter()
        .map(|v| (v.file.as_str(), v.line, v.rule))
        .collect();

    assert_eq!(
        found,
        vec![
            ("user.ts", 13, ViolationRule::MissingDocBlock),
            ("user.ts", 29, ViolationRule::MissingTag),
            ("user.ts", 39, ViolationRule::NonEnglish),
            ("user.ts", 46, ViolationRule::MissingDocBlock),
        ]
    );
    assert!(result.has_errors());
}

#[test]
fn test_sample_diff_counts() {
    let result = run_sample_diff(&Config::default());

    // user.ts and math.js; README.md is not a source file
    assert_eq!(result.scanned, 2);
    // user.ts: class, email, constructor, greet, save, rename; math.js: multiply
    assert_eq!(result.declarations, 7);
    // The edited constructor is documented and needs no @returns
    assert_eq!(result.failing_declarations(), 4);

    assert_eq!(result.skipped.len(), 1);
    assert_eq!(result.skipped[0].file, "removed.ts");
}

#[test]
fn test_violation_details() {
    let result = run_sample_diff(&Config::default());

    let email = &result.violations[0];
    assert_eq!(email.declaration, "private email: string;");
    assert_eq!(email.message, "missing documentation block above property declaration");

    assert!(result.violations.iter().all(|v| v.line != 20));

    let greet = &result.violations[1];
    assert_eq!(greet.message, "missing tag @returns");
    assert!(greet.declaration.starts_with("greet("));

    let save = &result.violations[2];
    assert!(save.message.contains("matched: el, la, guarda, usuario, datos"));
}

#[test]
fn test_relaxed_config() {
    let yaml = r#"
rules:
  function:
    required_tags: ["@param"]
language:
  enforce_english: false
"#;
    let config = Config::parse_str(yaml).unwrap();
    let result = run_sample_diff(&config);

    let rules: Vec<(usize, ViolationRule)> = result.violations.iter().map(|v| (v.line, v.rule)).collect();
    // greet() now only needs @param, but still returns a value without @returns
    assert_eq!(
        rules,
        vec![
            (13, ViolationRule::MissingDocBlock),
            (29, ViolationRule::MissingReturnTag),
            (46, ViolationRule::MissingDocBlock),
        ]
    );
}

#[test]
fn test_full_file_check() {
    let repo = testdata_path().join("repo");
    let mut runner = Runner::new(&repo, &Config::default()).unwrap();
    let result = runner.lint_paths(&[repo.join("math.js"), repo.join("user.ts")]);

    assert_eq!(result.scanned, 2);
    // math.js: add, multiply; user.ts: class, name, email, constructor, greet, save, rename
    assert_eq!(result.declarations, 9);
    assert!(result.violations.iter().all(|v| v.file == "user.ts"));
    assert_eq!(result.violations.len(), 4);
}

#[test]
fn test_doc_only_change_resolves_to_documented_declaration() {
    let source = std::fs::read_to_string(testdata_path().join("repo/user.ts")).unwrap();
    let changed: BTreeSet<usize> = [26, 27].into_iter().collect();

    let mut runner = Runner::new(testdata_path().join("repo"), &Config::default()).unwrap();
    let result = runner.lint_source("user.ts", &source, &changed);

    assert_eq!(result.declarations, 1);
    assert_eq!(result.violations.len(), 1);
    assert_eq!(result.violations[0].line, 29);
}
