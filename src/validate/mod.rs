//! Documentation validator.
//!
//! Given a declaration, finds the `/** ... */` block directly above it and
//! checks it against the tag policy for the declaration's kind, the
//! signature-driven parameter and return checks, and the language heuristic.

mod block;
mod language;
mod signature;

pub use block::{find_doc_block, BlockLookup, DocBlock};
pub use language::{normalize, LanguageDetector};
pub use signature::{parse_header, parse_signature, split_params, Signature};

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;

use crate::config::{ChecksConfig, Config, Rules};
use crate::lint::ViolationRule;
use crate::scan::{DeclarationKind, DeclarationMatch};

lazy_static! {
    static ref PARAM_TAG: Regex =
        Regex::new(r"@param\s+(?:\{[^}]*\}\s*)?\[?([A-Za-z_$][\w$]*)").unwrap();
}

/// A problem with one declaration's documentation. The runner adds the file
/// and line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub rule: ViolationRule,
    pub message: String,
}

impl Finding {
    fn new(rule: ViolationRule, message: impl Into<String>) -> Self {
        Self {
            rule,
            message: message.into(),
        }
    }
}

/// Checks documentation blocks against a configuration.
#[derive(Debug, Clone)]
pub struct Validator {
    rules: Rules,
    checks: ChecksConfig,
    language: Option<LanguageDetector>,
}

impl Validator {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let language = if config.language.enforce_english {
            Some(LanguageDetector::new(&config.language)?)
        } else {
            None
        };

        Ok(Self {
            rules: config.rules.clone(),
            checks: config.checks.clone(),
            language,
        })
    }

    /// Validate the documentation of the declaration at `decl`.
    pub fn validate(&self, lines: &[&str], decl: &DeclarationMatch) -> Vec<Finding> {
        let block = match find_doc_block(lines, decl.index) {
            BlockLookup::Found(block) => block,
            BlockLookup::Missing => {
                return vec![Finding::new(
                    ViolationRule::MissingDocBlock,
                    format!("missing documentation block above {} declaration", decl.kind),
                )];
            }
            BlockLookup::Unopened => {
                return vec![Finding::new(
                    ViolationRule::MalformedDocBlock,
                    format!(
                        "comment block closed without a matching `/**` opener above {} declaration",
                        decl.kind
                    ),
                )];
            }
        };

        let mut findings = Vec::new();
        let rule = self.rules.for_kind(decl.kind);
        let signature =
            (decl.kind == DeclarationKind::Function).then(|| parse_signature(lines, decl.index));
        let is_constructor = signature.as_ref().is_some_and(Signature::is_constructor);

        for tag in &rule.required_tags {
            // Constructors return nothing to document
            if is_constructor && is_return_tag(tag) {
                continue;
            }
            if !block.contains(tag) {
                findings.push(Finding::new(
                    ViolationRule::MissingTag,
                    format!("missing tag {}", tag),
                ));
            }
        }

        if let Some(signature) = &signature {
            self.check_signature(&block, signature, &mut findings);
        }

        if let Some(detector) = &self.language {
            if let Some(words) = detector.detect(&block.text) {
                findings.push(Finding::new(
                    ViolationRule::NonEnglish,
                    format!(
                        "documentation appears to be non-English (matched: {}); documentation must be written in English",
                        words.join(", ")
                    ),
                ));
            }
        }

        findings
    }

    fn check_signature(&self, block: &DocBlock, signature: &Signature, findings: &mut Vec<Finding>) {
        let rule = &self.rules.function;

        let param_reported = rule.requires("@param") && !block.contains("@param");
        if self.checks.param_coverage && !param_reported && !signature.params.is_empty() {
            let documented = documented_params(&block.text);
            for name in &signature.params {
                if !documented.contains(name.as_str()) {
                    findings.push(Finding::new(
                        ViolationRule::UndocumentedParam,
                        format!("parameter `{}` is not documented with @param", name),
                    ));
                }
            }
        }

        let returns_reported = rule.requires("@returns") && !block.contains("@returns");
        if self.checks.return_tag
            && !returns_reported
            && !signature.is_constructor()
            && signature.returns_value()
            && !block.contains("@return")
        {
            let ty = signature.return_type.as_deref().unwrap_or_default();
            findings.push(Finding::new(
                ViolationRule::MissingReturnTag,
                format!("function returns `{}` but has no @returns tag", ty),
            ));
        }
    }
}

fn is_return_tag(tag: &str) -> bool {
    tag == "@returns" || tag == "@return"
}

/// Parameter names mentioned by `@param` tags.
fn documented_params(text: &str) -> HashSet<&str> {
    PARAM_TAG
        .captures_iter(text)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str())
        .collect()
}
