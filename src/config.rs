//! Configuration schema for docguard.
//!
//! The configuration holds the tag policy for each declaration kind, the
//! language heuristic and the diff settings. Every section is optional: a
//! missing file or a partial file falls back to the built-in defaults.

use globset::{Glob, GlobSet, GlobSetBuilder};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::scan::DeclarationKind;

/// Config file names searched for in the repository root.
pub const DEFAULT_CONFIG_NAMES: &[&str] = &["docguard.yaml", ".docguard.yaml", ".docguard.yml"];

lazy_static! {
    static ref TAG_PATTERN: Regex = Regex::new(r"^@[A-Za-z][A-Za-z0-9_-]*$").unwrap();
}

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub version: String,
    /// File extensions (without dot) that are linted.
    pub extensions: Vec<String>,
    /// Glob patterns for paths that are never linted.
    pub excluded_paths: Vec<String>,
    pub rules: Rules,
    pub checks: ChecksConfig,
    pub language: LanguageConfig,
    pub diff: DiffConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "1".to_string(),
            extensions: ["ts", "tsx", "js", "jsx"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            excluded_paths: vec!["**/node_modules/**".to_string(), "**/*.d.ts".to_string()],
            rules: Rules::default(),
            checks: ChecksConfig::default(),
            language: LanguageConfig::default(),
            diff: DiffConfig::default(),
        }
    }
}

impl Config {
    /// Parse a configuration from a YAML file.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::parse_str(&content)
    }

    /// Parse a configuration from YAML text. Empty text yields the defaults.
    pub fn parse_str(content: &str) -> anyhow::Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Config = serde_yaml::from_str(content)?;
        Ok(config)
    }

    /// Load the configuration for a repository.
    ///
    /// An explicit path must exist. Without one, the repository root is
    /// searched for a default config name; if none is found the defaults
    /// are used. Returns the config and the file it came from, if any.
    pub fn load(root: &Path, explicit: Option<&Path>) -> anyhow::Result<(Self, Option<PathBuf>)> {
        let path = match explicit {
            Some(p) => Some(p.to_path_buf()),
            None => discover(root),
        };

        match path {
            Some(p) => {
                let config = Self::parse_file(&p)
                    .map_err(|e| anyhow::anyhow!("parsing config {}: {}", p.display(), e))?;
                Ok((config, Some(p)))
            }
            None => Ok((Self::default(), None)),
        }
    }

    /// Build a matcher for `excluded_paths`.
    pub fn excluded_matcher(&self) -> anyhow::Result<GlobSet> {
        let mut builder = GlobSetBuilder::new();
        for pattern in &self.excluded_paths {
            let glob = Glob::new(pattern)
                .map_err(|e| anyhow::anyhow!("invalid excluded_paths pattern {:?}: {}", pattern, e))?;
            builder.add(glob);
        }
        Ok(builder.build()?)
    }

    /// Whether the file extension is one that gets linted.
    pub fn is_supported_file(&self, path: &Path) -> bool {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        self.extensions
            .iter()
            .any(|e| e.trim_start_matches('.').eq_ignore_ascii_case(ext))
    }
}

/// Look for a config file in `root`.
pub fn discover(root: &Path) -> Option<PathBuf> {
    DEFAULT_CONFIG_NAMES
        .iter()
        .map(|name| root.join(name))
        .find(|p| p.is_file())
}

/// Tag policy for one declaration kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Rule {
    pub required_tags: Vec<String>,
    /// Informational only; never enforced.
    pub optional_tags: Vec<String>,
}

impl Rule {
    fn new(required: &[&str], optional: &[&str]) -> Self {
        Self {
            required_tags: required.iter().map(|s| s.to_string()).collect(),
            optional_tags: optional.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Whether `tag` is one of the required tags.
    pub fn requires(&self, tag: &str) -> bool {
        self.required_tags.iter().any(|t| t == tag)
    }
}

/// Tag policy for every declaration kind.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Rules {
    pub class: Rule,
    pub function: Rule,
    pub property: Rule,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            class: Rule::new(&["@description"], &["@example", "@remarks", "@deprecated"]),
            function: Rule::new(
                &["@param", "@returns"],
                &["@example", "@throws", "@remarks", "@deprecated"],
            ),
            property: Rule::new(&["@description"], &["@defaultValue", "@remarks", "@deprecated"]),
        }
    }
}

impl Rules {
    /// Get the rule for a declaration kind.
    pub fn for_kind(&self, kind: DeclarationKind) -> &Rule {
        match kind {
            DeclarationKind::Class => &self.class,
            DeclarationKind::Function => &self.function,
            DeclarationKind::Property => &self.property,
        }
    }
}

/// Signature-driven content checks.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ChecksConfig {
    /// Require an `@param` line naming every declared parameter.
    pub param_coverage: bool,
    /// Require `@returns` when a function declares a non-void return type.
    pub return_tag: bool,
}

impl Default for ChecksConfig {
    fn default() -> Self {
        Self {
            param_coverage: true,
            return_tag: true,
        }
    }
}

/// Stop-word heuristic flagging non-English documentation.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LanguageConfig {
    pub enforce_english: bool,
    /// Number of distinct stop words that marks a block as non-English.
    pub threshold: usize,
    pub stop_words: Vec<String>,
}

impl Default for LanguageConfig {
    fn default() -> Self {
        Self {
            enforce_english: true,
            threshold: 2,
            stop_words: DEFAULT_STOP_WORDS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Spanish stop words. Single letters and words that are also common in
/// English prose ("a", "son", "sin", ...) are left out.
pub const DEFAULT_STOP_WORDS: &[&str] = &[
    // articles
    "el", "la", "los", "las", "una", "unos", "unas", "del", "al",
    // prepositions
    "para", "por", "con", "desde", "entre", "hacia", "hasta", "según", "sobre",
    // conjunctions
    "que", "porque", "como", "cuando", "pero", "aunque", "mientras", "también", "donde",
    // verbs
    "es", "está", "están", "tiene", "tienen", "hace", "hacen", "puede", "pueden", "debe",
    "deben", "contiene", "establece", "devuelve", "retorna", "obtiene", "calcula", "muestra",
    "ejecuta", "procesa", "valida", "comprueba", "asigna", "guarda", "utiliza", "permite",
    "recibe",
    // technical terms
    "función", "archivo", "línea", "código", "método", "clase", "interfaz", "objeto",
    "valor", "parámetro", "constante", "arreglo", "matriz", "cadena", "número", "booleano",
    "estructura", "módulo", "componente", "evento", "propiedad", "usuario", "mensaje",
    "lista", "datos",
    // documentation words
    "este", "esta", "estos", "estas", "esto", "aquí", "ese", "esa", "eso", "ejemplo",
    "implementa", "inicializa", "configuración", "validación", "documentación",
];

/// Diff retrieval settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DiffConfig {
    /// Remote used for branch comparison.
    pub remote: String,
    /// Candidate base branches, tried in order when the current branch has
    /// no remote counterpart.
    pub base_branches: Vec<String>,
    /// Context lines passed to `git diff -U<n>`.
    pub unified: u32,
    /// Extra lines marked as changed on each side of a hunk.
    pub context_lines: usize,
    pub include_staged: bool,
    pub include_unstaged: bool,
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            remote: "origin".to_string(),
            base_branches: vec!["main".to_string(), "master".to_string(), "develop".to_string()],
            unified: 0,
            context_lines: 0,
            include_staged: true,
            include_unstaged: true,
        }
    }
}

/// Validate a configuration for correctness.
pub fn validate(config: &Config) -> anyhow::Result<()> {
    if config.extensions.is_empty() {
        anyhow::bail!("extensions must not be empty");
    }

    if config.language.enforce_english && config.language.threshold == 0 {
        anyhow::bail!("language.threshold must be at least 1");
    }

    for (kind, rule) in [
        (DeclarationKind::Class, &config.rules.class),
        (DeclarationKind::Function, &config.rules.function),
        (DeclarationKind::Property, &config.rules.property),
    ] {
        for tag in rule.required_tags.iter().chain(rule.optional_tags.iter()) {
            if !TAG_PATTERN.is_match(tag) {
                anyhow::bail!("invalid tag {:?} in rules.{}", tag, kind);
            }
        }
    }

    if config.diff.remote.trim().is_empty() {
        anyhow::bail!("diff.remote must not be empty");
    }

    config.excluded_matcher()?;

    Ok(())
}
