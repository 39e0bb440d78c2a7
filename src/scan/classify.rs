//! Line classifier.
//!
//! Declarations are recognised by a single ordered rule table. The first
//! rule that matches a trimmed line decides its kind; lines that match no
//! rule are not declarations.

use lazy_static::lazy_static;
use regex::Regex;

use super::DeclarationKind;

/// How a declaration line announces itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeForm {
    /// Starts with a keyword or modifier (`class`, `function`, `export`,
    /// `private`, `static`, `async`, ...). Valid in any scope.
    Explicit,
    /// A `const`/`let`/`var` binding. Only a declaration at top level.
    Variable,
    /// A bare member (`name(...)`, `name: T`, `name = v`). Only a
    /// declaration inside a class or interface body.
    Bare,
}

/// A line that looks like a declaration, before scope is considered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeclarationShape {
    pub kind: DeclarationKind,
    pub form: ShapeForm,
}

/// Classification of a single source line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Blank,
    /// `/**` opener (possibly a single-line doc block).
    DocOpen,
    /// `/*` opener of a plain block comment.
    CommentOpen,
    /// A line closing a block comment.
    CommentClose,
    /// A `*`-prefixed line inside a block comment.
    CommentInterior,
    LineComment,
    /// `@Decorator(...)` line.
    Decorator,
    /// A line starting with `}`.
    CloseBrace,
    Declaration(DeclarationShape),
    Code,
}

impl LineKind {
    /// Lines the upward scan passes over without looking at them.
    pub fn is_trivia(&self) -> bool {
        matches!(
            self,
            LineKind::Blank
                | LineKind::DocOpen
                | LineKind::CommentOpen
                | LineKind::CommentClose
                | LineKind::CommentInterior
                | LineKind::LineComment
                | LineKind::Decorator
        )
    }
}

/// Words that start statements, never declarations.
const CONTROL_KEYWORDS: &[&str] = &[
    "if", "else", "for", "while", "do", "switch", "case", "default", "catch", "try", "finally",
    "return", "throw", "new", "await", "yield", "typeof", "delete", "void", "super", "this",
    "import", "break", "continue", "with",
];

const IDENT: &str = r"[A-Za-z_$#][\w$]*";
const MODIFIERS: &str = r"(?:(?:public|private|protected|static|readonly|abstract|override|declare|async|accessor)\s+)";

lazy_static! {
    static ref LEADING_IDENT: Regex = Regex::new(r"^[A-Za-z_$][\w$]*").unwrap();

    /// Ordered declaration rules: class-like, then functions, then properties.
    static ref DECLARATION_RULES: Vec<(Regex, DeclarationKind)> = vec![
        // class Foo / export default abstract class / interface / enum / namespace
        (
            Regex::new(r"^(?:export\s+(?:default\s+)?)?(?:declare\s+)?(?:abstract\s+)?(?:const\s+)?(?:class|interface|enum|namespace|module)(?:\s|\{|$)").unwrap(),
            DeclarationKind::Class,
        ),
        // function foo( / export async function* foo(
        (
            Regex::new(r"^(?:export\s+(?:default\s+)?)?(?:declare\s+)?(?:async\s+)?function\b").unwrap(),
            DeclarationKind::Function,
        ),
        // const foo = (a) => / let foo = async function / var foo = function(
        (
            Regex::new(&format!(
                r"^(?:export\s+)?(?:const|let|var)\s+{IDENT}\s*(?::[^=]+)?=\s*(?:async\b|function\b|\([^)]*$|.*=>)"
            ))
            .unwrap(),
            DeclarationKind::Function,
        ),
        // private handler = () => / onClick = async (e) =>
        (
            Regex::new(&format!(
                r"^{MODIFIERS}*{IDENT}[?!]?\s*(?::[^=]+)?=\s*(?:async\b|function\b|\([^)]*\)\s*(?::[^=]+)?=>|{IDENT}\s*=>)"
            ))
            .unwrap(),
            DeclarationKind::Function,
        ),
        // public async load(id: string): Promise<T> { / static create<T>(
        (
            Regex::new(&format!(
                r"^{MODIFIERS}+(?:get\s+|set\s+|\*\s*)?{IDENT}\s*(?:<[^>]*>)?\s*\("
            ))
            .unwrap(),
            DeclarationKind::Function,
        ),
        // load(id: string): T { / constructor(a: A) { / get name() {
        // fetch(id: string): Promise<T>; (interface members, overloads)
        (
            Regex::new(&format!(
                r"^(?:get\s+|set\s+|\*\s*)?{IDENT}\s*(?:<[^>]*>)?\s*\((?:[^;]*\)\s*(?::\s*[^=;{{]+)?\s*(?:\{{|;)?|[^);]*)\s*$"
            ))
            .unwrap(),
            DeclarationKind::Function,
        ),
        // private readonly name: string; / static count = 0;
        (
            Regex::new(&format!(r"^{MODIFIERS}+{IDENT}[?!]?\s*(?:[:=;]|$)")).unwrap(),
            DeclarationKind::Property,
        ),
        // const LIMIT = 10; / export let state: State;
        (
            Regex::new(r"^(?:export\s+)?(?:declare\s+)?(?:const|let|var)\s+").unwrap(),
            DeclarationKind::Property,
        ),
        // name: string; / count = 0; / optional?: T;
        (
            Regex::new(&format!(r"^{IDENT}[?!]?\s*(?::|=[^=>])")).unwrap(),
            DeclarationKind::Property,
        ),
    ];

    static ref VARIABLE_FORM: Regex =
        Regex::new(r"^(?:export\s+)?(?:declare\s+)?(?:const|let|var)\s+").unwrap();
    static ref EXPLICIT_FORM: Regex = Regex::new(
        r"^(?:export|default|declare|abstract|class|interface|enum|namespace|module|function|async|public|private|protected|static|readonly|override|accessor)\b"
    )
    .unwrap();
}

/// Classify a raw source line.
pub fn classify_line(line: &str) -> LineKind {
    let trimmed = line.trim();

    if trimmed.is_empty() {
        return LineKind::Blank;
    }
    if trimmed.starts_with("/**") {
        return LineKind::DocOpen;
    }
    if trimmed.starts_with("/*") {
        return LineKind::CommentOpen;
    }
    if trimmed.starts_with("*/") || trimmed.ends_with("*/") {
        return LineKind::CommentClose;
    }
    if trimmed.starts_with('*') {
        return LineKind::CommentInterior;
    }
    if trimmed.starts_with("//") {
        return LineKind::LineComment;
    }
    if trimmed.starts_with('@') {
        return LineKind::Decorator;
    }
    if trimmed.starts_with('}') {
        return LineKind::CloseBrace;
    }

    match classify_declaration(trimmed) {
        Some(shape) => LineKind::Declaration(shape),
        None => LineKind::Code,
    }
}

/// Match a trimmed line against the declaration rules.
pub fn classify_declaration(trimmed: &str) -> Option<DeclarationShape> {
    if let Some(ident) = LEADING_IDENT.find(trimmed) {
        if CONTROL_KEYWORDS.contains(&ident.as_str()) {
            return None;
        }
    }

    let kind = DECLARATION_RULES
        .iter()
        .find(|(pattern, _)| pattern.is_match(trimmed))
        .map(|(_, kind)| *kind)?;

    let form = if VARIABLE_FORM.is_match(trimmed) {
        ShapeForm::Variable
    } else if EXPLICIT_FORM.is_match(trimmed) {
        ShapeForm::Explicit
    } else {
        ShapeForm::Bare
    };

    Some(DeclarationShape { kind, form })
}
