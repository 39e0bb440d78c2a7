//! Declaration locator.
//!
//! Maps a changed line to the declaration that owns it. The scanner works on
//! trimmed source lines: a line classifier recognises declarations, comment
//! lines and closing braces, a brace stack skips sibling blocks, and a scope
//! check rejects statements that only look like declarations.

mod braces;
mod classify;
mod locate;
mod scope;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use braces::{code_braces, enclosing_open, inside_open_paren, match_close, BraceMatch, BraceStack};
pub use classify::{classify_declaration, classify_line, DeclarationShape, LineKind, ShapeForm};
pub use locate::{
    declaration_at, find_declaration, find_documented_declaration, is_inside_doc_block, resolve,
};
pub use scope::{enclosing_scope, Scope};

/// Kind of declaration that carries a documentation block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeclarationKind {
    /// Classes, interfaces, enums and namespaces.
    Class,
    /// Functions, methods, constructors and function-valued variables.
    Function,
    /// Fields, properties and plain variables.
    Property,
}

impl DeclarationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeclarationKind::Class => "class",
            DeclarationKind::Function => "function",
            DeclarationKind::Property => "property",
        }
    }
}

impl fmt::Display for DeclarationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A declaration found by the locator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeclarationMatch {
    /// Line index (0-based).
    pub index: usize,
    pub kind: DeclarationKind,
}

impl DeclarationMatch {
    /// 1-based line number of the declaration.
    pub fn line_number(&self) -> usize {
        self.index + 1
    }
}
