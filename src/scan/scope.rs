//! Enclosing-scope detection.
//!
//! A line's scope is decided by the innermost unmatched `{` above it. When
//! the line holding that brace declares a class, interface, enum or
//! namespace, the scope is a class body; any other block is a plain block.

use super::braces::enclosing_open;
use super::classify::{classify_declaration, DeclarationShape, ShapeForm};
use super::DeclarationKind;

/// Scope a line lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    TopLevel,
    ClassBody,
    /// Function bodies, control-flow blocks and object literals.
    Block,
}

impl Scope {
    /// Whether a declaration-shaped line is a real declaration here.
    pub fn accepts(&self, shape: &DeclarationShape) -> bool {
        match shape.form {
            ShapeForm::Explicit => true,
            ShapeForm::Variable => *self == Scope::TopLevel,
            ShapeForm::Bare => *self == Scope::ClassBody,
        }
    }
}

/// Compute the scope of the line at `index`.
pub fn enclosing_scope(lines: &[&str], index: usize) -> Scope {
    let open = match enclosing_open(lines, index) {
        Some(i) => i,
        None => return Scope::TopLevel,
    };

    // Allman style: `{` alone on its line belongs to the header above it
    let mut header = open;
    if lines[open].trim().starts_with('{') {
        if let Some(prev) = (0..open).rev().find(|&i| !lines[i].trim().is_empty()) {
            header = prev;
        }
    }

    match classify_declaration(lines[header].trim()) {
        Some(shape) if shape.kind == DeclarationKind::Class => Scope::ClassBody,
        _ => Scope::Block,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = r#"const LIMIT = 10;
class Usuario {
  nombre: string;
  saludar(): string {
    const saludo = 'Hola';
    return saludo;
  }
}
interface Props
{
  id: number;
}
function main() {
  const cfg = {
    a: 1,
  };
}"#;

    #[test]
    fn test_enclosing_scope() {
        let lines: Vec<&str> = SOURCE.lines().collect();
        assert_eq!(enclosing_scope(&lines, 0), Scope::TopLevel);
        assert_eq!(enclosing_scope(&lines, 1), Scope::TopLevel);
        assert_eq!(enclosing_scope(&lines, 2), Scope::ClassBody);
        assert_eq!(enclosing_scope(&lines, 3), Scope::ClassBody);
        assert_eq!(enclosing_scope(&lines, 4), Scope::Block);
        assert_eq!(enclosing_scope(&lines, 10), Scope::ClassBody);
        assert_eq!(enclosing_scope(&lines, 13), Scope::Block);
        assert_eq!(enclosing_scope(&lines, 14), Scope::Block);
    }

    #[test]
    fn test_scope_accepts() {
        let bare = classify_declaration("nombre: string;").unwrap();
        let variable = classify_declaration("const saludo = 'Hola';").unwrap();
        let explicit = classify_declaration("private nombre: string;").unwrap();

        assert!(Scope::ClassBody.accepts(&bare));
        assert!(!Scope::Block.accepts(&bare));
        assert!(!Scope::TopLevel.accepts(&bare));

        assert!(Scope::TopLevel.accepts(&variable));
        assert!(!Scope::Block.accepts(&variable));

        assert!(Scope::TopLevel.accepts(&explicit));
        assert!(Scope::ClassBody.accepts(&explicit));
    }
}
