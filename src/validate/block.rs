//! Documentation block lookup.

use crate::scan::{classify_line, LineKind};

/// A `/** ... */` block: lines `start..=end`, joined with newlines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocBlock {
    pub start: usize,
    pub end: usize,
    pub text: String,
}

impl DocBlock {
    /// Case-sensitive substring test, the way tags are checked.
    pub fn contains(&self, needle: &str) -> bool {
        self.text.contains(needle)
    }
}

/// Outcome of looking for the block above a declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockLookup {
    Found(DocBlock),
    /// The declaration is not directly preceded by a `/**` block.
    Missing,
    /// A `*/` was found but no `/**` opens it.
    Unopened,
}

/// Find the documentation block directly above `decl_index`.
///
/// Blank lines, decorators and `//` comments may sit between the block and
/// the declaration. A plain `/* */` comment is not documentation.
pub fn find_doc_block(lines: &[&str], decl_index: usize) -> BlockLookup {
    let mut i = decl_index.min(lines.len());
    let close = loop {
        if i == 0 {
            return BlockLookup::Missing;
        }
        i -= 1;
        match classify_line(lines[i]) {
            LineKind::Blank | LineKind::Decorator | LineKind::LineComment => continue,
            _ if lines[i].trim_end().ends_with("*/") => break i,
            _ => return BlockLookup::Missing,
        }
    };

    let mut j = close;
    loop {
        let trimmed = lines[j].trim();
        if trimmed.starts_with("/**") {
            return BlockLookup::Found(DocBlock {
                start: j,
                end: close,
                text: lines[j..=close].join("\n"),
            });
        }
        if trimmed.starts_with("/*") {
            return BlockLookup::Missing;
        }
        if j == 0 {
            return BlockLookup::Unopened;
        }
        j -= 1;
        if lines[j].trim_end().ends_with("*/") {
            return BlockLookup::Unopened;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finds_block_above_declaration() {
        let lines = vec!["/**", " * @description x", " */", "", "@Component()", "class Foo {"];
        match find_doc_block(&lines, 5) {
            BlockLookup::Found(block) => {
                assert_eq!(block.start, 0);
                assert_eq!(block.end, 2);
                assert!(block.contains("@description"));
            }
            other => panic!("expected block, got {:?}", other),
        }
    }

    #[test]
    fn test_line_comments_between_block_and_declaration() {
        let lines = vec!["/**", " * @description x", " */", "// eslint-disable-next-line", "class Foo {"];
        assert!(matches!(find_doc_block(&lines, 4), BlockLookup::Found(b) if b.end == 2));
    }

    #[test]
    fn test_single_line_block() {
        let lines = vec!["/** @description x */", "class Foo {"];
        assert!(matches!(find_doc_block(&lines, 1), BlockLookup::Found(b) if b.start == 0 && b.end == 0));
    }

    #[test]
    fn test_missing_block() {
        let lines = vec!["const a = 1;", "", "class Foo {"];
        assert_eq!(find_doc_block(&lines, 2), BlockLookup::Missing);
        assert_eq!(find_doc_block(&lines, 0), BlockLookup::Missing);
    }

    #[test]
    fn test_plain_comment_is_not_documentation() {
        let lines = vec!["/*", " * just a note", " */", "function f() {"];
        assert_eq!(find_doc_block(&lines, 3), BlockLookup::Missing);
    }

    #[test]
    fn test_unopened_block() {
        let lines = vec![" * stray", " */", "function f() {"];
        assert_eq!(find_doc_block(&lines, 2), BlockLookup::Unopened);

        let lines = vec!["/** other */", " * stray", " */", "function f() {"];
        assert_eq!(find_doc_block(&lines, 3), BlockLookup::Unopened);
    }
}
