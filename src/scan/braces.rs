//! Brace matching for the backward scan.
//!
//! Walking upward, lines are read right-to-left: a `}` pushes onto the stack
//! and a `{` pops it. The opener of a block is the line where the stack
//! empties again. Braces inside string literals, `//` comments, inline
//! `/* */` comments and comment-only lines are not counted. Template
//! literals and regex literals spanning lines are not tracked.

/// Stack of unmatched closing braces, recorded by line index.
#[derive(Debug, Default)]
pub struct BraceStack {
    stack: Vec<usize>,
    opened: usize,
    closed: usize,
}

impl BraceStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a `}` found on `line`.
    pub fn push_close(&mut self, line: usize) {
        self.stack.push(line);
        self.closed += 1;
    }

    /// Record a `{`. Returns the line of the `}` it matches, or `None` when
    /// there is nothing to match (the brace opens an enclosing block).
    pub fn pop_open(&mut self) -> Option<usize> {
        let line = self.stack.pop()?;
        self.opened += 1;
        Some(line)
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// Number of `{` consumed so far.
    pub fn opened(&self) -> usize {
        self.opened
    }

    /// Number of `}` consumed so far.
    pub fn closed(&self) -> usize {
        self.closed
    }
}

/// A closing brace matched to its opener.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BraceMatch {
    /// Line index of the matching `{`.
    pub open_line: usize,
    /// Braces consumed by the walk. Always equal once matched.
    pub opened: usize,
    pub closed: usize,
}

/// Braces on a line that belong to code, in left-to-right order.
pub fn code_braces(line: &str) -> Vec<char> {
    code_chars(line, &['{', '}'])
}

/// Characters from `wanted` that belong to code, in left-to-right order.
fn code_chars(line: &str, wanted: &[char]) -> Vec<char> {
    let trimmed = line.trim_start();
    if trimmed.starts_with('*') || trimmed.starts_with("//") {
        return Vec::new();
    }

    let mut found = Vec::new();
    let mut string_char: Option<char> = None;
    let mut escaped = false;
    let mut in_block_comment = false;
    let chars: Vec<char> = line.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        let ch = chars[i];
        let next = chars.get(i + 1).copied();

        if in_block_comment {
            if ch == '*' && next == Some('/') {
                in_block_comment = false;
                i += 1;
            }
            i += 1;
            continue;
        }

        if let Some(quote) = string_char {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == quote {
                string_char = None;
            }
            i += 1;
            continue;
        }

        match ch {
            '"' | '\'' | '`' => string_char = Some(ch),
            '/' if next == Some('/') => break,
            '/' if next == Some('*') => {
                in_block_comment = true;
                i += 1;
            }
            c if wanted.contains(&c) => found.push(c),
            _ => {}
        }
        i += 1;
    }

    found
}

/// Find the opener of the block closed at the start of `close_line`.
///
/// Braces on `close_line` itself are read right-to-left, so `} else {`
/// counts as a single close. Returns `None` if the line closes nothing or
/// no opener exists above it.
pub fn match_close(lines: &[&str], close_line: usize) -> Option<BraceMatch> {
    let mut stack = BraceStack::new();

    for brace in code_braces(lines.get(close_line)?).into_iter().rev() {
        match brace {
            '}' => stack.push_close(close_line),
            _ => {
                // Opens a block after the close; nothing to match yet
                stack.pop_open();
            }
        }
    }

    if stack.is_empty() {
        return None;
    }

    for i in (0..close_line).rev() {
        for brace in code_braces(lines[i]).into_iter().rev() {
            if brace == '}' {
                stack.push_close(i);
            } else if stack.pop_open().is_some() && stack.is_empty() {
                return Some(BraceMatch {
                    open_line: i,
                    opened: stack.opened(),
                    closed: stack.closed(),
                });
            }
        }
    }

    None
}

/// Find the line holding the `{` of the innermost block enclosing `index`.
///
/// Only lines above `index` are read. Returns `None` at top level.
pub fn enclosing_open(lines: &[&str], index: usize) -> Option<usize> {
    let mut stack = BraceStack::new();
    let end = index.min(lines.len());

    for i in (0..end).rev() {
        for brace in code_braces(lines[i]).into_iter().rev() {
            if brace == '}' {
                stack.push_close(i);
            } else if stack.pop_open().is_none() {
                return Some(i);
            }
        }
    }

    None
}

/// Whether line `index` starts inside an unclosed `(` opened above it, as
/// the parameter lines of a multi-line signature do.
///
/// Walks upward until the opening paren or a statement or block boundary
/// at paren depth zero: an unmatched `{` or a `;` outside nested braces.
pub fn inside_open_paren(lines: &[&str], index: usize) -> bool {
    let mut parens = 0usize;
    let mut braces = 0usize;
    let end = index.min(lines.len());

    for i in (0..end).rev() {
        for ch in code_chars(lines[i], &['(', ')', '{', '}', ';']).into_iter().rev() {
            match ch {
                ')' => parens += 1,
                '(' if parens == 0 => return true,
                '(' => parens -= 1,
                '}' => braces += 1,
                '{' if braces == 0 => return false,
                '{' => braces -= 1,
                ';' if parens == 0 && braces == 0 => return false,
                _ => {}
            }
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_braces_skips_strings_and_comments() {
        assert_eq!(code_braces("foo() {"), vec!['{']);
        assert_eq!(code_braces("const s = \"{\"; {"), vec!['{']);
        assert_eq!(code_braces("const s = '}' + `{`;"), Vec::<char>::new());
        assert_eq!(code_braces("x(); // }"), Vec::<char>::new());
        assert_eq!(code_braces("a /* { */ }"), vec!['}']);
        assert_eq!(code_braces(" * @param {string} name"), Vec::<char>::new());
        assert_eq!(code_braces("const s = \"a\\\"{\"; }"), vec!['}']);
    }

    #[test]
    fn test_match_close_skips_nested_blocks() {
        let lines = vec![
            "class A {",             // 0
            "  method() {",          // 1
            "    if (x) {",          // 2
            "      y();",            // 3
            "    } else {",          // 4
            "      z();",            // 5
            "    }",                 // 6
            "  }",                   // 7
            "}",                     // 8
        ];
        let m = match_close(&lines, 7).unwrap();
        assert_eq!(m.open_line, 1);
        assert_eq!(m.opened, m.closed);

        // The else branch opens on the `} else {` line
        let m = match_close(&lines, 6).unwrap();
        assert_eq!(m.open_line, 4);

        // `} else {` closes the if branch
        let m = match_close(&lines, 4).unwrap();
        assert_eq!(m.open_line, 2);
        assert_eq!(m.opened, 1);
        assert_eq!(m.closed, 1);

        let m = match_close(&lines, 8).unwrap();
        assert_eq!(m.open_line, 0);
    }

    #[test]
    fn test_match_close_ignores_braces_in_strings() {
        let lines = vec![
            "  render() {",                    // 0
            "    const open = \"{{\";",         // 1
            "    const close = '}';",          // 2
            "    return open + close;",        // 3
            "  }",                             // 4
        ];
        let m = match_close(&lines, 4).unwrap();
        assert_eq!(m.open_line, 0);
        assert_eq!(m.opened, 1);
        assert_eq!(m.closed, 1);
    }

    #[test]
    fn test_match_close_unbalanced() {
        let lines = vec!["  x();", "}"];
        assert!(match_close(&lines, 1).is_none());
        // A line without a code close brace matches nothing
        let lines = vec!["{", "'}'"];
        assert!(match_close(&lines, 1).is_none());
    }

    #[test]
    fn test_inside_open_paren() {
        let lines = vec![
            "class Client {",                           // 0
            "  constructor(",                           // 1
            "    private readonly api: string,",        // 2
            "    options: { retries: number; },",       // 3
            "    size: number,",                        // 4
            "  ) {",                                    // 5
            "    this.size = size;",                    // 6
            "  }",                                      // 7
            "  name: string;",                          // 8
            "}",                                        // 9
        ];
        assert!(inside_open_paren(&lines, 2));
        assert!(inside_open_paren(&lines, 3));
        assert!(inside_open_paren(&lines, 4));
        assert!(inside_open_paren(&lines, 5));
        assert!(!inside_open_paren(&lines, 1));
        assert!(!inside_open_paren(&lines, 6));
        assert!(!inside_open_paren(&lines, 8));
        assert!(!inside_open_paren(&lines, 0));
    }

    #[test]
    fn test_enclosing_open() {
        let lines = vec![
            "class A {",     // 0
            "  a() {",       // 1
            "    b();",      // 2
            "  }",           // 3
            "  c: number;",  // 4
            "}",             // 5
            "const d = 1;",  // 6
        ];
        assert_eq!(enclosing_open(&lines, 2), Some(1));
        assert_eq!(enclosing_open(&lines, 4), Some(0));
        assert_eq!(enclosing_open(&lines, 6), None);
        assert_eq!(enclosing_open(&lines, 0), None);
    }

    #[test]
    fn test_brace_stack_counts() {
        let mut stack = BraceStack::new();
        assert!(stack.pop_open().is_none());
        stack.push_close(3);
        stack.push_close(2);
        assert_eq!(stack.depth(), 2);
        assert_eq!(stack.pop_open(), Some(2));
        assert_eq!(stack.pop_open(), Some(3));
        assert!(stack.is_empty());
        assert_eq!(stack.opened(), stack.closed());
    }
}
