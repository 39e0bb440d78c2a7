//! Changed line → owning declaration.

use super::braces::{inside_open_paren, match_close};
use super::classify::{classify_line, LineKind};
use super::scope::enclosing_scope;
use super::DeclarationMatch;

/// Return the declaration on line `index`, if the line is one in its scope.
///
/// Parameter lines of a multi-line signature look like properties and are
/// rejected.
pub fn declaration_at(lines: &[&str], index: usize) -> Option<DeclarationMatch> {
    let line = lines.get(index)?;
    match classify_line(line) {
        LineKind::Declaration(shape)
            if enclosing_scope(lines, index).accepts(&shape) && !inside_open_paren(lines, index) =>
        {
            Some(DeclarationMatch {
                index,
                kind: shape.kind,
            })
        }
        _ => None,
    }
}

/// Find the declaration owning the code line at `start`.
///
/// The start line itself is checked first. Above it, comment lines, blank
/// lines and decorators are skipped, and a line starting with `}` jumps over
/// the whole block it closes, header included. The first accepted
/// declaration wins.
pub fn find_declaration(lines: &[&str], start: usize) -> Option<DeclarationMatch> {
    if start >= lines.len() {
        return None;
    }
    if let Some(found) = declaration_at(lines, start) {
        return Some(found);
    }

    let mut i = start;
    while i > 0 {
        i -= 1;
        match classify_line(lines[i]) {
            kind if kind.is_trivia() => continue,
            LineKind::CloseBrace => match match_close(lines, i) {
                Some(matched) => i = matched.open_line,
                None => {
                    tracing::debug!("unbalanced closing brace at line {}", i + 1);
                    return None;
                }
            },
            LineKind::Declaration(_) => {
                if let Some(found) = declaration_at(lines, i) {
                    return Some(found);
                }
            }
            _ => {}
        }
    }

    None
}

/// Find the declaration documented by the comment block containing `index`.
///
/// Scans down to the block's closing `*/`, skips blank and decorator lines,
/// and returns the declaration right below, if any.
pub fn find_documented_declaration(lines: &[&str], index: usize) -> Option<DeclarationMatch> {
    let close = (index..lines.len()).find(|&i| lines[i].trim_end().ends_with("*/"))?;

    let mut i = close + 1;
    while i < lines.len() {
        match classify_line(lines[i]) {
            LineKind::Blank | LineKind::Decorator | LineKind::LineComment => i += 1,
            _ => return declaration_at(lines, i),
        }
    }

    None
}

/// Whether line `index` lies inside a `/** ... */` block, delimiters included.
pub fn is_inside_doc_block(lines: &[&str], index: usize) -> bool {
    let Some(line) = lines.get(index) else {
        return false;
    };
    if !matches!(
        classify_line(line),
        LineKind::DocOpen | LineKind::CommentInterior | LineKind::CommentClose | LineKind::Blank
    ) {
        return false;
    }

    // Upward: reach the opener without crossing another block's end
    let mut opened = false;
    for i in (0..=index).rev() {
        let trimmed = lines[i].trim();
        if trimmed.starts_with("/**") {
            opened = true;
            break;
        }
        if trimmed.starts_with("/*") {
            return false;
        }
        if i < index && trimmed.ends_with("*/") {
            return false;
        }
        match classify_line(lines[i]) {
            LineKind::CommentInterior | LineKind::Blank => {}
            LineKind::CommentClose if i == index => {}
            _ => return false,
        }
    }
    if !opened {
        return false;
    }

    // Downward: the block must be closed
    for line in &lines[index..] {
        let trimmed = line.trim();
        if trimmed.ends_with("*/") {
            return true;
        }
        if !matches!(
            classify_line(line),
            LineKind::CommentInterior | LineKind::Blank | LineKind::DocOpen
        ) {
            return false;
        }
    }

    false
}

/// Resolve a changed line to its declaration: downward for changes inside a
/// documentation block, upward otherwise.
pub fn resolve(lines: &[&str], index: usize) -> Option<DeclarationMatch> {
    if is_inside_doc_block(lines, index) {
        find_documented_declaration(lines, index)
    } else {
        find_declaration(lines, index)
    }
}
