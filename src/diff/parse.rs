//! Unified diff parsing.

use lazy_static::lazy_static;
use regex::Regex;

use super::ChangedLines;

lazy_static! {
    static ref FILE_HEADER: Regex = Regex::new(r"^diff --git a/(.+?) b/(.+)$").unwrap();
    static ref HUNK_HEADER: Regex = Regex::new(r"^@@ -\d+(?:,\d+)? \+(\d+)(?:,(\d+))? @@").unwrap();
}

/// Parse unified diff text into changed lines of the new files.
///
/// Each hunk `@@ -a,b +c,d @@` marks `[c - margin, c + d + margin)`. A hunk
/// with no preceding file header is ignored. Pure deletions (`d == 0`) mark
/// nothing unless a margin is set.
pub fn parse_unified_diff(text: &str, margin: usize) -> ChangedLines {
    let mut changed = ChangedLines::new();
    let mut current: Option<String> = None;

    for line in text.lines() {
        if let Some(caps) = FILE_HEADER.captures(line) {
            current = Some(caps[2].to_string());
            continue;
        }

        let Some(caps) = HUNK_HEADER.captures(line) else {
            continue;
        };
        let Some(file) = current.as_deref() else {
            tracing::debug!("hunk before any file header: {}", line);
            continue;
        };

        let start: usize = match caps[1].parse() {
            Ok(n) => n,
            Err(_) => continue,
        };
        let count: usize = caps
            .get(2)
            .and_then(|m| m.as_str().parse().ok())
            .unwrap_or(1);

        changed.mark_range(file, start.saturating_sub(margin), start + count + margin);
    }

    changed
}
