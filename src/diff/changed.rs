//! Changed line map.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Repository-relative file path → 1-based changed line numbers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChangedLines {
    files: BTreeMap<String, BTreeSet<usize>>,
}

impl ChangedLines {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark every line in `start..end` (1-based, end exclusive) as changed.
    /// Empty ranges leave the map untouched.
    pub fn mark_range(&mut self, file: &str, start: usize, end: usize) {
        let start = start.max(1);
        if start >= end {
            return;
        }
        self.files
            .entry(file.to_string())
            .or_default()
            .extend(start..end);
    }

    /// Mark a single line as changed.
    pub fn insert(&mut self, file: &str, line: usize) {
        self.mark_range(file, line, line + 1);
    }

    /// Merge another map into this one.
    pub fn union(&mut self, other: ChangedLines) {
        for (file, lines) in other.files {
            self.files.entry(file).or_default().extend(lines);
        }
    }

    /// Changed lines of `file`, if any.
    pub fn lines_for(&self, file: &str) -> Option<&BTreeSet<usize>> {
        self.files.get(file)
    }

    pub fn files(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeSet<usize>)> {
        self.files.iter().map(|(f, l)| (f.as_str(), l))
    }

    /// Number of files with changes.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Number of changed lines across all files.
    pub fn total_lines(&self) -> usize {
        self.files.values().map(BTreeSet::len).sum()
    }
}
