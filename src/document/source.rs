//! Immutable, versioned line arenas for story documents.

use crate::{document::position::Range, error::StructuralError};

use std::sync::Arc;

#[derive(Clone, Debug, PartialEq)]
/// Story document split into lines.
///
/// Lines are stored in a shared, immutable arena and addressed by their row index.
/// Edits never splice text in place: every edit returns a new document with its version
/// bumped, while previously handed out views of the old lines remain valid.
pub struct SourceDocument {
    /// Identifier of the document, used in diagnostics and the compile manifest.
    pub id: String,
    /// Number of edits applied since the document was read.
    pub version: u32,
    lines: Arc<[String]>,
}

impl SourceDocument {
    /// Split text into a document.
    ///
    /// Both `\n` and `\r\n` line endings are accepted.
    pub fn from_text(id: &str, text: &str) -> Self {
        let lines = text.lines().map(|line| line.to_string()).collect::<Vec<_>>();

        SourceDocument {
            id: id.to_string(),
            version: 0,
            lines: lines.into(),
        }
    }

    /// Shared view of all lines.
    pub fn lines(&self) -> Arc<[String]> {
        self.lines.clone()
    }

    pub fn line(&self, row: usize) -> Option<&str> {
        self.lines.get(row).map(|line| line.as_str())
    }

    pub fn num_lines(&self) -> usize {
        self.lines.len()
    }

    /// Join the lines back into text.
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    /// Replace the text in a range.
    ///
    /// The replacement may span several lines.
    pub fn replace(&self, range: &Range, replacement: &str) -> Result<Self, StructuralError> {
        let (start, end) = (range.start, range.end);

        let last_row = self.lines.len();
        if start.row > last_row || end.row > last_row {
            return Err(StructuralError::InvalidRange { start, end });
        }

        let head = self
            .line(start.row)
            .map(|line| char_prefix(line, start.column))
            .unwrap_or_default();
        let tail = self
            .line(end.row)
            .map(|line| char_suffix(line, end.column))
            .unwrap_or_default();

        let spliced = format!("{}{}{}", head, replacement, tail);

        let mut lines = self.lines[..start.row].to_vec();
        lines.extend(spliced.split('\n').map(|line| line.to_string()));

        // A range which ends at the start of a line past the document keeps nothing after it
        if end.row + 1 <= self.lines.len() {
            lines.extend(self.lines[end.row + 1..].iter().cloned());
        }

        Ok(self.with_lines(lines))
    }

    /// Insert lines before the given row. Rows past the end append to the document.
    pub fn insert_lines(&self, row: usize, new_lines: &[String]) -> Self {
        let row = row.min(self.lines.len());

        let mut lines = self.lines[..row].to_vec();
        lines.extend(new_lines.iter().cloned());
        lines.extend(self.lines[row..].iter().cloned());

        self.with_lines(lines)
    }

    /// Remove all rows in the (inclusive) span.
    pub fn remove_rows(&self, rows: std::ops::RangeInclusive<usize>) -> Self {
        let lines = self
            .lines
            .iter()
            .enumerate()
            .filter(|(i, _)| !rows.contains(i))
            .map(|(_, line)| line.clone())
            .collect();

        self.with_lines(lines)
    }

    fn with_lines(&self, lines: Vec<String>) -> Self {
        SourceDocument {
            id: self.id.clone(),
            version: self.version + 1,
            lines: lines.into(),
        }
    }
}

/// Get the first `column` characters of a line.
pub(crate) fn char_prefix(line: &str, column: usize) -> String {
    line.chars().take(column).collect()
}

/// Get the characters of a line from `column` and on.
pub(crate) fn char_suffix(line: &str, column: usize) -> String {
    line.chars().skip(column).collect()
}
