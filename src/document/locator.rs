//! Generic scanner for blocks of content in a document.
//!
//! A block starts at a line whose first token matches a [`StartPattern`] and extends
//! according to an [`EndRule`]. Scenes, their properties and the brace-enclosed bodies of
//! `hear` and `if` directives are all found with the same machinery.
//!
//! Before scanning, the lines in scope are masked: comments are blanked out and braces
//! inside quoted strings are neutralised, so that neither can open or close a block. Every
//! locator owns its masked copy and its cursor, which means that any number of locators
//! can scan the same lines independently.

use crate::{
    consts::{BLOCK_COMMENT_BEGIN, BLOCK_COMMENT_END, CLOSE_BRACE, LINE_COMMENT_MARKER, OPEN_BRACE},
    document::position::{Position, Range},
    error::StructuralError,
};

use std::sync::Arc;

#[derive(Clone, Debug, PartialEq)]
/// Rule for which lines start a block.
pub enum StartPattern {
    /// First token of the line begins with the marker, directly followed by a name
    /// (`@start`, `*say`).
    Marker(String),
    /// First token of the line is the keyword, followed by whitespace, `{` or the end
    /// of the line (`hear yes {`, `if visited {`).
    Keyword(String),
}

#[derive(Clone, Copy, Debug, PartialEq)]
/// Rule for where a block ends.
pub enum EndRule {
    /// The block is the remainder of the start line.
    OneLine,
    /// The block extends from its header to the brace which matches the first `{` after
    /// the header. Nested blocks are consumed whole.
    BraceMatch,
    /// The block extends to the line before the next line which matches the start
    /// pattern, or to the end of the scope.
    UntilNext,
}

#[derive(Clone, Debug, PartialEq)]
/// Located region in a document.
pub struct Block {
    /// Name read from the header, after the marker or keyword.
    pub block_name: String,
    /// Full extent of the block, from the marker or keyword to the end of the block.
    pub range: Range,
    /// Content of the block: between the braces for brace-matched blocks, the lines after
    /// the header for blocks which extend to the next header and the remainder of the line
    /// for single line blocks.
    pub body: Range,
    /// The complete document the block was found in, for scanning it again.
    pub lines: Arc<[String]>,
}

impl Block {
    /// Get the text of every line in the body along with where it starts.
    pub fn body_lines(&self) -> Vec<(Position, String)> {
        if self.body.is_empty() {
            return Vec::new();
        }

        self.body
            .row_span()
            .filter_map(|row| {
                let line = self.lines.get(row)?;

                let start = if row == self.body.start.row {
                    self.body.start.column
                } else {
                    0
                };

                let end = if row == self.body.end.row {
                    self.body.end.column
                } else {
                    usize::MAX
                };

                let text = line
                    .chars()
                    .skip(start)
                    .take(end.saturating_sub(start))
                    .collect::<String>();

                Some((Position::new(row, start), text))
            })
            .collect()
    }

    /// Row of the block header.
    pub fn header_row(&self) -> usize {
        self.range.start.row
    }
}

/// Line with comments and string contents masked out.
#[derive(Clone, Debug)]
pub(crate) struct MaskedLine {
    /// Characters of the line with comments replaced by whitespace.
    pub text: Vec<char>,
    /// Characters of the line with comments replaced by whitespace and characters inside
    /// quoted strings replaced by placeholders.
    pub code: Vec<char>,
}

const STRING_PLACEHOLDER: char = '_';

impl MaskedLine {
    /// Column of the first character which is code at or after `from`.
    pub fn first_code_column(&self, from: usize) -> Option<usize> {
        (from..self.code.len()).find(|&i| !self.code[i].is_whitespace())
    }

    pub fn is_blank(&self) -> bool {
        self.first_code_column(0).is_none()
    }

    /// Comment-free text between two columns, trimmed.
    pub fn text_between(&self, start: usize, end: usize) -> String {
        let end = end.min(self.text.len());
        let start = start.min(end);

        self.text[start..end]
            .iter()
            .collect::<String>()
            .trim()
            .to_string()
    }

    /// Comment-free text from a column to the end of the line, trimmed.
    pub fn text_from(&self, start: usize) -> String {
        self.text_between(start, self.text.len())
    }

    pub fn len(&self) -> usize {
        self.code.len()
    }

    fn code_starts_with(&self, column: usize, pattern: &str) -> bool {
        let mut i = column;

        for c in pattern.chars() {
            if self.code.get(i) != Some(&c) {
                return false;
            }
            i += 1;
        }

        true
    }
}

/// Lines of a scope, masked.
#[derive(Clone, Debug)]
pub(crate) struct MaskedLines {
    first_row: usize,
    lines: Vec<MaskedLine>,
    /// Position of a `/*` comment which is still open at the end of the scope.
    pub open_comment: Option<Position>,
}

impl MaskedLines {
    pub fn get(&self, row: usize) -> Option<&MaskedLine> {
        row.checked_sub(self.first_row)
            .and_then(|index| self.lines.get(index))
    }

    /// Row after the last row in scope.
    pub fn end_row(&self) -> usize {
        self.first_row + self.lines.len()
    }
}

/// Mask all lines in a scope.
///
/// Characters outside of the scope columns on its first and last row are blanked out.
pub(crate) fn mask_lines(lines: &[String], scope: &Range) -> MaskedLines {
    let mut in_comment: Option<Position> = None;
    let mut masked = Vec::new();

    let first_row = scope.start.row;

    if !lines.is_empty() && first_row < lines.len() {
        let last_row = (*scope.row_span().end()).min(lines.len() - 1);

        for row in first_row..=last_row {
            let mut line = mask_line(&lines[row], row, &mut in_comment);

            if row == scope.start.row {
                blank_columns(&mut line, 0, scope.start.column);
            }

            if row == scope.end.row {
                blank_columns(&mut line, scope.end.column, usize::MAX);
            }

            masked.push(line);
        }
    }

    MaskedLines {
        first_row,
        lines: masked,
        open_comment: in_comment,
    }
}

fn blank_columns(line: &mut MaskedLine, start: usize, end: usize) {
    let end = end.min(line.code.len());

    for i in start.min(end)..end {
        line.text[i] = ' ';
        line.code[i] = ' ';
    }
}

/// Mask a single line, continuing or opening block comments.
fn mask_line(line: &str, row: usize, in_comment: &mut Option<Position>) -> MaskedLine {
    let chars = line.chars().collect::<Vec<_>>();
    let mut text = chars.clone();
    let mut code = chars.clone();

    let line_comment = LINE_COMMENT_MARKER.chars().collect::<Vec<_>>();
    let comment_begin = BLOCK_COMMENT_BEGIN.chars().collect::<Vec<_>>();
    let comment_end = BLOCK_COMMENT_END.chars().collect::<Vec<_>>();

    let mut i = 0;

    while i < chars.len() {
        if in_comment.is_some() {
            if chars[i..].starts_with(&comment_end) {
                for j in i..i + comment_end.len() {
                    text[j] = ' ';
                    code[j] = ' ';
                }

                i += comment_end.len();
                *in_comment = None;
            } else {
                text[i] = ' ';
                code[i] = ' ';
                i += 1;
            }

            continue;
        }

        let at_word_boundary = i == 0 || chars[i - 1].is_whitespace();

        if at_word_boundary && chars[i..].starts_with(&line_comment) {
            for j in i..chars.len() {
                text[j] = ' ';
                code[j] = ' ';
            }

            break;
        }

        if at_word_boundary && chars[i..].starts_with(&comment_begin) {
            *in_comment = Some(Position::new(row, i));
            continue;
        }

        if (chars[i] == '\'' || chars[i] == '"') && is_string_start(&chars, i) {
            let quote = chars[i];

            if let Some(offset) = chars[i + 1..].iter().position(|&c| c == quote) {
                let closing = i + 1 + offset;

                for j in i + 1..closing {
                    code[j] = STRING_PLACEHOLDER;
                }

                i = closing + 1;
                continue;
            }
        }

        i += 1;
    }

    MaskedLine { text, code }
}

/// If a `{name}` placeholder starts at the column, get the column of its closing brace.
///
/// Placeholders mark slots in utterances (`hear take {item} {`) and never open a block.
fn placeholder_end(code: &[char], open: usize) -> Option<usize> {
    let length = code[open + 1..].iter().position(|&c| c == CLOSE_BRACE)?;
    let name = &code[open + 1..open + 1 + length];

    if !name.is_empty() && name.iter().all(|c| c.is_alphanumeric() || *c == '_') {
        Some(open + 1 + length)
    } else {
        None
    }
}

/// Quotes only open strings at the start of a word, so that apostrophes in
/// contractions (`don't`) are left alone.
fn is_string_start(chars: &[char], i: usize) -> bool {
    i == 0
        || chars[i - 1].is_whitespace()
        || ['(', '=', ',', '{', '['].contains(&chars[i - 1])
}

#[derive(Clone, Debug)]
/// Lazy, restartable scanner for blocks in a document.
///
/// Each call to `next` continues from the cursor: the end of the previous block. The
/// first textual match wins, scanning from top to bottom and left to right. Only the
/// first token on a line (or the first token after a block which ended mid-line) is
/// compared with the start pattern.
///
/// # Examples
/// ```
/// # use sceneflow::{BlockLocator, EndRule, SourceDocument, StartPattern};
/// let document = SourceDocument::from_text("main", "\
/// hear yes {
///     if ready {
///         -> hall
///     }
/// }
/// hear no {
///     >> END
/// }
/// ");
///
/// let locator = BlockLocator::new(
///     document.lines(),
///     StartPattern::Keyword("hear".to_string()),
///     EndRule::BraceMatch,
/// );
///
/// let names = locator
///     .map(|block| block.unwrap().block_name)
///     .collect::<Vec<_>>();
///
/// assert_eq!(names, vec!["yes", "no"]);
/// ```
pub struct BlockLocator {
    lines: Arc<[String]>,
    masked: MaskedLines,
    scope: Range,
    pattern: StartPattern,
    end_rule: EndRule,
    cursor: Position,
}

impl BlockLocator {
    /// Create a locator which scans all lines of a document.
    pub fn new(lines: Arc<[String]>, pattern: StartPattern, end_rule: EndRule) -> Self {
        let scope = Range {
            start: Position::default(),
            end: Position::line_start(lines.len()),
        };

        BlockLocator::with_scope(lines, pattern, end_rule, scope)
    }

    /// Create a locator which only scans the given range of a document.
    pub fn with_scope(
        lines: Arc<[String]>,
        pattern: StartPattern,
        end_rule: EndRule,
        scope: Range,
    ) -> Self {
        let masked = mask_lines(&lines, &scope);

        BlockLocator {
            lines,
            masked,
            cursor: scope.start,
            scope,
            pattern,
            end_rule,
        }
    }

    /// Move the cursor to a position. Positions before the scope are clamped to its start.
    pub fn starting_at(mut self, position: Position) -> Self {
        self.cursor = position.max(self.scope.start);
        self
    }

    /// Current position of the cursor.
    pub fn cursor(&self) -> Position {
        self.cursor
    }

    /// Position of a `/*` comment which is never closed in the scope, if any.
    pub fn open_comment(&self) -> Option<Position> {
        self.masked.open_comment
    }

    /// If the pattern matches the first token at or after the column, return the column
    /// of that token and the column after the marker or keyword.
    fn match_at(&self, row: usize, from: usize) -> Option<(usize, usize)> {
        let line = self.masked.get(row)?;
        let column = line.first_code_column(from)?;

        match &self.pattern {
            StartPattern::Marker(marker) => {
                let end = column + marker.chars().count();

                let is_named = line
                    .code
                    .get(end)
                    .map(|c| c.is_alphanumeric() || *c == '_')
                    .unwrap_or(false);

                if line.code_starts_with(column, marker) && is_named {
                    Some((column, end))
                } else {
                    None
                }
            }
            StartPattern::Keyword(keyword) => {
                let end = column + keyword.chars().count();

                let is_separated = line
                    .code
                    .get(end)
                    .map(|c| c.is_whitespace() || *c == OPEN_BRACE)
                    .unwrap_or(true);

                if line.code_starts_with(column, keyword) && is_separated {
                    Some((column, end))
                } else {
                    None
                }
            }
        }
    }

    fn last_row(&self) -> Option<usize> {
        self.masked.end_row().checked_sub(1)
    }

    fn read_one_line(
        &self,
        line: &MaskedLine,
        row: usize,
        column: usize,
        name_start: usize,
    ) -> Block {
        let length = line.len();

        Block {
            block_name: line.text_from(name_start),
            range: Range {
                start: Position::new(row, column),
                end: Position::new(row, length),
            },
            body: Range {
                start: Position::new(row, name_start),
                end: Position::new(row, length),
            },
            lines: self.lines.clone(),
        }
    }

    fn read_until_next(
        &self,
        line: &MaskedLine,
        row: usize,
        column: usize,
        name_start: usize,
    ) -> Block {
        let last_row = self.last_row().unwrap_or(row);

        let end_row = (row + 1..=last_row)
            .find(|&r| self.match_at(r, 0).is_some())
            .map(|next| next - 1)
            .unwrap_or(last_row);

        let end = Position::line_start(end_row + 1).min(self.scope.end);
        let body_start = Position::line_start(row + 1).min(end);

        Block {
            block_name: line.text_from(name_start),
            range: Range {
                start: Position::new(row, column),
                end,
            },
            body: Range {
                start: body_start,
                end,
            },
            lines: self.lines.clone(),
        }
    }

    fn read_brace_match(
        &self,
        header_line: &MaskedLine,
        row: usize,
        column: usize,
        name_start: usize,
    ) -> Result<Block, StructuralError> {
        let header = Position::new(row, column);
        let last_row = self.last_row().unwrap_or(row);

        let open = self
            .find_opening_brace(row, name_start, last_row)
            .ok_or(StructuralError::MissingOpeningBrace { position: header })?;

        let close = self
            .find_closing_brace(open, last_row)
            .ok_or(StructuralError::UnterminatedBlock { position: header })?;

        let name_end = if open.row == row {
            open.column
        } else {
            header_line.len()
        };

        Ok(Block {
            block_name: header_line.text_between(name_start, name_end),
            range: Range {
                start: header,
                end: Position::new(close.row, close.column + 1),
            },
            body: Range {
                start: Position::new(open.row, open.column + 1),
                end: close,
            },
            lines: self.lines.clone(),
        })
    }

    /// Find the brace which opens a block, on the header line or the first line with code
    /// after it. Blank lines are skipped.
    fn find_opening_brace(&self, row: usize, from: usize, last_row: usize) -> Option<Position> {
        let header_line = self.masked.get(row)?;

        let mut column = from;
        while column < header_line.len() {
            if header_line.code[column] == OPEN_BRACE {
                match placeholder_end(&header_line.code, column) {
                    Some(end) => column = end,
                    None => return Some(Position::new(row, column)),
                }
            }

            column += 1;
        }

        for r in row + 1..=last_row {
            let line = self.masked.get(r)?;

            match line.first_code_column(0) {
                Some(column) if line.code[column] == OPEN_BRACE => {
                    return Some(Position::new(r, column));
                }
                Some(_) => return None,
                None => continue,
            }
        }

        None
    }

    /// Find the brace which matches an opening brace.
    fn find_closing_brace(&self, open: Position, last_row: usize) -> Option<Position> {
        let mut depth = 0usize;

        for r in open.row..=last_row {
            let line = self.masked.get(r)?;
            let from = if r == open.row { open.column } else { 0 };

            for column in from..line.len() {
                match line.code[column] {
                    OPEN_BRACE => depth += 1,
                    CLOSE_BRACE => {
                        depth -= 1;

                        if depth == 0 {
                            return Some(Position::new(r, column));
                        }
                    }
                    _ => (),
                }
            }
        }

        None
    }
}

impl Iterator for BlockLocator {
    type Item = Result<Block, StructuralError>;

    fn next(&mut self) -> Option<Self::Item> {
        let last_row = self.last_row()?;

        while self.cursor.row <= last_row {
            let Position { row, column: from } = self.cursor;

            let matched = self
                .match_at(row, from)
                .and_then(|(column, name_start)| {
                    self.masked.get(row).map(|line| (line, column, name_start))
                });

            match matched {
                Some((line, column, name_start)) => {
                    let result = match self.end_rule {
                        EndRule::OneLine => Ok(self.read_one_line(line, row, column, name_start)),
                        EndRule::UntilNext => {
                            Ok(self.read_until_next(line, row, column, name_start))
                        }
                        EndRule::BraceMatch => {
                            self.read_brace_match(line, row, column, name_start)
                        }
                    };

                    self.cursor = match &result {
                        Ok(block) if self.end_rule == EndRule::BraceMatch => block.range.end,
                        Ok(block) => Position::line_start(*block.range.row_span().end() + 1),
                        // Nothing after an unterminated block can be scanned reliably
                        Err(StructuralError::UnterminatedBlock { .. }) => {
                            Position::line_start(last_row + 1)
                        }
                        Err(_) => Position::line_start(row + 1),
                    };

                    return Some(result);
                }
                None => {
                    self.cursor = Position::line_start(row + 1);
                }
            }
        }

        None
    }
}
