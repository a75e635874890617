//! Points and spans over the lines of a document.

use crate::error::StructuralError;

#[cfg(feature = "serde_support")]
use serde::{Deserialize, Serialize};

use std::fmt;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde_support", derive(Deserialize, Serialize))]
/// Point in a document.
///
/// Both coordinates are zero-based. The column counts characters, not bytes, so that
/// positions can be handed to an editor as-is.
pub struct Position {
    /// Line index.
    pub row: usize,
    /// Character offset in the line.
    pub column: usize,
}

impl Position {
    pub fn new(row: usize, column: usize) -> Self {
        Position { row, column }
    }

    /// Position at the beginning of a line.
    pub fn line_start(row: usize) -> Self {
        Position { row, column: 0 }
    }

    /// Line number as presented to authors, counting from 1.
    pub fn line_number(&self) -> usize {
        self.row + 1
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "line {}, column {}", self.row + 1, self.column + 1)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde_support", derive(Deserialize, Serialize))]
/// Span between two positions in a document.
///
/// The start is inclusive and the end is exclusive. A range can never end before it
/// starts: constructing one which does yields
/// [`InvalidRange`][crate::error::StructuralError::InvalidRange].
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    /// Create a range, validating that `end` is not before `start`.
    ///
    /// # Examples
    /// ```
    /// # use sceneflow::{Position, Range};
    /// assert!(Range::new(Position::new(1, 4), Position::new(1, 8)).is_ok());
    /// assert!(Range::new(Position::new(2, 0), Position::new(1, 8)).is_err());
    /// ```
    pub fn new(start: Position, end: Position) -> Result<Self, StructuralError> {
        if end < start {
            return Err(StructuralError::InvalidRange { start, end });
        }

        Ok(Range { start, end })
    }

    /// Range which covers entire lines, from the start of `first` to the start of the line
    /// after `last`.
    pub fn rows(first: usize, last: usize) -> Result<Self, StructuralError> {
        Range::new(Position::line_start(first), Position::line_start(last + 1))
    }

    /// Empty range at a single position.
    pub fn point(position: Position) -> Self {
        Range {
            start: position,
            end: position,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Whether the position lies inside the range.
    pub fn contains(&self, position: Position) -> bool {
        self.start <= position && position < self.end
    }

    /// Whether the other range lies completely inside this one.
    pub fn contains_range(&self, other: &Range) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Whether the two ranges share any span.
    ///
    /// Ranges which only touch, where one ends at the position where the other starts,
    /// do not intersect.
    ///
    /// # Examples
    /// ```
    /// # use sceneflow::{Position, Range};
    /// let a = Range::new(Position::new(0, 0), Position::new(2, 1)).unwrap();
    /// let b = Range::new(Position::new(2, 0), Position::new(3, 0)).unwrap();
    /// let c = Range::new(Position::new(2, 1), Position::new(3, 0)).unwrap();
    ///
    /// assert!(a.intersects(&b));
    /// assert!(!a.intersects(&c));
    /// ```
    pub fn intersects(&self, other: &Range) -> bool {
        if self.is_empty() || other.is_empty() {
            return self.contains(other.start) || other.contains(self.start);
        }

        self.start < other.end && other.start < self.end
    }

    /// Rows that the range touches.
    ///
    /// A range that ends at the very start of a line does not touch that line.
    pub fn row_span(&self) -> std::ops::RangeInclusive<usize> {
        let last = if self.end.column == 0 && self.end.row > self.start.row {
            self.end.row - 1
        } else {
            self.end.row
        };

        self.start.row..=last
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}:{}-{}:{}",
            self.start.row + 1,
            self.start.column + 1,
            self.end.row + 1,
            self.end.column + 1
        )
    }
}

#[cfg(test)]
impl From<(usize, usize, usize, usize)> for Range {
    fn from((r0, c0, r1, c1): (usize, usize, usize, usize)) -> Self {
        Range::new(Position::new(r0, c0), Position::new(r1, c1)).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_ending_before_start_is_invalid() {
        let err = Range::new(Position::new(3, 2), Position::new(3, 1)).unwrap_err();

        match err {
            StructuralError::InvalidRange { start, end } => {
                assert_eq!(start, Position::new(3, 2));
                assert_eq!(end, Position::new(3, 1));
            }
            other => panic!("expected `InvalidRange` but got {:?}", other),
        }

        assert!(Range::new(Position::new(3, 0), Position::new(2, 9)).is_err());
    }

    #[test]
    fn range_may_start_and_end_at_the_same_position() {
        let range = Range::new(Position::new(2, 2), Position::new(2, 2)).unwrap();
        assert!(range.is_empty());
    }

    #[test]
    fn positions_are_ordered_by_row_then_column() {
        assert!(Position::new(0, 10) < Position::new(1, 0));
        assert!(Position::new(1, 0) < Position::new(1, 1));
    }

    #[test]
    fn contained_ranges_intersect() {
        let outer = Range::from((0, 0, 10, 0));
        let inner = Range::from((2, 4, 3, 1));

        assert!(outer.contains_range(&inner));
        assert!(outer.intersects(&inner));
        assert!(inner.intersects(&outer));
    }

    #[test]
    fn ranges_on_separate_rows_do_not_intersect() {
        let first = Range::from((0, 0, 1, 5));
        let second = Range::from((2, 0, 3, 5));

        assert!(!first.intersects(&second));
        assert!(!second.intersects(&first));
    }

    #[test]
    fn ranges_on_same_row_intersect_only_when_columns_overlap() {
        let left = Range::from((4, 0, 4, 5));
        let right = Range::from((4, 5, 4, 9));
        let overlapping = Range::from((4, 4, 4, 6));

        assert!(!left.intersects(&right));
        assert!(left.intersects(&overlapping));
        assert!(right.intersects(&overlapping));
    }

    #[test]
    fn row_span_excludes_row_where_range_ends_at_column_zero() {
        let range = Range::rows(2, 4).unwrap();
        assert_eq!(range.row_span(), 2..=4);

        let range = Range::from((2, 0, 4, 3));
        assert_eq!(range.row_span(), 2..=4);
    }

    #[test]
    fn line_numbers_count_from_one() {
        assert_eq!(Position::new(0, 0).line_number(), 1);
        assert_eq!(format!("{}", Position::new(4, 2)), "line 5, column 3");
    }
}
