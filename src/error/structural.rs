//! Errors from locating blocks in a document.

use crate::{document::Position, error::utils::write_line_information};

use std::{error::Error, fmt};

#[derive(Clone, Debug, PartialEq)]
/// Errors which make it impossible to read the structure of a document.
///
/// These are fatal to the call that encountered them: a block whose extent cannot be
/// determined cannot be parsed.
pub enum StructuralError {
    /// A range was constructed with its end before its start.
    InvalidRange { start: Position, end: Position },
    /// A brace-matched block was opened but never closed.
    UnterminatedBlock {
        /// Position of the line which opened the block.
        position: Position,
    },
    /// A brace-matched block header was not followed by an opening brace.
    MissingOpeningBrace {
        /// Position of the block header.
        position: Position,
    },
    /// A `/*` comment was opened but never closed.
    UnterminatedComment { position: Position },
}

impl StructuralError {
    /// Position in the document that the error refers to.
    pub fn position(&self) -> Position {
        match self {
            StructuralError::InvalidRange { start, .. } => *start,
            StructuralError::UnterminatedBlock { position }
            | StructuralError::MissingOpeningBrace { position }
            | StructuralError::UnterminatedComment { position } => *position,
        }
    }
}

impl Error for StructuralError {}

impl fmt::Display for StructuralError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use StructuralError::*;

        match self {
            InvalidRange { start, end } => write!(
                f,
                "invalid range: end ({}) is before start ({})",
                end, start
            ),
            UnterminatedBlock { position } => {
                write_line_information(f, position)?;
                write!(f, "block is opened with '{{' but never closed")
            }
            MissingOpeningBrace { position } => {
                write_line_information(f, position)?;
                write!(f, "block header is not followed by '{{'")
            }
            UnterminatedComment { position } => {
                write_line_information(f, position)?;
                write!(f, "comment is opened with '/*' but never closed")
            }
        }
    }
}
