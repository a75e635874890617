//! Errors from parsing single directive lines.

use crate::{document::Position, error::utils::write_line_information};

use std::{error::Error, fmt};

#[derive(Clone, Debug, PartialEq)]
/// Error from a single line of a `*then` block.
///
/// Syntax errors are not fatal. The parser records one error per offending line and
/// continues with the next line, so that every mistake in a block can be reported at once.
pub struct SyntaxError {
    /// Where the offending line begins.
    pub position: Position,
    /// Error variant.
    pub kind: SyntaxErrorKind,
}

#[derive(Clone, Debug, PartialEq)]
/// Variant of syntax error.
pub enum SyntaxErrorKind {
    /// Block header (`if`, `hear`, `else`) without an opening brace.
    MissingOpeningBrace,
    /// Block which is never closed.
    MissingClosingBrace,
    /// Closing brace without a matching block.
    UnexpectedClosingBrace,
    /// `else` which does not follow an `if` block.
    UnexpectedElse,
    /// Line which starts with no known keyword.
    UnknownDirective(String),
    /// Navigation without a target scene.
    MissingSceneName,
    /// Variable operation without a variable name.
    MissingVariableName,
    /// Variable operation without a value or with a malformed one.
    MissingValue,
    /// Value which should be a number but is not.
    InvalidNumber(String),
    /// Dice roll which could not be read.
    InvalidDiceRoll(String),
    /// Condition which could not be read.
    InvalidExpression(String),
    /// `hear` block without any utterances.
    EmptyChoice,
    /// Variable with a name reserved for the driver.
    ReservedVariable(String),
    /// `/*` comment which is never closed.
    UnterminatedComment,
}

impl SyntaxError {
    pub fn new(position: Position, kind: SyntaxErrorKind) -> Self {
        SyntaxError { position, kind }
    }

    /// Line number as presented to authors, counting from 1.
    pub fn line_number(&self) -> usize {
        self.position.line_number()
    }
}

impl SyntaxErrorKind {
    /// Short identifier for the error variant.
    pub fn name(&self) -> &'static str {
        use SyntaxErrorKind::*;

        match self {
            MissingOpeningBrace => "MissingOpeningBrace",
            MissingClosingBrace => "MissingClosingBrace",
            UnexpectedClosingBrace => "UnexpectedClosingBrace",
            UnexpectedElse => "UnexpectedElse",
            UnknownDirective(..) => "UnknownDirective",
            MissingSceneName => "MissingSceneName",
            MissingVariableName => "MissingVariableName",
            MissingValue => "MissingValue",
            InvalidNumber(..) => "InvalidNumber",
            InvalidDiceRoll(..) => "InvalidDiceRoll",
            InvalidExpression(..) => "InvalidExpression",
            EmptyChoice => "EmptyChoice",
            ReservedVariable(..) => "ReservedVariable",
            UnterminatedComment => "UnterminatedComment",
        }
    }
}

impl Error for SyntaxError {}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write_line_information(f, &self.position)?;
        write!(f, "{}", self.kind)
    }
}

impl fmt::Display for SyntaxErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use SyntaxErrorKind::*;

        match self {
            MissingOpeningBrace => write!(f, "Missing '{{'"),
            MissingClosingBrace => write!(f, "Missing '}}'"),
            UnexpectedClosingBrace => write!(f, "Unexpected '}}' without an open block"),
            UnexpectedElse => write!(f, "Found 'else' which does not follow an 'if' block"),
            UnknownDirective(line) => write!(f, "Unknown directive '{}'", line),
            MissingSceneName => write!(f, "Missing scene name after navigation marker"),
            MissingVariableName => write!(f, "Missing variable name"),
            MissingValue => write!(f, "Missing value for variable operation"),
            InvalidNumber(value) => write!(f, "'{}' is not a valid number", value),
            InvalidDiceRoll(value) => write!(
                f,
                "'{}' is not a valid dice roll (expected e.g. '2d6', '1d20+3' or '4d6k3')",
                value
            ),
            InvalidExpression(reason) => write!(f, "Invalid condition: {}", reason),
            EmptyChoice => write!(f, "'hear' must be followed by at least one utterance"),
            ReservedVariable(name) => write!(
                f,
                "Variable name '{}' is reserved (names may not begin with 'system_')",
                name
            ),
            UnterminatedComment => write!(f, "Comment is opened with '/*' but never closed"),
        }
    }
}
