//! Errors from compiling a set of documents into a program.

use crate::{
    document::Position,
    error::{
        structural::StructuralError,
        syntax::{SyntaxError, SyntaxErrorKind},
        utils::write_line_information,
    },
};

use std::{
    error::Error,
    fmt::{self, Write},
};

#[derive(Clone, Debug, PartialEq)]
/// Error encountered while compiling a story.
///
/// Every error carries the document it was found in and, when known, the scene and
/// position, which is enough to render a diagnostic in an editor.
pub struct CompileError {
    /// Identifier of the document the error was found in.
    pub document: String,
    /// Scene the error was found in, if any.
    pub scene: Option<String>,
    /// Position of the offending content, if any.
    pub position: Option<Position>,
    /// Error variant.
    pub kind: CompileErrorKind,
}

#[derive(Clone, Debug, PartialEq)]
/// Variant of compile error.
pub enum CompileErrorKind {
    /// A line in a `*then` block could not be parsed.
    Syntax(SyntaxErrorKind),
    /// The structure of the document could not be read.
    Structural(StructuralError),
    /// A required scene is not present in the story.
    MissingScene { id: String },
    /// Two scenes share the same identifier.
    DuplicateScene {
        id: String,
        /// Where the first scene with the identifier was declared.
        previous_document: String,
        previous_position: Position,
    },
    /// A navigation directive names a scene that does not exist.
    UnknownTarget { target: String },
    /// A `slot` directive names a slot type which is neither built in nor declared.
    UnknownSlotType { slot_type: String },
    /// The manifest names a document which was not supplied.
    UnknownDocument { id: String },
}

impl CompileError {
    pub(crate) fn from_syntax(document: &str, scene: &str, error: SyntaxError) -> Self {
        CompileError {
            document: document.to_string(),
            scene: Some(scene.to_string()),
            position: Some(error.position),
            kind: CompileErrorKind::Syntax(error.kind),
        }
    }

    pub(crate) fn from_structural(
        document: &str,
        scene: Option<&str>,
        error: StructuralError,
    ) -> Self {
        CompileError {
            document: document.to_string(),
            scene: scene.map(|s| s.to_string()),
            position: Some(error.position()),
            kind: CompileErrorKind::Structural(error),
        }
    }

    /// Line number of the error as presented to authors, counting from 1.
    pub fn line_number(&self) -> Option<usize> {
        self.position.map(|position| position.line_number())
    }

    /// Short identifier for the error variant.
    pub fn error_name(&self) -> &'static str {
        use CompileErrorKind::*;

        match &self.kind {
            Syntax(kind) => kind.name(),
            Structural(StructuralError::InvalidRange { .. }) => "InvalidRange",
            Structural(StructuralError::UnterminatedBlock { .. }) => "UnterminatedBlock",
            Structural(StructuralError::MissingOpeningBrace { .. }) => "MissingOpeningBrace",
            Structural(StructuralError::UnterminatedComment { .. }) => "UnterminatedComment",
            MissingScene { .. } => "MissingScene",
            DuplicateScene { .. } => "DuplicateScene",
            UnknownTarget { .. } => "UnknownTarget",
            UnknownSlotType { .. } => "UnknownSlotType",
            UnknownDocument { .. } => "UnknownDocument",
        }
    }

    /// Message describing the error, without position information.
    pub fn error_message(&self) -> String {
        format!("{}", self.kind)
    }

    /// Whether the error makes the compiled program unusable.
    ///
    /// Syntax errors and undeclared slot types leave a best-effort program behind,
    /// every other error does not.
    pub fn is_fatal(&self) -> bool {
        match self.kind {
            CompileErrorKind::Syntax(..) | CompileErrorKind::UnknownSlotType { .. } => false,
            _ => true,
        }
    }
}

/// Get a string with all compile errors, one per line, with their origin.
///
/// # Examples
/// ```
/// # use sceneflow::{compile_story, error::print_compile_errors};
/// let errors = compile_story("@begin\n*say\n\tHello\n").unwrap_err();
/// let printed = print_compile_errors(&errors).unwrap();
///
/// assert!(printed.contains("start"));
/// ```
pub fn print_compile_errors(errors: &[CompileError]) -> Result<String, fmt::Error> {
    let mut buffer = String::new();

    for error in errors {
        write!(&mut buffer, "{}\n", error)?;
    }

    Ok(buffer)
}

impl Error for CompileError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.kind {
            CompileErrorKind::Structural(err) => Some(err),
            _ => None,
        }
    }
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[{}] ", self.document)?;

        if let Some(position) = &self.position {
            write_line_information(f, position)?;
        }

        if let Some(scene) = &self.scene {
            write!(f, "in scene '{}': ", scene)?;
        }

        match &self.kind {
            // The structural error writes its own line information
            CompileErrorKind::Structural(StructuralError::InvalidRange { start, end }) => write!(
                f,
                "invalid range: end ({}) is before start ({})",
                end, start
            ),
            CompileErrorKind::Structural(StructuralError::UnterminatedBlock { .. }) => {
                write!(f, "block is opened with '{{' but never closed")
            }
            CompileErrorKind::Structural(StructuralError::MissingOpeningBrace { .. }) => {
                write!(f, "block header is not followed by '{{'")
            }
            CompileErrorKind::Structural(StructuralError::UnterminatedComment { .. }) => {
                write!(f, "comment is opened with '/*' but never closed")
            }
            kind => write!(f, "{}", kind),
        }
    }
}

impl fmt::Display for CompileErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use CompileErrorKind::*;

        match self {
            Syntax(kind) => write!(f, "{}", kind),
            Structural(err) => write!(f, "{}", err),
            MissingScene { id } => write!(f, "story has no scene named '{}'", id),
            DuplicateScene {
                id,
                previous_document,
                previous_position,
            } => write!(
                f,
                "encountered another scene with name '{}' (previous in '{}' at {})",
                id, previous_document, previous_position
            ),
            UnknownTarget { target } => write!(
                f,
                "navigation to scene '{}' which does not exist in the story",
                target
            ),
            UnknownSlotType { slot_type } => write!(
                f,
                "slot type '{}' is neither built in nor declared in the slot type map",
                slot_type
            ),
            UnknownDocument { id } => {
                write!(f, "manifest lists document '{}' which was not supplied", id)
            }
        }
    }
}
