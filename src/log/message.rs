use crate::{document::Position, error::utils::write_line_information};

use std::fmt;

#[derive(Clone, Debug, PartialEq)]
/// Log message with additional information.
pub struct LogMessage {
    /// Logged message.
    pub message: MessageKind,
    /// Document the message originated from, if any.
    pub document: Option<String>,
    /// Position in the document the message originated from, if known.
    pub position: Option<Position>,
}

impl LogMessage {
    pub(crate) fn with_kind(
        message: MessageKind,
        document: Option<&str>,
        position: Option<Position>,
    ) -> Self {
        LogMessage {
            message,
            document: document.map(|id| id.to_string()),
            position,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
/// Type of log message with content.
pub enum MessageKind {
    /// Todo comment.
    Todo(String),
    /// Non-fatal error or incompatibility.
    Warning(Warning),
}

#[derive(Clone, Debug, PartialEq)]
/// A detected non-fatal error in a story.
pub enum Warning {
    /// A `{{name}}` snippet was used but no snippet with the name was given.
    UnknownSnippet { name: String },
    /// A snippet refers back to itself, or nests deeper than allowed. The reference is removed.
    RecursiveSnippet { name: String },
    /// An `[sfx name]` tag names audio which the resolver does not know.
    MissingAudio { name: String },
    /// A string has no translation for the locale, so the source text is used.
    MissingTranslation { key: String, locale: String },
    /// A scene has neither narration nor directives.
    EmptyScene { scene: String },
    /// No navigation leads to a scene.
    UnreachableScene { scene: String },
}

impl fmt::Display for LogMessage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let kind = match &self.message {
            MessageKind::Todo(_) => "TODO",
            MessageKind::Warning(_) => "WARNING",
        };

        if let Some(document) = &self.document {
            write!(f, "[{}] ", document)?;
        }

        if let Some(position) = &self.position {
            write_line_information(f, position)?;
        }

        write!(f, "{}: {}", kind, self.message)
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use MessageKind::*;

        match self {
            Todo(comment) => write!(f, "{}", comment),
            Warning(warning) => write!(f, "{}", warning),
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use Warning::*;

        match self {
            UnknownSnippet { name } => write!(
                f,
                "snippet '{{{{{}}}}}' is not defined and was left in the text",
                name
            ),
            RecursiveSnippet { name } => write!(
                f,
                "snippet '{{{{{}}}}}' expands into itself or nests too deeply and was removed",
                name
            ),
            MissingAudio { name } => write!(
                f,
                "audio '{}' could not be found and the tag was left in the text",
                name
            ),
            MissingTranslation { key, locale } => write!(
                f,
                "no '{}' translation for '{}': using the source text",
                locale, key
            ),
            EmptyScene { scene } => write!(f, "scene '{}' has no content", scene),
            UnreachableScene { scene } => {
                write!(f, "no navigation leads to scene '{}'", scene)
            }
        }
    }
}
