//! Errors from running a turn of a story.

use std::{error::Error, fmt};

#[derive(Clone, Debug, PartialEq)]
/// Errors from running a turn.
///
/// Ordinary story mistakes never surface here: undefined variables evaluate to false
/// or zero, unmatched input falls back to the scene's default directives and unknown
/// custom instructions are logged and skipped. What remains are conditions in which
/// the turn cannot produce a meaningful result.
pub enum RuntimeError {
    /// The turn executed more directives than the step limit allows, which means that
    /// the story navigates in a loop without ever waiting for input.
    InfiniteLoopSuspected {
        /// Scene that was active when the limit was hit.
        scene: String,
        /// Number of steps that were executed.
        steps: usize,
    },
    /// A scene that the turn needs to enter does not exist in the program.
    MissingScene { id: String },
    /// The session state does not fit the program it is run against.
    CorruptState(CorruptStateKind),
    /// A custom instruction handler reported a failure.
    Instruction { name: String, message: String },
}

#[derive(Clone, Debug, PartialEq)]
/// Way in which a session state was found to be inconsistent.
pub enum CorruptStateKind {
    /// The current scene is not part of the program.
    UnknownCurrentScene { id: String },
    /// A stored choice or resume point does not point at a valid location in its scene.
    InvalidLocation { scene: String },
}

impl Error for RuntimeError {}

impl_from_error![
    RuntimeError;
    [CorruptState, CorruptStateKind]
];

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use RuntimeError::*;

        match self {
            InfiniteLoopSuspected { scene, steps } => write!(
                f,
                "Infinite loop suspected: executed {} directives without waiting for input \
                 (last scene: '{}')",
                steps, scene
            ),
            MissingScene { id } => write!(f, "Cannot run scene '{}': it does not exist", id),
            CorruptState(kind) => write!(f, "Corrupt session state: {}", kind),
            Instruction { name, message } => {
                write!(f, "Custom instruction '{}' failed: {}", name, message)
            }
        }
    }
}

impl fmt::Display for CorruptStateKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use CorruptStateKind::*;

        match self {
            UnknownCurrentScene { id } => {
                write!(f, "current scene '{}' is not part of the story", id)
            }
            InvalidLocation { scene } => write!(
                f,
                "stored location in scene '{}' does not match the story",
                scene
            ),
        }
    }
}
