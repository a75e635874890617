//! Compiler and turn-based driver for branching voice stories.
//!
//! Stories are written as plain text documents of scenes:
//!
//! ```plain
//! @start
//! *say
//!     You wake up in a dark room. Do you light the lamp?
//! *then
//!     hear yes, light the lamp {
//!         flag lamp
//!         -> library
//!     }
//!     hear no {
//!         >> END
//!     }
//!
//! @library
//! *say
//!     The room is full of books.
//! ```
//!
//! [`compile`] turns a set of documents into a [`Program`], collecting every error and
//! warning on the way and running the import extensions which add global scenes,
//! localisation, snippets and audio. A [`Driver`] then runs the program one turn at a time:
//! each turn takes an [`Input`] and the [`SessionState`] of a session and returns the
//! speech to say along with the state to store for the next turn.
//!
//! ```
//! use sceneflow::{compile_story, Driver, Input, SessionState};
//!
//! let program = compile_story("\
//! @start
//! *say
//!     Do you light the lamp?
//! *then
//!     hear yes {
//!         -> library
//!     }
//!
//! @library
//! *say
//!     The room is full of books.
//! ").unwrap();
//!
//! let driver = Driver::new(&program);
//!
//! let output = driver.run_turn(Input::launch(), SessionState::default()).unwrap();
//! assert_eq!(output.speech, "Do you light the lamp?");
//!
//! let output = driver.run_turn(Input::utterance("yes"), output.state).unwrap();
//! assert_eq!(output.speech, "The room is full of books.");
//! ```
//!
//! The syntax of story documents is listed in [`docs`].
//!
//! # Features
//!
//! `serde_support` derives `Serialize` and `Deserialize` for programs, session states and
//! the types they hold, so that both can be stored between sessions.

#[macro_use]
pub mod error;

mod consts;
pub mod directive;
pub mod docs;
pub mod document;
pub mod extension;
pub mod external;
pub mod log;
pub mod runtime;
pub mod story;

pub use directive::{
    parse_then_block, Choice, DiceRoll, Directive, DirectiveKind, Expression, Operand, Variable,
    VariableSet,
};
pub use document::{
    Block, BlockLocator, EndRule, Position, PropertyEnumerator, Range, SceneEnumerator,
    SourceDocument, StartPattern,
};
pub use error::{CompileError, CompileErrorKind, RuntimeError};
pub use extension::LanguageStrings;
pub use external::{AudioLibrary, AudioResolver, MemoryStore, NoAudio, SessionStore};
pub use runtime::{Driver, Input, InstructionExtension, SessionState, TurnOutput};
pub use story::{
    compile, compile_story, CompileInput, CompileOptions, CompileOutput, ContentOrigin, Metadata,
    Program, Scene, SceneContent,
};
