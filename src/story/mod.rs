//! Compiled stories and how they are compiled.

mod compile;
mod program;

pub use compile::{compile, compile_story, CompileInput, CompileOptions, CompileOutput};
pub use program::{ContentOrigin, Metadata, Program, Scene, SceneContent};
