//! Errors from compiling or running stories.

#[macro_use]
pub(crate) mod utils;

mod compile;
mod runtime;
mod structural;
mod syntax;

pub use compile::{print_compile_errors, CompileError, CompileErrorKind};
pub use runtime::{CorruptStateKind, RuntimeError};
pub use structural::StructuralError;
pub use syntax::{SyntaxError, SyntaxErrorKind};
