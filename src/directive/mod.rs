//! Directives of a scene and how they are parsed.

pub(crate) mod directive;
pub(crate) mod expression;
pub(crate) mod operand;
pub(crate) mod parse;
pub(crate) mod variable;

pub use directive::{normalize_utterance, Choice, Directive, DirectiveKind, Operation};
pub use expression::{Comparison, Expression, Term};
pub use operand::{DiceRoll, Operand};
pub use parse::parse_then_block;
pub use variable::{Variable, VariableSet};
