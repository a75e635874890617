//! Utilities for inspecting warnings and other non-fatal findings of a compile.

mod logger;
mod message;

pub use logger::Logger;
pub use message::{LogMessage, MessageKind, Warning};
