//! Documentation of the story format.

pub mod features;
