//! Running compiled stories one turn at a time.

mod buffer;
mod driver;
mod input;
mod instruction;
mod rng;
mod state;

pub use driver::Driver;
pub use input::{Input, TurnOutput};
pub use instruction::InstructionExtension;
pub use rng::StoryRng;
pub use state::{BlockPath, Branch, ChoicePath, Frame, HistoryEntry, ResumePoint, SessionState};
