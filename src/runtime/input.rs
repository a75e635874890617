//! Input and output of a turn.

use crate::{consts::LAUNCH_INTENT, runtime::state::SessionState};

use std::collections::BTreeMap;

#[cfg(feature = "serde_support")]
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde_support", derive(Deserialize, Serialize))]
/// Event which a turn responds to.
///
/// # Examples
/// ```
/// # use sceneflow::Input;
/// let input = Input::utterance("take the {item}").with_slot("item", "lamp");
///
/// assert_eq!(input.slots.get("item").map(|s| s.as_str()), Some("lamp"));
/// assert!(Input::launch().is_launch());
/// ```
pub struct Input {
    /// Name of the intent which the platform recognised, if any.
    pub intent: Option<String>,
    /// What the user said.
    pub value: Option<String>,
    /// Slot values which the platform recognised, by slot name.
    pub slots: BTreeMap<String, String>,
}

impl Input {
    /// Input which starts or resumes a session.
    pub fn launch() -> Self {
        Input::intent(LAUNCH_INTENT)
    }

    pub fn utterance(value: &str) -> Self {
        Input {
            value: Some(value.to_string()),
            ..Default::default()
        }
    }

    pub fn intent(name: &str) -> Self {
        Input {
            intent: Some(name.to_string()),
            ..Default::default()
        }
    }

    pub fn with_slot(mut self, name: &str, value: &str) -> Self {
        self.slots.insert(name.to_string(), value.to_string());
        self
    }

    pub fn is_launch(&self) -> bool {
        self.intent.as_deref() == Some(LAUNCH_INTENT)
    }
}

#[derive(Clone, Debug, PartialEq)]
/// Result of a turn.
pub struct TurnOutput {
    /// Speech markup for the platform to say.
    pub speech: String,
    /// Speech markup to say if the user does not respond.
    pub reprompt: String,
    /// State to store for the next turn.
    pub state: SessionState,
    /// Whether the story has ended and the platform should close the session.
    pub should_end_session: bool,
}
