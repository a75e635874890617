//! Directives: the executable instructions of a scene.

use crate::{
    directive::{expression::Expression, operand::DiceRoll, operand::Operand},
    document::Range,
};

#[cfg(feature = "serde_support")]
use serde::{Deserialize, Serialize};

use std::fmt;

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde_support", derive(Deserialize, Serialize))]
/// Single instruction from a `*then` block.
pub struct Directive {
    pub kind: DirectiveKind,
    /// Where the directive was read from. Only used by authoring operations.
    pub range: Range,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde_support", derive(Deserialize, Serialize))]
/// Variant of directive.
pub enum DirectiveKind {
    /// `-> scene`: continue in another scene.
    GoTo { target: String },
    /// `<-> scene`: continue in another scene and come back here on `>> RETURN`.
    SaveAndGo { target: String },
    /// `>> RETURN`
    Return,
    /// `>> RESTART`
    Restart,
    /// `>> PAUSE`
    Pause,
    /// `>> RESUME`
    Resume,
    /// `>> REPEAT`
    Repeat,
    /// `>> REPROMPT`
    RepeatReprompt,
    /// `>> BACK n`: go back `n` scenes in history.
    Back { count: usize },
    /// `>> END`
    End,
    /// `flag x`: set a variable to `true`.
    Flag { variable: String },
    /// `unflag x`: set a variable to `false`.
    Unflag { variable: String },
    /// `clear x`: remove a variable, or all variables if named `*`.
    Clear { variable: String },
    /// `set x to value`
    Set { variable: String, operand: Operand },
    /// `increase x by value` and the other arithmetic operations.
    Arithmetic {
        operation: Operation,
        variable: String,
        operand: Operand,
    },
    /// `slot x to 'Type'`: store the input slot with the variable's name.
    Slot { variable: String, slot_type: Operand },
    /// `hear a, b { ... }`
    Choice(Choice),
    /// `if condition { ... } else { ... }`
    Conditional {
        expression: Expression,
        then_branch: Vec<Directive>,
        else_branch: Option<Vec<Directive>>,
    },
    /// `bgm url`: play background audio.
    Bgm { url: String },
    /// `roll 2d6`: store a roll in `rollResult`.
    Roll { dice: DiceRoll },
    /// `>> NAME params`: instruction handled by an extension.
    Custom { name: String, params: Vec<String> },
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde_support", derive(Deserialize, Serialize))]
/// Arithmetic operation on a variable.
pub enum Operation {
    Increase,
    Decrease,
    Multiply,
    Divide,
    Modulus,
}

impl Operation {
    /// Apply the operation. Returns `None` for a division or modulus by zero.
    pub fn apply(self, lhs: f64, rhs: f64) -> Option<f64> {
        match self {
            Operation::Increase => Some(lhs + rhs),
            Operation::Decrease => Some(lhs - rhs),
            Operation::Multiply => Some(lhs * rhs),
            Operation::Divide if rhs == 0.0 => None,
            Operation::Divide => Some(lhs / rhs),
            Operation::Modulus if rhs == 0.0 => None,
            Operation::Modulus => Some(lhs % rhs),
        }
    }

    pub(crate) fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "increase" => Some(Operation::Increase),
            "decrease" => Some(Operation::Decrease),
            "multiply" => Some(Operation::Multiply),
            "divide" => Some(Operation::Divide),
            "modulus" => Some(Operation::Modulus),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde_support", derive(Deserialize, Serialize))]
/// Set of utterances which the story waits for, and what to do when one is heard.
pub struct Choice {
    /// Utterances as written, which may contain `{slot}` placeholders.
    pub utterances: Vec<String>,
    /// Whether taking the choice is recorded in the navigation history.
    pub save_to_history: bool,
    /// Whether this is the `otherwise` choice, taken when nothing else matches.
    pub is_fallback: bool,
    pub directives: Vec<Directive>,
}

impl Choice {
    /// Identity of the choice: its normalised utterances, sorted.
    ///
    /// Two choices with the same utterances in a different order are the same choice.
    ///
    /// # Examples
    /// ```
    /// # use sceneflow::Choice;
    /// let choice = |utterances: &[&str]| Choice {
    ///     utterances: utterances.iter().map(|s| s.to_string()).collect(),
    ///     save_to_history: true,
    ///     is_fallback: false,
    ///     directives: Vec::new(),
    /// };
    ///
    /// assert_eq!(choice(&["one", "two"]).key(), choice(&["Two ", "one"]).key());
    /// assert_ne!(choice(&["one", "two"]).key(), choice(&["one", "two", "three"]).key());
    /// ```
    pub fn key(&self) -> String {
        let mut utterances = self
            .utterances
            .iter()
            .map(|utterance| normalize_utterance(utterance))
            .collect::<Vec<_>>();

        utterances.sort();
        utterances.dedup();

        if self.is_fallback {
            format!("otherwise:{}", utterances.join(","))
        } else {
            utterances.join(",")
        }
    }
}

/// Normalise an utterance for matching: trimmed, lower case and with single spaces.
pub fn normalize_utterance(utterance: &str) -> String {
    utterance
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

impl Directive {
    /// Iterate over this directive and every directive nested inside it, in document order.
    pub fn walk(&self) -> Vec<&Directive> {
        let mut directives = vec![self];

        match &self.kind {
            DirectiveKind::Choice(choice) => {
                for directive in &choice.directives {
                    directives.extend(directive.walk());
                }
            }
            DirectiveKind::Conditional {
                then_branch,
                else_branch,
                ..
            } => {
                for directive in then_branch.iter().chain(else_branch.iter().flatten()) {
                    directives.extend(directive.walk());
                }
            }
            _ => (),
        }

        directives
    }

    /// Scene this directive navigates to, if it is a navigation directive.
    pub fn target(&self) -> Option<&str> {
        match &self.kind {
            DirectiveKind::GoTo { target } | DirectiveKind::SaveAndGo { target } => {
                Some(target.as_str())
            }
            _ => None,
        }
    }
}

/// Visit every directive in a list mutably, including nested ones.
pub(crate) fn for_each_directive_mut<F>(directives: &mut [Directive], f: &mut F)
where
    F: FnMut(&mut Directive),
{
    for directive in directives.iter_mut() {
        f(directive);

        match &mut directive.kind {
            DirectiveKind::Choice(choice) => for_each_directive_mut(&mut choice.directives, f),
            DirectiveKind::Conditional {
                then_branch,
                else_branch,
                ..
            } => {
                for_each_directive_mut(then_branch, f);

                if let Some(branch) = else_branch {
                    for_each_directive_mut(branch, f);
                }
            }
            _ => (),
        }
    }
}

impl fmt::Display for DirectiveKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use DirectiveKind::*;

        match self {
            GoTo { target } => write!(f, "-> {}", target),
            SaveAndGo { target } => write!(f, "<-> {}", target),
            Return => write!(f, ">> RETURN"),
            Restart => write!(f, ">> RESTART"),
            Pause => write!(f, ">> PAUSE"),
            Resume => write!(f, ">> RESUME"),
            Repeat => write!(f, ">> REPEAT"),
            RepeatReprompt => write!(f, ">> REPROMPT"),
            Back { count } => write!(f, ">> BACK {}", count),
            End => write!(f, ">> END"),
            Flag { variable } => write!(f, "flag {}", variable),
            Unflag { variable } => write!(f, "unflag {}", variable),
            Clear { variable } => write!(f, "clear {}", variable),
            Set { variable, operand } => write!(f, "set {} to {}", variable, operand),
            Arithmetic {
                operation,
                variable,
                operand,
            } => {
                let keyword = match operation {
                    Operation::Increase => "increase",
                    Operation::Decrease => "decrease",
                    Operation::Multiply => "multiply",
                    Operation::Divide => "divide",
                    Operation::Modulus => "modulus",
                };

                write!(f, "{} {} by {}", keyword, variable, operand)
            }
            Slot {
                variable,
                slot_type,
            } => write!(f, "slot {} to {}", variable, slot_type),
            Choice(choice) if choice.is_fallback => write!(f, "otherwise {{ ... }}"),
            Choice(choice) => write!(f, "hear {} {{ ... }}", choice.utterances.join(", ")),
            Conditional { .. } => write!(f, "if ... {{ ... }}"),
            Bgm { url } => write!(f, "bgm {}", url),
            Roll { dice } => write!(f, "roll {}", dice),
            Custom { name, params } if params.is_empty() => write!(f, ">> {}", name),
            Custom { name, params } => write!(f, ">> {} {}", name, params.join(" ")),
        }
    }
}
