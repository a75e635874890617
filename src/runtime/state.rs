//! Session state carried between turns.

use crate::{
    directive::{Choice, Directive, DirectiveKind, VariableSet},
    error::{CorruptStateKind, RuntimeError},
    runtime::rng::StoryRng,
    story::Scene,
};

use std::collections::BTreeMap;

#[cfg(feature = "serde_support")]
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde_support", derive(Deserialize, Serialize))]
/// Everything a session needs to continue a story in the next turn.
///
/// The driver holds no state of its own: the caller loads the state of a session, runs a
/// turn with it and stores the state which the turn returns.
///
/// With `serde_support` the state serialises as a single flat map. User variables are
/// stored by their names and the fields of the driver under keys with the `system_`
/// prefix, which stories cannot use as variable names.
pub struct SessionState {
    /// Variables set by the story.
    #[cfg_attr(feature = "serde_support", serde(flatten))]
    pub variables: VariableSet,
    /// Scene which the session is in, or `None` if it has not started or has ended.
    #[cfg_attr(
        feature = "serde_support",
        serde(rename = "system_current_scene", default)
    )]
    pub current_scene: Option<String>,
    /// Scenes which were navigated away from, most recent last.
    #[cfg_attr(feature = "serde_support", serde(rename = "system_history", default))]
    pub history: Vec<HistoryEntry>,
    /// Where `>> RESUME` or the next launch continues.
    #[cfg_attr(feature = "serde_support", serde(rename = "system_paused", default))]
    pub paused: Option<ResumePoint>,
    /// Choices which the session waits for.
    #[cfg_attr(feature = "serde_support", serde(rename = "system_choices", default))]
    pub choices: Vec<ChoicePath>,
    #[cfg_attr(feature = "serde_support", serde(rename = "system_last_speech", default))]
    pub last_speech: String,
    #[cfg_attr(
        feature = "serde_support",
        serde(rename = "system_last_reprompt", default)
    )]
    pub last_reprompt: String,
    /// Number of times each scene has been entered.
    #[cfg_attr(feature = "serde_support", serde(rename = "system_visits", default))]
    pub visits: BTreeMap<String, u32>,
    /// Number of turns run.
    #[cfg_attr(feature = "serde_support", serde(rename = "system_turns", default))]
    pub turns: u32,
    #[cfg_attr(feature = "serde_support", serde(rename = "system_rng", default))]
    pub rng: Option<StoryRng>,
}

impl SessionState {
    /// Create a state with the given variables set.
    pub fn with_variables(variables: VariableSet) -> Self {
        SessionState {
            variables,
            ..Default::default()
        }
    }

    /// Whether the session waits for input.
    pub fn is_awaiting_input(&self) -> bool {
        self.current_scene.is_some() && !self.choices.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde_support", derive(Deserialize, Serialize))]
/// Scene which was navigated away from.
pub struct HistoryEntry {
    pub scene: String,
    /// Set if the scene was left with `<->`, to continue after it.
    pub resume: Option<ResumePoint>,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde_support", derive(Deserialize, Serialize))]
/// Location in a scene to continue running from.
pub struct ResumePoint {
    pub scene: String,
    /// Blocks which were being run, innermost last.
    pub frames: Vec<Frame>,
    /// Choices which had been registered.
    pub choices: Vec<ChoicePath>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde_support", derive(Deserialize, Serialize))]
/// Nested list of directives inside a directive.
pub enum Branch {
    /// Directives of a `hear` choice.
    Body,
    /// Directives run when a condition holds.
    Then,
    /// Directives run when it does not.
    Else,
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde_support", derive(Deserialize, Serialize))]
/// Address of a list of directives in a scene.
///
/// Paths start at the directives of a scene content and step into nested lists by the
/// index of the directive which holds them.
pub struct BlockPath {
    pub content: usize,
    pub steps: Vec<(usize, Branch)>,
}

impl BlockPath {
    /// Path to the top level directives of a content.
    pub fn content(content: usize) -> Self {
        BlockPath {
            content,
            steps: Vec::new(),
        }
    }

    /// Path to a list nested in the directive at an index of this list.
    pub fn child(&self, index: usize, branch: Branch) -> Self {
        let mut steps = self.steps.clone();
        steps.push((index, branch));

        BlockPath {
            content: self.content,
            steps,
        }
    }

    pub(crate) fn resolve<'a>(&self, scene: &'a Scene) -> Result<&'a [Directive], RuntimeError> {
        let invalid = || {
            RuntimeError::from(CorruptStateKind::InvalidLocation {
                scene: scene.id.clone(),
            })
        };

        let mut directives = scene
            .contents
            .get(self.content)
            .map(|content| content.directives.as_slice())
            .ok_or_else(invalid)?;

        for (index, branch) in self.steps.iter() {
            let directive = directives.get(*index).ok_or_else(invalid)?;

            directives = match (&directive.kind, branch) {
                (DirectiveKind::Choice(choice), Branch::Body) => choice.directives.as_slice(),
                (DirectiveKind::Conditional { then_branch, .. }, Branch::Then) => {
                    then_branch.as_slice()
                }
                (
                    DirectiveKind::Conditional {
                        else_branch: Some(else_branch),
                        ..
                    },
                    Branch::Else,
                ) => else_branch.as_slice(),
                _ => return Err(invalid()),
            };
        }

        Ok(directives)
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde_support", derive(Deserialize, Serialize))]
/// List of directives being run and the index of the next one to run.
pub struct Frame {
    pub block: BlockPath,
    pub next: usize,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde_support", derive(Deserialize, Serialize))]
/// Choice which a session waits for, by its location.
pub struct ChoicePath {
    pub scene: String,
    /// List which holds the choice.
    pub block: BlockPath,
    pub index: usize,
    /// Key of the choice, to check that the location still holds it.
    pub key: String,
}

impl ChoicePath {
    pub(crate) fn resolve<'a>(&self, scene: &'a Scene) -> Result<&'a Choice, RuntimeError> {
        let directives = self.block.resolve(scene)?;

        match directives.get(self.index).map(|directive| &directive.kind) {
            Some(DirectiveKind::Choice(choice)) if choice.key() == self.key => Ok(choice),
            _ => Err(CorruptStateKind::InvalidLocation {
                scene: scene.id.clone(),
            }
            .into()),
        }
    }

    /// Path to the directives of the choice.
    pub(crate) fn body(&self) -> BlockPath {
        self.block.child(self.index, Branch::Body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compile_story;

    const STORY: &str = "\
@start
*then
    if ready {
        hear go {
            -> start
        }
    } else {
        flag ready
    }
";

    #[test]
    fn block_paths_step_into_nested_lists() {
        let program = compile_story(STORY).unwrap();
        let scene = &program.scenes[0];

        let then_branch = BlockPath::content(0).child(0, Branch::Then);
        let else_branch = BlockPath::content(0).child(0, Branch::Else);

        assert!(matches!(
            then_branch.resolve(scene).unwrap()[0].kind,
            DirectiveKind::Choice(_)
        ));
        assert!(matches!(
            else_branch.resolve(scene).unwrap()[0].kind,
            DirectiveKind::Flag { .. }
        ));
    }

    #[test]
    fn paths_which_do_not_fit_the_scene_are_corrupt() {
        let program = compile_story(STORY).unwrap();
        let scene = &program.scenes[0];

        let expected = Err(RuntimeError::CorruptState(CorruptStateKind::InvalidLocation {
            scene: "start".to_string(),
        }));

        assert_eq!(BlockPath::content(1).resolve(scene), expected);
        assert_eq!(
            BlockPath::content(0).child(0, Branch::Body).resolve(scene),
            expected
        );
        assert_eq!(
            BlockPath::content(0).child(4, Branch::Then).resolve(scene),
            expected
        );
    }

    #[test]
    fn choice_paths_check_the_key_of_the_choice() {
        let program = compile_story(STORY).unwrap();
        let scene = &program.scenes[0];

        let mut path = ChoicePath {
            scene: "start".to_string(),
            block: BlockPath::content(0).child(0, Branch::Then),
            index: 0,
            key: "go".to_string(),
        };

        assert_eq!(path.resolve(scene).unwrap().utterances, vec!["go".to_string()]);

        path.key = "stop".to_string();
        assert!(path.resolve(scene).is_err());
    }
}
