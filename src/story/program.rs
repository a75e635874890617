//! Compiled stories: scenes with their narration and directives.

use crate::{
    directive::{directive::for_each_directive_mut, Choice, Directive, DirectiveKind},
    document::Range,
};

#[cfg(feature = "serde_support")]
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde_support", derive(Deserialize, Serialize))]
/// Compiled story, ready to be run by a [`Driver`][crate::runtime::Driver].
///
/// Scenes are kept in the order they were read in. Identifiers are unique.
pub struct Program {
    pub scenes: Vec<Scene>,
    pub metadata: Metadata,
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde_support", derive(Deserialize, Serialize))]
/// Information about a story.
pub struct Metadata {
    pub plugin_name: String,
    pub story_id: String,
    pub title: String,
    /// Locale which the text of the story has been translated to, once it has been.
    pub locale: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde_support", derive(Deserialize, Serialize))]
/// Named unit of narrative content, which navigation moves between.
pub struct Scene {
    pub id: String,
    /// Document the scene was read from.
    pub document: String,
    /// Where the scene was read from, from its header to the line before the next scene.
    pub range: Range,
    /// Content of the scene, run in order.
    ///
    /// Scenes are compiled with a single content from their source. Global scenes add
    /// more in front of or behind it.
    pub contents: Vec<SceneContent>,
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde_support", derive(Deserialize, Serialize))]
/// Narration and directives of a scene.
pub struct SceneContent {
    /// Text from `*say`, with lines trimmed and joined by newlines.
    pub narration: String,
    /// Text from `*reprompt`.
    pub reprompt: Option<String>,
    /// Text from `*recap`.
    pub recap: Option<String>,
    /// Directives from `*then`.
    pub directives: Vec<Directive>,
    /// Properties with other names, by name, with their raw text.
    pub properties: Vec<(String, String)>,
    pub origin: ContentOrigin,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde_support", derive(Deserialize, Serialize))]
/// Where a scene content comes from.
pub enum ContentOrigin {
    /// The scene's own source.
    Source,
    /// Injected from a global scene.
    Injected { from: String },
}

impl Default for ContentOrigin {
    fn default() -> Self {
        ContentOrigin::Source
    }
}

impl Program {
    /// Get a scene by its identifier.
    pub fn scene(&self, id: &str) -> Option<&Scene> {
        self.scenes.iter().find(|scene| scene.id == id)
    }

    pub fn scene_mut(&mut self, id: &str) -> Option<&mut Scene> {
        self.scenes.iter_mut().find(|scene| scene.id == id)
    }

    pub fn contains_scene(&self, id: &str) -> bool {
        self.scene(id).is_some()
    }

    /// Identifiers of all scenes, in order.
    pub fn scene_ids(&self) -> impl Iterator<Item = &str> {
        self.scenes.iter().map(|scene| scene.id.as_str())
    }

    /// Rename a scene and every navigation to it.
    ///
    /// Returns `false` and leaves the program as it is if there is no scene with the old
    /// identifier or if a scene with the new identifier already exists.
    ///
    /// # Examples
    /// ```
    /// # use sceneflow::compile_story;
    /// let mut program = compile_story("\
    /// @start
    /// *then
    ///     -> hall
    /// @hall
    /// *say
    ///     A long hall.
    /// ").unwrap();
    ///
    /// assert!(program.rename_scene("hall", "corridor"));
    ///
    /// assert!(program.scene("corridor").is_some());
    /// assert_eq!(program.scene("start").unwrap().contents[0].directives[0].target(), Some("corridor"));
    /// ```
    pub fn rename_scene(&mut self, old_id: &str, new_id: &str) -> bool {
        if self.contains_scene(new_id) {
            return false;
        }

        match self.scene_mut(old_id) {
            Some(scene) => scene.id = new_id.to_string(),
            None => return false,
        }

        for scene in self.scenes.iter_mut() {
            for content in scene.contents.iter_mut() {
                if let ContentOrigin::Injected { from } = &mut content.origin {
                    if from == old_id {
                        *from = new_id.to_string();
                    }
                }

                for_each_directive_mut(&mut content.directives, &mut |directive| {
                    match &mut directive.kind {
                        DirectiveKind::GoTo { target } | DirectiveKind::SaveAndGo { target }
                            if target == old_id =>
                        {
                            *target = new_id.to_string();
                        }
                        _ => (),
                    }
                });
            }
        }

        true
    }

    /// Remove a scene. Navigation to it is left in place.
    pub fn delete_scene(&mut self, id: &str) -> Option<Scene> {
        let index = self.scenes.iter().position(|scene| scene.id == id)?;
        Some(self.scenes.remove(index))
    }

    /// Insert a scene at an index, or last if the index is past the end.
    ///
    /// Returns the scene back if one with the same identifier already exists.
    pub fn insert_scene(&mut self, index: usize, scene: Scene) -> Result<(), Scene> {
        if self.contains_scene(&scene.id) {
            return Err(scene);
        }

        let index = index.min(self.scenes.len());
        self.scenes.insert(index, scene);

        Ok(())
    }
}

impl Scene {
    /// The content read from the scene's own source.
    pub fn source_content(&self) -> Option<&SceneContent> {
        self.contents
            .iter()
            .find(|content| content.origin == ContentOrigin::Source)
    }

    pub fn source_content_mut(&mut self) -> Option<&mut SceneContent> {
        self.contents
            .iter_mut()
            .find(|content| content.origin == ContentOrigin::Source)
    }

    /// Narration of all contents, in order.
    pub fn narration(&self) -> String {
        self.contents
            .iter()
            .map(|content| content.narration.as_str())
            .filter(|narration| !narration.trim().is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// First reprompt among the contents.
    pub fn reprompt(&self) -> Option<&str> {
        self.contents
            .iter()
            .find_map(|content| content.reprompt.as_deref())
    }

    /// First recap among the contents.
    pub fn recap(&self) -> Option<&str> {
        self.contents
            .iter()
            .find_map(|content| content.recap.as_deref())
    }

    /// Keys of every `hear` choice in the scene, at any depth.
    pub fn choice_keys(&self) -> Vec<String> {
        self.contents
            .iter()
            .flat_map(|content| content.directives.iter())
            .flat_map(|directive| directive.walk())
            .filter_map(|directive| match &directive.kind {
                DirectiveKind::Choice(choice) => Some(choice.key()),
                _ => None,
            })
            .collect()
    }
}

impl SceneContent {
    /// Top level `hear` choices of the content.
    pub fn choices(&self) -> impl Iterator<Item = &Choice> {
        self.directives
            .iter()
            .filter_map(|directive| match &directive.kind {
                DirectiveKind::Choice(choice) => Some(choice),
                _ => None,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scene(id: &str, targets: &[&str]) -> Scene {
        let directives = targets
            .iter()
            .map(|target| Directive {
                kind: DirectiveKind::GoTo {
                    target: target.to_string(),
                },
                range: Range::default(),
            })
            .collect();

        Scene {
            id: id.to_string(),
            document: "main".to_string(),
            range: Range::default(),
            contents: vec![SceneContent {
                directives,
                ..Default::default()
            }],
        }
    }

    fn program() -> Program {
        Program {
            scenes: vec![scene("start", &["hall"]), scene("hall", &["start", "hall"])],
            metadata: Metadata::default(),
        }
    }

    #[test]
    fn renaming_a_scene_updates_every_target() {
        let mut program = program();

        assert!(program.rename_scene("hall", "corridor"));

        let targets = program
            .scenes
            .iter()
            .flat_map(|scene| scene.contents[0].directives.iter())
            .filter_map(|directive| directive.target())
            .collect::<Vec<_>>();

        assert_eq!(targets, vec!["corridor", "start", "corridor"]);
        assert_eq!(program.scene_ids().collect::<Vec<_>>(), vec!["start", "corridor"]);
    }

    #[test]
    fn renaming_onto_an_existing_scene_is_refused() {
        let mut program = program();

        assert!(!program.rename_scene("hall", "start"));
        assert!(!program.rename_scene("attic", "loft"));
        assert_eq!(program, self::program());
    }

    #[test]
    fn inserted_scenes_must_have_unique_identifiers() {
        let mut program = program();

        assert!(program.insert_scene(1, scene("attic", &[])).is_ok());
        assert!(program.insert_scene(0, scene("attic", &[])).is_err());
        assert_eq!(
            program.scene_ids().collect::<Vec<_>>(),
            vec!["start", "attic", "hall"]
        );

        assert!(program.delete_scene("attic").is_some());
        assert!(program.delete_scene("attic").is_none());
    }
}
