//! Injection of content from global scenes into every other scene.

use crate::{
    consts::GLOBAL_SCENE_PREFIX,
    directive::DirectiveKind,
    extension::{ExtensionContext, ImportExtension},
    story::{ContentOrigin, Program, SceneContent},
};

use tracing::debug;

#[derive(Clone, Copy, Debug, PartialEq)]
/// Where the content of a global scene goes in the scenes it is injected into.
enum Placement {
    /// Before the scene's own content.
    Prepend,
    /// After the scene's own content.
    Postpend,
    /// Only the `hear` choices, after the scene's own content.
    Append,
}

/// Get the placement of a global scene from its identifier, or `None` if it is not global.
fn placement(id: &str) -> Option<Placement> {
    if id == GLOBAL_SCENE_PREFIX {
        return Some(Placement::Append);
    }

    let mode = id.strip_prefix(GLOBAL_SCENE_PREFIX)?.strip_prefix(' ')?.trim();

    match mode {
        "prepend" => Some(Placement::Prepend),
        "postpend" => Some(Placement::Postpend),
        "append" => Some(Placement::Append),
        _ => None,
    }
}

/// Whether a scene is a global scene.
pub(crate) fn is_global_scene(id: &str) -> bool {
    placement(id).is_some()
}

#[derive(Clone, Copy, Debug, Default)]
/// Injects the content of `@global` scenes into every other scene.
///
/// * `@global prepend`: the content is run before the scene's own content.
/// * `@global postpend`: the content is run after it.
/// * `@global append` or `@global`: only the `hear` choices are added, so that they can be
///   heard in every scene. Choices with the same utterances as one which the scene already
///   has are not added.
///
/// Global scenes and scenes listed as exceptions are left alone. Previously injected content
/// is removed before injecting again.
pub struct GlobalSceneExtension;

impl ImportExtension for GlobalSceneExtension {
    fn name(&self) -> &'static str {
        "global-scenes"
    }

    fn extend_imported_content(&self, program: &mut Program, context: &mut ExtensionContext) {
        for scene in program.scenes.iter_mut() {
            scene
                .contents
                .retain(|content| content.origin == ContentOrigin::Source);
        }

        let globals = program
            .scenes
            .iter()
            .filter_map(|scene| {
                let placement = placement(&scene.id)?;
                let content = scene.source_content()?.clone();

                Some((scene.id.clone(), placement, content))
            })
            .collect::<Vec<_>>();

        if globals.is_empty() {
            return;
        }

        for scene in program.scenes.iter_mut() {
            if is_global_scene(&scene.id) || context.global_exceptions.contains(&scene.id) {
                continue;
            }

            let mut prepended = Vec::new();

            for (from, placement, content) in globals.iter() {
                let origin = ContentOrigin::Injected { from: from.clone() };

                match placement {
                    Placement::Prepend => prepended.push(SceneContent {
                        origin,
                        ..content.clone()
                    }),
                    Placement::Postpend => scene.contents.push(SceneContent {
                        origin,
                        ..content.clone()
                    }),
                    Placement::Append => {
                        let mut existing = scene.choice_keys();

                        let directives = content
                            .directives
                            .iter()
                            .filter(|directive| match &directive.kind {
                                DirectiveKind::Choice(choice) => {
                                    let key = choice.key();

                                    if existing.contains(&key) {
                                        false
                                    } else {
                                        existing.push(key);
                                        true
                                    }
                                }
                                _ => false,
                            })
                            .cloned()
                            .collect::<Vec<_>>();

                        if !directives.is_empty() {
                            scene.contents.push(SceneContent {
                                directives,
                                origin,
                                ..Default::default()
                            });
                        }
                    }
                }
            }

            debug!(
                scene = %scene.id,
                contents = scene.contents.len() + prepended.len(),
                "injected global content"
            );

            prepended.extend(scene.contents.drain(..));
            scene.contents = prepended;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        story::{compile, CompileInput, CompileOptions},
        SourceDocument,
    };

    const STORY: &str = "\
@start
*say
    The hall.
*then
    hear help, assist {
        -> start
    }

@global prepend
*say
    Welcome back.

@global postpend
*then
    set seen = true

@global
*then
    hear assist, help {
        -> start
    }
    hear quit {
        >> END
    }

@attic
*say
    Dust.
";

    fn compile_story(options: &CompileOptions) -> Program {
        let input = CompileInput {
            documents: vec![SourceDocument::from_text("main", STORY)],
            ..Default::default()
        };

        compile(&input, options).program.unwrap()
    }

    #[test]
    fn global_scenes_are_recognised_by_their_placement() {
        assert_eq!(placement("global"), Some(Placement::Append));
        assert_eq!(placement("global prepend"), Some(Placement::Prepend));
        assert_eq!(placement("global postpend"), Some(Placement::Postpend));
        assert_eq!(placement("global append"), Some(Placement::Append));
        assert_eq!(placement("globals"), None);
        assert_eq!(placement("global warming"), None);
    }

    #[test]
    fn content_is_injected_around_the_source_content() {
        let program = compile_story(&CompileOptions::default());
        let start = program.scene("start").unwrap();

        let origins = start
            .contents
            .iter()
            .map(|content| content.origin.clone())
            .collect::<Vec<_>>();

        assert_eq!(
            origins,
            vec![
                ContentOrigin::Injected {
                    from: "global prepend".to_string()
                },
                ContentOrigin::Source,
                ContentOrigin::Injected {
                    from: "global postpend".to_string()
                },
                ContentOrigin::Injected {
                    from: "global".to_string()
                },
            ]
        );

        assert_eq!(start.narration(), "Welcome back.\nThe hall.");
    }

    #[test]
    fn appended_choices_already_in_the_scene_are_skipped() {
        let program = compile_story(&CompileOptions::default());
        let start = program.scene("start").unwrap();

        let mut keys = start.choice_keys();
        keys.sort();

        assert_eq!(keys, vec!["assist,help".to_string(), "quit".to_string()]);
    }

    #[test]
    fn global_scenes_and_exceptions_are_left_alone() {
        let options = CompileOptions {
            global_exceptions: vec!["attic".to_string()],
            ..Default::default()
        };

        let program = compile_story(&options);

        assert_eq!(program.scene("attic").unwrap().contents.len(), 1);
        assert_eq!(program.scene("global").unwrap().contents.len(), 1);
    }

    #[test]
    fn injecting_twice_is_the_same_as_once() {
        let options = CompileOptions::default();

        let mut program = compile_story(&options);
        let once = program.clone();

        let mut context = ExtensionContext::new(&options, Default::default(), Default::default());
        GlobalSceneExtension.extend_imported_content(&mut program, &mut context);

        assert_eq!(program, once);
    }
}
