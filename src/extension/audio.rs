//! Rewriting of sound effect tags.

use crate::{
    extension::{audio_tag, rewrite_spans, ExtensionContext, ImportExtension},
    log::Warning,
    story::Program,
};

/// Opening of a sound effect tag, closed by `]`.
const SFX_TAG_BEGIN: &str = "[sfx ";
const SFX_TAG_END: &str = "]";

#[derive(Clone, Copy, Debug, Default)]
/// Rewrites `[sfx name]` tags in scene text into audio markup.
///
/// Tags which name audio that the resolver does not know are left in the text and logged.
pub struct AudioTagExtension;

impl ImportExtension for AudioTagExtension {
    fn name(&self) -> &'static str {
        "audio-tags"
    }

    fn extend_imported_content(&self, program: &mut Program, context: &mut ExtensionContext) {
        let audio = context.audio.clone();

        for scene in program.scenes.iter_mut() {
            let mut missing = Vec::new();

            let mut rewrite = |text: &str| {
                rewrite_spans(text, SFX_TAG_BEGIN, SFX_TAG_END, |name| {
                    match audio.get_url(name) {
                        Some(url) if audio.exists(name) => Some(audio_tag(&url)),
                        _ => {
                            missing.push(name.to_string());
                            None
                        }
                    }
                })
            };

            for content in scene.contents.iter_mut() {
                content.narration = rewrite(&content.narration);

                for text in content.reprompt.iter_mut().chain(content.recap.iter_mut()) {
                    *text = rewrite(text);
                }
            }

            for name in missing {
                context.logger.add_warning(
                    Warning::MissingAudio { name },
                    Some(&scene.document),
                    Some(scene.range.start),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        external::AudioLibrary,
        log::MessageKind,
        story::{compile, CompileInput, CompileOptions},
        SourceDocument,
    };

    use std::sync::Arc;

    #[test]
    fn known_sound_effects_become_audio_and_unknown_ones_are_logged() {
        let options = CompileOptions {
            audio: Arc::new(AudioLibrary::new().with("door", "https://cdn/door.mp3")),
            ..Default::default()
        };

        let input = CompileInput {
            documents: vec![SourceDocument::from_text(
                "main",
                "@start\n*say\n    [sfx door] Someone knocks. [sfx bell]\n",
            )],
            ..Default::default()
        };

        let output = compile(&input, &options);

        assert_eq!(
            output.program.unwrap().scenes[0].contents[0].narration,
            "<audio src='https://cdn/door.mp3'/> Someone knocks. [sfx bell]"
        );

        assert!(output.log.warnings.iter().any(|message| message.message
            == MessageKind::Warning(Warning::MissingAudio {
                name: "bell".to_string()
            })));
    }

    #[test]
    fn rewriting_twice_is_the_same_as_once() {
        let options = CompileOptions {
            audio: Arc::new(AudioLibrary::new().with("door", "https://cdn/door.mp3")),
            ..Default::default()
        };

        let input = CompileInput {
            documents: vec![SourceDocument::from_text(
                "main",
                "@start\n*say\n    [sfx door] Knock. [sfx bell]\n*recap\n    [sfx door] Again.\n",
            )],
            ..Default::default()
        };

        let mut program = compile(&input, &options).program.unwrap();
        let once = program.clone();

        let mut context = ExtensionContext::new(&options, Default::default(), Default::default());
        AudioTagExtension.extend_imported_content(&mut program, &mut context);

        assert_eq!(program, once);
        assert_eq!(
            context.logger.warnings[0].message,
            MessageKind::Warning(Warning::MissingAudio {
                name: "bell".to_string()
            })
        );
    }
}
