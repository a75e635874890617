//! Substitution of recorded voice-overs for narration.

use crate::{
    extension::{audio_tag, ExtensionContext, ImportExtension},
    story::{ContentOrigin, Program},
};

#[derive(Clone, Copy, Debug, Default)]
/// Replaces narration lines with recordings of them.
///
/// The recording of line `n` (counting from 1) of the narration of scene `id` is named
/// `id-n`. If the audio resolver knows it, the line is replaced by an audio tag.
pub struct VoiceOverExtension;

impl ImportExtension for VoiceOverExtension {
    fn name(&self) -> &'static str {
        "voice-over"
    }

    fn extend_imported_content(&self, program: &mut Program, context: &mut ExtensionContext) {
        for scene in program.scenes.iter_mut() {
            let id = scene.id.clone();

            for content in scene.contents.iter_mut() {
                if content.origin != ContentOrigin::Source || content.narration.is_empty() {
                    continue;
                }

                content.narration = content
                    .narration
                    .lines()
                    .enumerate()
                    .map(|(i, line)| {
                        if line.trim_start().starts_with("<audio") {
                            return line.to_string();
                        }

                        let name = format!("{}-{}", id, i + 1);

                        match context.audio.get_url(&name) {
                            Some(url) if context.audio.exists(&name) => audio_tag(&url),
                            _ => line.to_string(),
                        }
                    })
                    .collect::<Vec<_>>()
                    .join("\n");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        external::AudioLibrary,
        story::{compile, CompileInput, CompileOptions},
        SourceDocument,
    };

    use std::sync::Arc;

    #[test]
    fn recorded_lines_are_replaced_by_audio() {
        let options = CompileOptions {
            audio: Arc::new(AudioLibrary::new().with("start-2", "https://cdn/start-2.mp3")),
            ..Default::default()
        };

        let input = CompileInput {
            documents: vec![SourceDocument::from_text(
                "main",
                "@start\n*say\n    First line.\n    Second line.\n",
            )],
            ..Default::default()
        };

        let mut program = compile(&input, &options).program.unwrap();

        assert_eq!(
            program.scenes[0].contents[0].narration,
            "First line.\n<audio src='https://cdn/start-2.mp3'/>"
        );

        let once = program.clone();
        let mut context = ExtensionContext::new(&options, Default::default(), Default::default());
        VoiceOverExtension.extend_imported_content(&mut program, &mut context);

        assert_eq!(program, once);
    }
}
