//! Translation of scene text and utterances.

use crate::{
    directive::{directive::for_each_directive_mut, normalize_utterance, DirectiveKind},
    extension::{ExtensionContext, ImportExtension},
    log::Warning,
    story::{ContentOrigin, Program},
};

use std::collections::BTreeMap;

use tracing::debug;

#[derive(Clone, Copy, Debug, Default)]
/// Keeps the string tables of a story in sync with its source and overlays a translation.
///
/// Every compile writes the text of the story into the source locale of the string table.
/// Keys which have disappeared from the source are removed from every locale and keys
/// which are new get empty entries in the other locales, ready to be translated. How
/// entries that already exist are refreshed is set by the `overwrite` option:
///
/// * `Some(true)`: every entry is refreshed from the source text.
/// * `Some(false)`: entries are never touched, and removed entries come back empty.
/// * `None`: edited entries are kept but removed entries are refilled from the source.
///
/// If a target locale is set and differs from the source locale, text with a non-empty
/// translation is replaced by it. Once a program has been translated, running the
/// extension again does nothing.
pub struct LocalizationExtension;

impl ImportExtension for LocalizationExtension {
    fn name(&self) -> &'static str {
        "localization"
    }

    fn extend_imported_content(&self, program: &mut Program, context: &mut ExtensionContext) {
        if context.locale.is_some() && program.metadata.locale == context.locale {
            debug!(locale = ?context.locale, "story is already localized");
            return;
        }

        let source = collect_source_strings(program);
        sync_strings(&source, context);

        if let Some(target) = context.locale.clone() {
            if target != context.source_locale {
                apply_translation(program, &target, context);
            }

            program.metadata.locale = Some(target);
        }
    }
}

fn text_key(scene: &str, field: &str) -> String {
    format!("{}.{}", scene, field)
}

fn utterance_key(utterance: &str) -> String {
    format!("utterance-{}", normalize_utterance(utterance))
}

/// Get every translatable string of a program by its key.
fn collect_source_strings(program: &Program) -> BTreeMap<String, String> {
    let mut strings = BTreeMap::new();

    for scene in program.scenes.iter() {
        let content = match scene.source_content() {
            Some(content) => content,
            None => continue,
        };

        if !content.narration.is_empty() {
            strings.insert(text_key(&scene.id, "narration"), content.narration.clone());
        }

        if let Some(reprompt) = &content.reprompt {
            strings.insert(text_key(&scene.id, "reprompt"), reprompt.clone());
        }

        if let Some(recap) = &content.recap {
            strings.insert(text_key(&scene.id, "recap"), recap.clone());
        }

        for directive in content.directives.iter().flat_map(|d| d.walk()) {
            if let DirectiveKind::Choice(choice) = &directive.kind {
                for utterance in choice.utterances.iter() {
                    strings.insert(utterance_key(utterance), normalize_utterance(utterance));
                }
            }
        }
    }

    strings
}

fn sync_strings(source: &BTreeMap<String, String>, context: &mut ExtensionContext) {
    let source_locale = context.source_locale.clone();

    let previous = context
        .strings
        .locale(&source_locale)
        .cloned()
        .unwrap_or_default();

    *context.strings.locale_mut(&source_locale) = source.clone();

    let mut locales = context
        .strings
        .locales()
        .filter(|locale| *locale != source_locale)
        .map(|locale| locale.to_string())
        .collect::<Vec<_>>();

    if let Some(target) = &context.locale {
        if *target != source_locale && !locales.contains(target) {
            locales.push(target.clone());
        }
    }

    let overwrite = context.overwrite;

    for locale in locales {
        let strings = context.strings.locale_mut(&locale);

        strings.retain(|key, _| source.contains_key(key));

        for (key, text) in source.iter() {
            let was_known = previous.contains_key(key);

            let update = match strings.get(key) {
                Some(_) if overwrite == Some(true) => Some(text.clone()),
                Some(_) => None,
                None if overwrite == Some(false) || !was_known => Some(String::new()),
                None => Some(text.clone()),
            };

            if let Some(value) = update {
                strings.insert(key.clone(), value);
            }
        }
    }
}

fn apply_translation(program: &mut Program, locale: &str, context: &mut ExtensionContext) {
    let strings = context.strings.locale(locale).cloned().unwrap_or_default();
    let logger = &mut context.logger;

    let translation = |key: &str| {
        strings
            .get(key)
            .filter(|text| !text.trim().is_empty())
            .cloned()
    };

    for scene in program.scenes.iter_mut() {
        let (id, document, position) = (scene.id.clone(), scene.document.clone(), scene.range.start);

        let mut missing = Vec::new();

        for content in scene.contents.iter_mut() {
            if content.origin != ContentOrigin::Source {
                continue;
            }

            if !content.narration.is_empty() {
                let key = text_key(&id, "narration");

                match translation(&key) {
                    Some(text) => content.narration = text,
                    None => missing.push(key),
                }
            }

            for (field, text) in vec![
                ("reprompt", &mut content.reprompt),
                ("recap", &mut content.recap),
            ] {
                if let Some(text) = text {
                    let key = text_key(&id, field);

                    match translation(&key) {
                        Some(translated) => *text = translated,
                        None => missing.push(key),
                    }
                }
            }

            for_each_directive_mut(&mut content.directives, &mut |directive| {
                if let DirectiveKind::Choice(choice) = &mut directive.kind {
                    for utterance in choice.utterances.iter_mut() {
                        let key = utterance_key(utterance);

                        match translation(&key) {
                            Some(translated) => *utterance = translated,
                            None => missing.push(key),
                        }
                    }
                }
            });
        }

        for key in missing {
            logger.add_warning(
                Warning::MissingTranslation {
                    key,
                    locale: locale.to_string(),
                },
                Some(&document),
                Some(position),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        extension::LanguageStrings,
        story::{compile, CompileInput, CompileOptions},
        SourceDocument,
    };

    const STORY: &str = "\
@start
*say
    Welcome.
*reprompt
    Are you there?
*then
    hear yes, sure {
        >> END
    }
";

    fn options(locale: Option<&str>, overwrite: Option<bool>) -> CompileOptions {
        CompileOptions {
            locale: locale.map(|s| s.to_string()),
            localization_overwrite: overwrite,
            ..Default::default()
        }
    }

    fn compile_with(text: &str, strings: LanguageStrings, options: &CompileOptions) -> (Program, LanguageStrings) {
        let input = CompileInput {
            documents: vec![SourceDocument::from_text("main", text)],
            strings,
            ..Default::default()
        };

        let output = compile(&input, options);

        (output.program.unwrap(), output.strings)
    }

    #[test]
    fn source_strings_are_written_to_the_source_locale() {
        let (_, strings) = compile_with(STORY, LanguageStrings::new(), &options(None, None));

        assert_eq!(strings.get("en-US", "start.narration"), Some("Welcome."));
        assert_eq!(strings.get("en-US", "start.reprompt"), Some("Are you there?"));
        assert_eq!(strings.get("en-US", "utterance-sure"), Some("sure"));
        assert_eq!(strings.get("en-US", "start.recap"), None);
    }

    #[test]
    fn new_keys_get_empty_entries_in_the_target_locale() {
        let (program, strings) =
            compile_with(STORY, LanguageStrings::new(), &options(Some("de-DE"), None));

        assert_eq!(strings.get("de-DE", "start.narration"), Some(""));
        assert_eq!(program.scenes[0].contents[0].narration, "Welcome.");
        assert_eq!(program.metadata.locale.as_deref(), Some("de-DE"));
    }

    #[test]
    fn translations_replace_text_and_utterances() {
        let mut strings = LanguageStrings::new();
        strings.insert("en-US", "start.narration", "Welcome.");
        strings.insert("de-DE", "start.narration", "Willkommen.");
        strings.insert("de-DE", "utterance-yes", "ja");

        let (program, _) = compile_with(STORY, strings, &options(Some("de-DE"), None));
        let content = &program.scenes[0].contents[0];

        assert_eq!(content.narration, "Willkommen.");
        assert_eq!(content.reprompt.as_deref(), Some("Are you there?"));
        assert_eq!(
            content.choices().next().unwrap().utterances,
            vec!["ja".to_string(), "sure".to_string()]
        );
    }

    #[test]
    fn removed_keys_are_collected_from_every_locale() {
        let mut strings = LanguageStrings::new();
        strings.insert("en-US", "hall.narration", "A hall.");
        strings.insert("de-DE", "hall.narration", "Ein Flur.");

        let (_, strings) = compile_with(STORY, strings, &options(None, None));

        assert_eq!(strings.get("en-US", "hall.narration"), None);
        assert_eq!(strings.get("de-DE", "hall.narration"), None);
    }

    #[test]
    fn overwrite_modes_decide_how_entries_are_refreshed() {
        let mut strings = LanguageStrings::new();
        strings.insert("en-US", "start.narration", "Welcome.");
        strings.insert("en-US", "start.reprompt", "Are you there?");
        strings.insert("de-DE", "start.narration", "Willkommen.");

        let (_, refreshed) = compile_with(STORY, strings.clone(), &options(None, Some(true)));
        assert_eq!(refreshed.get("de-DE", "start.narration"), Some("Welcome."));
        assert_eq!(refreshed.get("de-DE", "start.reprompt"), Some("Are you there?"));

        let (_, untouched) = compile_with(STORY, strings.clone(), &options(None, Some(false)));
        assert_eq!(untouched.get("de-DE", "start.narration"), Some("Willkommen."));
        assert_eq!(untouched.get("de-DE", "start.reprompt"), Some(""));

        let (_, refilled) = compile_with(STORY, strings, &options(None, None));
        assert_eq!(refilled.get("de-DE", "start.narration"), Some("Willkommen."));
        assert_eq!(refilled.get("de-DE", "start.reprompt"), Some("Are you there?"));
    }

    #[test]
    fn localizing_twice_is_the_same_as_once() {
        let mut strings = LanguageStrings::new();
        strings.insert("de-DE", "start.narration", "Willkommen.");

        let options = options(Some("de-DE"), None);
        let (mut program, strings) = compile_with(STORY, strings, &options);
        let once = program.clone();

        let mut context = ExtensionContext::new(&options, strings, Default::default());
        LocalizationExtension.extend_imported_content(&mut program, &mut context);

        assert_eq!(program, once);
    }
}
