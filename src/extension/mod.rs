//! Passes which rewrite the content of a story after it has been read.
//!
//! Extensions run in a fixed order once the documents of a story have been compiled into
//! a program without fatal errors:
//!
//! 1. [`LocalizationExtension`]: keeps the string tables in sync and overlays translations.
//! 2. [`VoiceOverExtension`]: replaces narration lines with recordings.
//! 3. [`GlobalSceneExtension`]: injects content from `@global` scenes into every scene.
//! 4. [`SnippetExtension`]: substitutes `{{name}}` snippets.
//! 5. [`AudioTagExtension`]: rewrites `[sfx name]` tags into audio markup.
//!
//! Every extension is idempotent: running it on content which it has already extended
//! changes nothing. State which an extension needs is kept in the [`ExtensionContext`]
//! of a single compile, never in the extension itself.

mod audio;
mod global;
mod localization;
mod snippet;
mod strings;
mod voice_over;

pub use audio::AudioTagExtension;
pub use global::GlobalSceneExtension;
pub use localization::LocalizationExtension;
pub use snippet::SnippetExtension;
pub use strings::LanguageStrings;
pub use voice_over::VoiceOverExtension;

pub(crate) use global::is_global_scene;

use crate::{
    document::SourceDocument, external::AudioResolver, log::Logger, story::CompileOptions,
    story::Program,
};

use std::{collections::BTreeMap, fmt, sync::Arc};

/// Rewriting pass over the content of a story.
pub trait ImportExtension: fmt::Debug {
    /// Name of the extension, for logging.
    fn name(&self) -> &'static str;

    /// Rewrite the documents before they are read.
    fn extend_source_content(
        &self,
        _documents: &mut [SourceDocument],
        _context: &mut ExtensionContext,
    ) {
    }

    /// Rewrite the compiled program.
    fn extend_imported_content(&self, program: &mut Program, context: &mut ExtensionContext);
}

#[derive(Clone, Debug)]
/// State shared by the extensions of a single compile.
pub struct ExtensionContext {
    /// Locale to translate the story to, if any.
    pub locale: Option<String>,
    /// Locale the story is written in.
    pub source_locale: String,
    /// How translated strings are refreshed from the source.
    pub overwrite: Option<bool>,
    pub strings: LanguageStrings,
    pub snippets: BTreeMap<String, String>,
    pub audio: Arc<dyn AudioResolver>,
    /// Scenes which global scenes are not injected into.
    pub global_exceptions: Vec<String>,
    pub logger: Logger,
}

impl ExtensionContext {
    pub fn new(
        options: &CompileOptions,
        strings: LanguageStrings,
        snippets: BTreeMap<String, String>,
    ) -> Self {
        ExtensionContext {
            locale: options.locale.clone(),
            source_locale: options.source_locale.clone(),
            overwrite: options.localization_overwrite,
            strings,
            snippets,
            audio: options.audio.clone(),
            global_exceptions: options.global_exceptions.clone(),
            logger: Logger::default(),
        }
    }
}

/// Get the built-in extensions in the order they run.
pub fn default_extensions() -> Vec<Box<dyn ImportExtension>> {
    vec![
        Box::new(LocalizationExtension),
        Box::new(VoiceOverExtension),
        Box::new(GlobalSceneExtension),
        Box::new(SnippetExtension),
        Box::new(AudioTagExtension),
    ]
}

/// Find every `open ... close` span in a line and rewrite it.
///
/// The rewrite gets the trimmed text between the delimiters and returns the replacement,
/// or `None` to leave the span as it is.
pub(crate) fn rewrite_spans<F>(text: &str, open: &str, close: &str, mut rewrite: F) -> String
where
    F: FnMut(&str) -> Option<String>,
{
    let mut result = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find(open) {
        let after_open = &rest[start + open.len()..];

        let end = match after_open.find(close) {
            Some(end) => end,
            None => break,
        };

        result.push_str(&rest[..start]);

        match rewrite(after_open[..end].trim()) {
            Some(replacement) => result.push_str(&replacement),
            None => result.push_str(&rest[start..start + open.len() + end + close.len()]),
        }

        rest = &after_open[end + close.len()..];
    }

    result.push_str(rest);
    result
}

/// Audio markup for an address.
pub(crate) fn audio_tag(url: &str) -> String {
    format!("<audio src='{}'/>", url)
}
