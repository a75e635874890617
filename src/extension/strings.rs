//! Tables of translatable strings.

use std::collections::BTreeMap;

#[cfg(feature = "serde_support")]
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde_support", derive(Deserialize, Serialize))]
#[cfg_attr(feature = "serde_support", serde(transparent))]
/// Strings of a story by locale, then by key.
///
/// Keys are `<scene>.narration`, `<scene>.reprompt`, `<scene>.recap` for scene text and
/// `utterance-<utterance>` for normalised utterances of choices.
///
/// # Examples
/// ```
/// # use sceneflow::LanguageStrings;
/// let mut strings = LanguageStrings::new();
/// strings.insert("de-DE", "start.narration", "Hallo");
///
/// assert_eq!(strings.get("de-DE", "start.narration"), Some("Hallo"));
/// assert_eq!(strings.get("fr-FR", "start.narration"), None);
/// ```
pub struct LanguageStrings {
    locales: BTreeMap<String, BTreeMap<String, String>>,
}

impl LanguageStrings {
    pub fn new() -> Self {
        LanguageStrings::default()
    }

    pub fn get(&self, locale: &str, key: &str) -> Option<&str> {
        self.locales
            .get(locale)
            .and_then(|strings| strings.get(key))
            .map(|value| value.as_str())
    }

    /// Set a string, creating the locale if needed.
    pub fn insert(&mut self, locale: &str, key: &str, value: &str) {
        self.locale_mut(locale)
            .insert(key.to_string(), value.to_string());
    }

    pub fn remove(&mut self, locale: &str, key: &str) -> Option<String> {
        self.locales
            .get_mut(locale)
            .and_then(|strings| strings.remove(key))
    }

    /// Strings of a single locale.
    pub fn locale(&self, locale: &str) -> Option<&BTreeMap<String, String>> {
        self.locales.get(locale)
    }

    pub(crate) fn locale_mut(&mut self, locale: &str) -> &mut BTreeMap<String, String> {
        self.locales.entry(locale.to_string()).or_default()
    }

    /// Names of all locales with strings.
    pub fn locales(&self) -> impl Iterator<Item = &str> {
        self.locales.keys().map(|locale| locale.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.locales.values().all(|strings| strings.is_empty())
    }
}

impl From<BTreeMap<String, BTreeMap<String, String>>> for LanguageStrings {
    fn from(locales: BTreeMap<String, BTreeMap<String, String>>) -> Self {
        LanguageStrings { locales }
    }
}
