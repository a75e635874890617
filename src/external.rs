//! Collaborators which live outside of the compiler and driver.
//!
//! Audio lookup and session persistence belong to the hosting platform. The traits here are
//! what the crate needs from them, along with in-memory implementations for tools and tests.

use crate::runtime::SessionState;

use std::{collections::HashMap, fmt};

/// Lookup of audio files by name.
///
/// Used at compile time to substitute voice-over recordings for narration and to rewrite
/// `[sfx name]` tags into audio markup.
pub trait AudioResolver: fmt::Debug + Send + Sync {
    /// Whether audio with the name exists.
    fn exists(&self, name: &str) -> bool;

    /// Address of the audio with the name.
    fn get_url(&self, name: &str) -> Option<String>;
}

#[derive(Clone, Copy, Debug, Default)]
/// Resolver which knows no audio at all.
pub struct NoAudio;

impl AudioResolver for NoAudio {
    fn exists(&self, _: &str) -> bool {
        false
    }

    fn get_url(&self, _: &str) -> Option<String> {
        None
    }
}

#[derive(Clone, Debug, Default)]
/// Resolver backed by a map from names to addresses.
///
/// # Examples
/// ```
/// # use sceneflow::{AudioLibrary, AudioResolver};
/// let library = AudioLibrary::new().with("thunder", "https://cdn.example.com/thunder.mp3");
///
/// assert!(library.exists("thunder"));
/// assert!(!library.exists("rain"));
/// ```
pub struct AudioLibrary {
    files: HashMap<String, String>,
}

impl AudioLibrary {
    pub fn new() -> Self {
        AudioLibrary::default()
    }

    /// Add an audio file to the library.
    pub fn with(mut self, name: &str, url: &str) -> Self {
        self.insert(name, url);
        self
    }

    pub fn insert(&mut self, name: &str, url: &str) {
        self.files.insert(name.to_string(), url.to_string());
    }
}

impl AudioResolver for AudioLibrary {
    fn exists(&self, name: &str) -> bool {
        self.files.contains_key(name)
    }

    fn get_url(&self, name: &str) -> Option<String> {
        self.files.get(name).cloned()
    }
}

/// Persistence of session states, keyed by an opaque session identifier.
///
/// The driver never touches the store: the caller loads the state before a turn and
/// commits the returned state after it.
pub trait SessionStore {
    fn get(&self, session_id: &str) -> Option<SessionState>;

    fn set(&mut self, session_id: &str, state: SessionState);
}

#[derive(Clone, Debug, Default)]
/// Session store which keeps states in memory.
pub struct MemoryStore {
    sessions: HashMap<String, SessionState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }
}

impl SessionStore for MemoryStore {
    fn get(&self, session_id: &str) -> Option<SessionState> {
        self.sessions.get(session_id).cloned()
    }

    fn set(&mut self, session_id: &str, state: SessionState) {
        self.sessions.insert(session_id.to_string(), state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_keeps_sessions_apart() {
        let mut store = MemoryStore::new();

        let mut state = SessionState::default();
        state.turns = 3;

        store.set("alice", state.clone());

        assert_eq!(store.get("alice"), Some(state));
        assert_eq!(store.get("bob"), None);
    }

    #[test]
    fn no_audio_knows_nothing() {
        assert!(!NoAudio.exists("anything"));
        assert_eq!(NoAudio.get_url("anything"), None);
    }
}
