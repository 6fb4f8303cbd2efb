//! Key-value storage abstraction for persisted session state.
//!
//! The shell never touches a storage backend directly: callers hand a
//! `KeyValueStore` to the session, and every persisted record is written as
//! a JSON string under one of the namespaced keys in [`keys`].

use std::collections::BTreeMap;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::Result;

/// Persisted key names.
pub mod keys {
    pub const ACHIEVEMENTS: &str = "retroterm.achievements";
    pub const UNLOCKS: &str = "retroterm.unlocks";
    pub const USER_FILES: &str = "retroterm.user_files";
    pub const THEME: &str = "retroterm.theme";
    pub const FONT_SIZE: &str = "retroterm.font_size";
    pub const SOUND: &str = "retroterm.sound";
    pub const CELEBRATION_SHOWN: &str = "retroterm.celebration_shown";

    /// Every persisted key.
    pub const ALL: [&str; 7] = [
        ACHIEVEMENTS,
        UNLOCKS,
        USER_FILES,
        THEME,
        FONT_SIZE,
        SOUND,
        CELEBRATION_SHOWN,
    ];
}

/// A string-keyed, string-valued persistent store.
pub trait KeyValueStore {
    /// Read a raw value.
    fn get(&self, key: &str) -> Option<String>;

    /// Write a raw value, replacing any previous one.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Remove a key. Removing an absent key is not an error.
    fn remove(&mut self, key: &str) -> Result<()>;

    /// Write several keys and remove others as one unit.
    ///
    /// The default implementation applies the operations in order; backends
    /// with a flush step should override it to flush once at the end.
    fn apply(&mut self, writes: &[(&str, String)], removals: &[&str]) -> Result<()> {
        for key in removals {
            self.remove(key)?;
        }
        for (key, value) in writes {
            self.set(key, value)?;
        }
        Ok(())
    }
}

/// Deserialize the JSON value under `key`.
///
/// Returns `None` when the key is absent or the stored value is corrupt;
/// corruption is logged rather than surfaced so a bad record never blocks a
/// session from starting.
pub fn load_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Option<T> {
    let raw = store.get(key)?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("Ignoring corrupt persisted value for {key}: {e}");
            None
        },
    }
}

/// Serialize `value` as JSON under `key`.
pub fn save_json<T: Serialize + ?Sized>(
    store: &mut dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<()> {
    let json = serde_json::to_string(value)?;
    store.set(key, &json)
}

/// Volatile in-memory store, used by tests and ephemeral sessions.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over stored pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl FromIterator<(String, String)> for MemoryStore {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_get_remove() {
        let mut store = MemoryStore::new();
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").as_deref(), Some("v"));
        store.remove("k").unwrap();
        assert!(store.get("k").is_none());
    }

    #[test]
    fn remove_absent_is_ok() {
        let mut store = MemoryStore::new();
        assert!(store.remove("ghost").is_ok());
    }

    #[test]
    fn json_helpers() {
        let mut store = MemoryStore::new();
        save_json(&mut store, keys::UNLOCKS, &vec!["editor"]).unwrap();
        let back: Vec<String> = load_json(&store, keys::UNLOCKS).unwrap();
        assert_eq!(back, vec!["editor".to_string()]);
    }

    #[test]
    fn corrupt_json_loads_as_none() {
        let mut store = MemoryStore::new();
        store.set(keys::ACHIEVEMENTS, "{not json").unwrap();
        let loaded: Option<Vec<String>> = load_json(&store, keys::ACHIEVEMENTS);
        assert!(loaded.is_none());
    }

    #[test]
    fn apply_removes_then_writes() {
        let mut store = MemoryStore::new();
        store.set("a", "1").unwrap();
        store.set("b", "2").unwrap();
        store
            .apply(&[("a", "fresh".to_string())], &["a", "b"])
            .unwrap();
        assert_eq!(store.get("a").as_deref(), Some("fresh"));
        assert!(store.get("b").is_none());
    }

    #[test]
    fn keys_are_namespaced() {
        for key in keys::ALL {
            assert!(key.starts_with("retroterm."), "{key}");
        }
    }
}
