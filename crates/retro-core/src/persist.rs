//! Mapping between session state and persisted key-value records.

use retro_types::config::{FontSize, Preferences};
use retro_types::error::Result;
use retro_types::storage::{self, KeyValueStore, keys};
use retro_vfs::OverlayStore;

/// Keys cleared by a full progress reset. Preferences are rewritten to
/// their defaults instead.
pub const RESET_KEYS: [&str; 4] = [
    keys::ACHIEVEMENTS,
    keys::UNLOCKS,
    keys::USER_FILES,
    keys::CELEBRATION_SHOWN,
];

/// Stored preferences, falling back per field to defaults.
pub fn load_preferences(store: &dyn KeyValueStore) -> Preferences {
    let defaults = Preferences::default();
    Preferences {
        theme: storage::load_json(store, keys::THEME).unwrap_or(defaults.theme),
        font_size: storage::load_json::<FontSize>(store, keys::FONT_SIZE)
            .unwrap_or(defaults.font_size),
        sound_enabled: storage::load_json(store, keys::SOUND).unwrap_or(defaults.sound_enabled),
    }
}

pub fn preference_records(prefs: &Preferences) -> Result<Vec<(&'static str, String)>> {
    Ok(vec![
        (keys::THEME, serde_json::to_string(&prefs.theme)?),
        (keys::FONT_SIZE, serde_json::to_string(&prefs.font_size)?),
        (keys::SOUND, serde_json::to_string(&prefs.sound_enabled)?),
    ])
}

/// Persisted user files as an overlay. Corrupt data yields an empty one.
pub fn load_overlay(store: &dyn KeyValueStore) -> OverlayStore {
    let entries: Vec<(String, String)> =
        storage::load_json(store, keys::USER_FILES).unwrap_or_default();
    OverlayStore::from_entries(entries)
}

pub fn overlay_record(overlay: &OverlayStore) -> Result<(&'static str, String)> {
    Ok((keys::USER_FILES, serde_json::to_string(&overlay.entries())?))
}

/// Clear progress and user files and restore default preferences in one
/// `apply`.
pub fn reset_all(store: &mut dyn KeyValueStore) -> Result<()> {
    let writes = preference_records(&Preferences::default())?;
    store.apply(&writes, &RESET_KEYS)
}
