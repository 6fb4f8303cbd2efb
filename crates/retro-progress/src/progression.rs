//! Persisted progression: achievement state, unlocks and one-shot flags.

use std::collections::BTreeSet;

use retro_types::error::Result;
use retro_types::storage::{self, KeyValueStore, keys};

use crate::achievements::{
    Achievement, AchievementId, AchievementState, check_new_achievements, full_completion_state,
    is_fully_unlocked, unlocked_ids,
};
use crate::unlocks::{UnlockId, UnlockSet};

#[derive(Debug, Clone, Default)]
pub struct Progression {
    pub state: AchievementState,
    pub unlocks: UnlockSet,
    /// Achievements already notified, so each is reported at most once.
    announced: BTreeSet<AchievementId>,
    celebration_shown: bool,
}

impl Progression {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore from `store`. Missing or corrupt records start fresh.
    ///
    /// Achievements satisfied by the restored state count as announced.
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let state: AchievementState =
            storage::load_json(store, keys::ACHIEVEMENTS).unwrap_or_default();
        let unlocks: UnlockSet = storage::load_json(store, keys::UNLOCKS).unwrap_or_default();
        let celebration_shown =
            storage::load_json::<bool>(store, keys::CELEBRATION_SHOWN).unwrap_or(false);
        let announced = unlocked_ids(&state).into_iter().collect();
        log::debug!(
            "Loaded progression: {} commands, {} unlocks",
            state.total_commands,
            unlocks.iter().count()
        );
        Self {
            state,
            unlocks,
            announced,
            celebration_shown,
        }
    }

    /// Serialized records, keyed for `KeyValueStore::apply`.
    pub fn records(&self) -> Result<Vec<(&'static str, String)>> {
        Ok(vec![
            (keys::ACHIEVEMENTS, serde_json::to_string(&self.state)?),
            (keys::UNLOCKS, serde_json::to_string(&self.unlocks)?),
            (
                keys::CELEBRATION_SHOWN,
                serde_json::to_string(&self.celebration_shown)?,
            ),
        ])
    }

    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<()> {
        let records = self.records()?;
        store.apply(&records, &[])
    }

    /// Achievements newly satisfied since the last poll, in table order.
    pub fn poll_new_achievements(&mut self) -> Vec<&'static Achievement> {
        let fresh = check_new_achievements(&self.announced, &self.state);
        self.announced.extend(fresh.iter().map(|a| a.id));
        fresh
    }

    pub fn is_fully_unlocked(&self) -> bool {
        is_fully_unlocked(&self.state)
    }

    pub fn has(&self, id: UnlockId) -> bool {
        self.unlocks.has(id)
    }

    pub fn grant(&mut self, id: UnlockId) -> bool {
        self.unlocks.grant(id)
    }

    /// True exactly once: the first time full completion is observed.
    pub fn take_celebration(&mut self) -> bool {
        if self.celebration_shown || !self.is_fully_unlocked() {
            return false;
        }
        self.celebration_shown = true;
        true
    }

    /// Merge the full-completion state and grant every unlock.
    ///
    /// Returns false when nothing was missing.
    pub fn unlock_all(&mut self) -> bool {
        if self.is_fully_unlocked() && self.unlocks.is_complete() {
            return false;
        }
        self.state.merge(&full_completion_state());
        for id in UnlockId::ALL {
            self.unlocks.grant(id);
        }
        true
    }

    /// Forget everything, including announcements and the celebration flag.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
