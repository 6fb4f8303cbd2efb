//! Unlock flags granted by easter eggs.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnlockId {
    /// The glitch theme and the `restore` command.
    GlitchTheme,
    /// File-mutation commands.
    Editor,
    /// Switching CRT channels.
    Channels,
}

impl UnlockId {
    pub const ALL: [UnlockId; 3] = [Self::GlitchTheme, Self::Editor, Self::Channels];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::GlitchTheme => "glitch_theme",
            Self::Editor => "editor",
            Self::Channels => "channels",
        }
    }
}

impl fmt::Display for UnlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Granted unlocks. Grants only accumulate until a full reset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnlockSet {
    granted: BTreeSet<UnlockId>,
}

impl UnlockSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Grant `id`. Returns true when it was not already held.
    pub fn grant(&mut self, id: UnlockId) -> bool {
        let fresh = self.granted.insert(id);
        if fresh {
            log::info!("Unlocked {id}");
        }
        fresh
    }

    pub fn has(&self, id: UnlockId) -> bool {
        self.granted.contains(&id)
    }

    /// True when every unlock is held.
    pub fn is_complete(&self) -> bool {
        UnlockId::ALL.iter().all(|id| self.has(*id))
    }

    pub fn iter(&self) -> impl Iterator<Item = UnlockId> + '_ {
        self.granted.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grant_reports_freshness() {
        let mut set = UnlockSet::new();
        assert!(set.grant(UnlockId::Editor));
        assert!(!set.grant(UnlockId::Editor));
        assert!(set.has(UnlockId::Editor));
        assert!(!set.has(UnlockId::Channels));
    }

    #[test]
    fn complete_needs_all() {
        let mut set = UnlockSet::new();
        set.grant(UnlockId::Editor);
        set.grant(UnlockId::Channels);
        assert!(!set.is_complete());
        set.grant(UnlockId::GlitchTheme);
        assert!(set.is_complete());
    }

    #[test]
    fn serializes_as_plain_list() {
        let mut set = UnlockSet::new();
        set.grant(UnlockId::GlitchTheme);
        set.grant(UnlockId::Editor);
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, r#"["glitch_theme","editor"]"#);
        let back: UnlockSet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, set);
    }
}
