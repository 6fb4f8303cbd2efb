//! Progression for the RETROTERM shell.
//!
//! Tracks what the visitor has done, derives achievements from it, and
//! holds the unlock flags that gate commands, themes and channels.

pub mod achievements;
pub mod progression;
pub mod unlocks;

pub use achievements::{
    ACHIEVEMENTS, Achievement, AchievementId, AchievementState, check_new_achievements,
    format_achievements, format_notification, full_completion_state, is_fully_unlocked,
    unlocked_ids,
};
pub use progression::Progression;
pub use unlocks::{UnlockId, UnlockSet};
