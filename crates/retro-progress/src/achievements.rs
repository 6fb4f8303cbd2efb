//! Achievement state, the achievement table and its evaluation.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Everything the visitor has done that achievements are judged on.
///
/// Sets only grow within a session; a full reset replaces the whole value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AchievementState {
    pub commands_used: BTreeSet<String>,
    pub easter_eggs_found: BTreeSet<String>,
    pub themes_used: BTreeSet<String>,
    pub games_played: BTreeSet<String>,
    pub files_viewed: BTreeSet<String>,
    pub directories_visited: BTreeSet<String>,
    pub total_commands: u64,
    pub pipe_used: bool,
}

impl AchievementState {
    /// Count one submitted command line whose verb is `verb`.
    pub fn record_command(&mut self, verb: &str) {
        self.commands_used.insert(verb.to_lowercase());
        self.total_commands += 1;
    }

    pub fn record_egg(&mut self, egg: &str) {
        self.easter_eggs_found.insert(egg.to_string());
    }

    pub fn record_theme(&mut self, theme: &str) {
        self.themes_used.insert(theme.to_string());
    }

    pub fn record_game(&mut self, game: &str) {
        self.games_played.insert(game.to_string());
    }

    pub fn record_file(&mut self, path: &str) {
        self.files_viewed.insert(path.to_string());
    }

    pub fn record_directory(&mut self, path: &str) {
        self.directories_visited.insert(path.to_string());
    }

    pub fn record_pipe(&mut self) {
        self.pipe_used = true;
    }

    pub fn has_egg(&self, egg: &str) -> bool {
        self.easter_eggs_found.contains(egg)
    }

    /// Union `other` into `self`. Never shrinks any field.
    pub fn merge(&mut self, other: &AchievementState) {
        self.commands_used.extend(other.commands_used.iter().cloned());
        self.easter_eggs_found
            .extend(other.easter_eggs_found.iter().cloned());
        self.themes_used.extend(other.themes_used.iter().cloned());
        self.games_played.extend(other.games_played.iter().cloned());
        self.files_viewed.extend(other.files_viewed.iter().cloned());
        self.directories_visited
            .extend(other.directories_visited.iter().cloned());
        self.total_commands = self.total_commands.max(other.total_commands);
        self.pipe_used |= other.pipe_used;
    }
}

/// Stable achievement identifiers, in table order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AchievementId {
    HiddenPath,
    PipeDream,
    FullSpectrum,
    DeepReader,
    EggHunter,
    RootAccess,
    GameOn,
    Navigator,
    PowerUser,
    GlitchLord,
    Hacker,
    SecretCode,
    Completionist,
}

impl AchievementId {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::HiddenPath => "hidden_path",
            Self::PipeDream => "pipe_dream",
            Self::FullSpectrum => "full_spectrum",
            Self::DeepReader => "deep_reader",
            Self::EggHunter => "egg_hunter",
            Self::RootAccess => "root_access",
            Self::GameOn => "game_on",
            Self::Navigator => "navigator",
            Self::PowerUser => "power_user",
            Self::GlitchLord => "glitch_lord",
            Self::Hacker => "hacker",
            Self::SecretCode => "secret_code",
            Self::Completionist => "completionist",
        }
    }
}

impl fmt::Display for AchievementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy)]
enum Rule {
    Predicate(fn(&AchievementState) -> bool),
    /// True when every `Predicate` achievement is.
    AllOthers,
}

/// One row of the achievement table.
#[derive(Clone, Copy)]
pub struct Achievement {
    pub id: AchievementId,
    pub name: &'static str,
    pub description: &'static str,
    rule: Rule,
}

impl fmt::Debug for Achievement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Achievement")
            .field("id", &self.id)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl Achievement {
    pub fn is_derived(&self) -> bool {
        matches!(self.rule, Rule::AllOthers)
    }
}

const EDITOR_EGGS: [&str; 3] = ["editor_vim", "editor_emacs", "editor_nano"];

/// The achievement table, in display order. Completionist is last.
pub static ACHIEVEMENTS: [Achievement; 13] = [
    Achievement {
        id: AchievementId::HiddenPath,
        name: "Hidden Path",
        description: "Discover a hidden dotfile",
        rule: Rule::Predicate(|s| s.files_viewed.iter().any(|f| f.contains("/."))),
    },
    Achievement {
        id: AchievementId::PipeDream,
        name: "Pipe Dream",
        description: "Use a pipe to chain commands",
        rule: Rule::Predicate(|s| s.pipe_used),
    },
    Achievement {
        id: AchievementId::FullSpectrum,
        name: "Full Spectrum",
        description: "Try every available theme",
        rule: Rule::Predicate(|s| s.themes_used.len() >= 5),
    },
    Achievement {
        id: AchievementId::DeepReader,
        name: "Deep Reader",
        description: "Read 8 different files",
        rule: Rule::Predicate(|s| s.files_viewed.len() >= 8),
    },
    Achievement {
        id: AchievementId::EggHunter,
        name: "Egg Hunter",
        description: "Discover 3 easter eggs",
        rule: Rule::Predicate(|s| s.easter_eggs_found.len() >= 3),
    },
    Achievement {
        id: AchievementId::RootAccess,
        name: "Root Access",
        description: "Attempt to sudo",
        rule: Rule::Predicate(|s| s.has_egg("sudo")),
    },
    Achievement {
        id: AchievementId::GameOn,
        name: "Game On",
        description: "Play a mini-game",
        rule: Rule::Predicate(|s| !s.games_played.is_empty()),
    },
    Achievement {
        id: AchievementId::Navigator,
        name: "Navigator",
        description: "Visit 5 different directories",
        rule: Rule::Predicate(|s| s.directories_visited.len() >= 5),
    },
    Achievement {
        id: AchievementId::PowerUser,
        name: "Power User",
        description: "Use 15 different commands",
        rule: Rule::Predicate(|s| s.commands_used.len() >= 15),
    },
    Achievement {
        id: AchievementId::GlitchLord,
        name: "Glitch Lord",
        description: "Unlock the glitch theme",
        rule: Rule::Predicate(|s| s.has_egg("rm_rf")),
    },
    Achievement {
        id: AchievementId::Hacker,
        name: "Hacker",
        description: "Unlock the editor",
        rule: Rule::Predicate(|s| EDITOR_EGGS.iter().any(|e| s.has_egg(e))),
    },
    Achievement {
        id: AchievementId::SecretCode,
        name: "Secret Code",
        description: "Enter the Konami code",
        rule: Rule::Predicate(|s| s.has_egg("konami")),
    },
    Achievement {
        id: AchievementId::Completionist,
        name: "Completionist",
        description: "Unlock all other achievements",
        rule: Rule::AllOthers,
    },
];

/// Look up a table row.
pub fn achievement(id: AchievementId) -> &'static Achievement {
    // The table is indexed by declaration order of `AchievementId`.
    &ACHIEVEMENTS[id as usize]
}

/// Ids of every achievement `state` satisfies, in table order.
///
/// Each predicate runs once; completionist is derived from those results.
pub fn unlocked_ids(state: &AchievementState) -> Vec<AchievementId> {
    let mut unlocked = Vec::with_capacity(ACHIEVEMENTS.len());
    let mut all_others = true;
    for a in &ACHIEVEMENTS {
        if let Rule::Predicate(check) = a.rule {
            if check(state) {
                unlocked.push(a.id);
            } else {
                all_others = false;
            }
        }
    }
    if all_others {
        unlocked.extend(ACHIEVEMENTS.iter().filter(|a| a.is_derived()).map(|a| a.id));
    }
    unlocked
}

/// Conjunction of every non-derived predicate.
pub fn is_fully_unlocked(state: &AchievementState) -> bool {
    ACHIEVEMENTS.iter().all(|a| match a.rule {
        Rule::Predicate(check) => check(state),
        Rule::AllOthers => true,
    })
}

/// Achievements now satisfied that are not in `prev`, in table order.
pub fn check_new_achievements(
    prev: &BTreeSet<AchievementId>,
    state: &AchievementState,
) -> Vec<&'static Achievement> {
    unlocked_ids(state)
        .into_iter()
        .filter(|id| !prev.contains(id))
        .map(achievement)
        .collect()
}

/// Checklist rendering for the `achievements` command.
pub fn format_achievements(state: &AchievementState) -> String {
    let unlocked = unlocked_ids(state);
    let mut lines = vec![
        "Achievements".to_string(),
        "============".to_string(),
        String::new(),
    ];
    for a in &ACHIEVEMENTS {
        let mark = if unlocked.contains(&a.id) { "[x]" } else { "[ ]" };
        lines.push(format!("  {mark} {}", a.name));
        lines.push(format!("      {}", a.description));
        lines.push(String::new());
    }
    lines.push(format!("Progress: {}/{}", unlocked.len(), ACHIEVEMENTS.len()));
    lines.join("\n")
}

/// Notification text for a freshly unlocked achievement.
pub fn format_notification(a: &Achievement) -> String {
    format!("\n  ★ Achievement Unlocked: {}\n    {}\n", a.name, a.description)
}

/// A state satisfying every predicate, merged in by the unlock-all cheat.
pub fn full_completion_state() -> AchievementState {
    let set = |items: &[&str]| items.iter().map(|s| s.to_string()).collect::<BTreeSet<_>>();
    AchievementState {
        commands_used: set(&[
            "help",
            "ls",
            "cd",
            "cat",
            "pwd",
            "tree",
            "about",
            "experience",
            "skills",
            "projects",
            "contact",
            "theme",
            "neofetch",
            "history",
            "achievements",
        ]),
        easter_eggs_found: set(&["sudo", "rm_rf", "exit", "cowsay", "konami", "editor_vim"]),
        themes_used: set(&["amber", "green", "blue", "matrix", "dracula"]),
        games_played: set(&["snake"]),
        files_viewed: set(&[
            "~/.bashrc",
            "~/.vimrc",
            "~/about.txt",
            "~/contact.txt",
            "~/.secret/README.md",
            "~/skills/languages.txt",
            "~/education/degree.txt",
            "~/projects/retro-terminal/README.md",
        ]),
        directories_visited: set(&["~", "~/projects", "~/experience", "~/skills", "~/education"]),
        total_commands: 50,
        pipe_used: true,
    }
}
