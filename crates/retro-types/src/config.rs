//! User preferences and shell configuration.
//!
//! `Preferences` is the small persisted record the `theme`, `fontsize`,
//! `mute` and `unmute` commands mutate. `ShellConfig` is read once at
//! startup from an optional TOML file; every field has a default.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ShellError};

/// Theme applied on a fresh session and after a full reset.
pub const DEFAULT_THEME: &str = "amber";

/// Terminal font size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl FontSize {
    /// All sizes in menu order.
    pub const ALL: [FontSize; 3] = [FontSize::Small, FontSize::Medium, FontSize::Large];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
        }
    }

    /// CSS-style pixel size, used as the autocomplete description.
    pub fn pixels(self) -> &'static str {
        match self {
            Self::Small => "12px",
            Self::Medium => "14px",
            Self::Large => "17px",
        }
    }
}

impl fmt::Display for FontSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FontSize {
    type Err = ShellError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "small" => Ok(Self::Small),
            "medium" => Ok(Self::Medium),
            "large" => Ok(Self::Large),
            _ => Err(ShellError::InvalidArgument(format!(
                "Unknown size: {s}. Options: small, medium, large"
            ))),
        }
    }
}

/// Persisted display/audio preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    /// Active theme name.
    pub theme: String,
    pub font_size: FontSize,
    /// Sound starts muted.
    pub sound_enabled: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            theme: DEFAULT_THEME.to_string(),
            font_size: FontSize::default(),
            sound_enabled: false,
        }
    }
}

/// Startup configuration for a shell session.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    /// User name shown in the prompt and `ls -l` owner columns.
    pub user: String,
    /// Host name shown in the prompt.
    pub host: String,
    /// Milliseconds per character for staged output reveal.
    pub reveal_speed_ms: u64,
    /// How long a `Ctrl+X` chord prefix stays armed in the editor.
    pub chord_window_ms: u64,
    /// Maximum number of recalled commands.
    pub history_limit: usize,
    /// File the desktop binary persists state into.
    pub state_path: Option<PathBuf>,
    /// Optional TOML profile replacing the built-in sample profile.
    pub profile_path: Option<PathBuf>,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            user: "visitor".to_string(),
            host: "portfolio".to_string(),
            reveal_speed_ms: 10,
            chord_window_ms: 1500,
            history_limit: 500,
            state_path: None,
            profile_path: None,
        }
    }
}

impl ShellConfig {
    /// Parse a config from TOML text. Missing fields take defaults.
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        if config.history_limit == 0 {
            return Err(ShellError::Config(
                "history_limit must be at least 1".to_string(),
            ));
        }
        Ok(config)
    }

    /// Prompt prefix, e.g. `visitor@portfolio:~/projects$ `.
    pub fn prompt(&self, cwd: &str) -> String {
        format!("{}@{}:{cwd}$ ", self.user, self.host)
    }
}
