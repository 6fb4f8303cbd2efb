//! Terminal color themes and the catalog that gates them.
//!
//! Palettes are data: the built-in set is declared in `themes.toml` and
//! embedded at compile time. The shell never applies colors itself; it only
//! asks the catalog which names exist and which are locked.

use serde::Deserialize;

use retro_types::error::{Result, ShellError};

/// Who may select a theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThemeTier {
    /// Always available.
    Standard,
    /// Requires every achievement.
    Secret,
    /// Requires the `glitch_theme` unlock.
    EasterEgg,
}

/// Color scheme for a theme, as `#rrggbb` strings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Palette {
    pub bg: String,
    pub text: String,
    pub dim: String,
    pub error: String,
    pub glow: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Theme {
    pub name: String,
    pub label: String,
    pub tier: ThemeTier,
    pub colors: Palette,
}

/// Progression facts the catalog needs to decide gating.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ThemeAccess {
    pub fully_unlocked: bool,
    pub glitch_unlocked: bool,
}

impl ThemeAccess {
    pub fn allows(&self, tier: ThemeTier) -> bool {
        match tier {
            ThemeTier::Standard => true,
            ThemeTier::Secret => self.fully_unlocked,
            ThemeTier::EasterEgg => self.glitch_unlocked,
        }
    }
}

/// Source of theme definitions.
pub trait ThemeCatalog {
    /// All themes in display order.
    fn themes(&self) -> &[Theme];

    fn get(&self, name: &str) -> Option<&Theme> {
        self.themes().iter().find(|t| t.name == name)
    }

    fn exists(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Human label, falling back to the name.
    fn label<'a>(&'a self, name: &'a str) -> &'a str {
        self.get(name).map_or(name, |t| t.label.as_str())
    }

    /// True when `name` exists but `access` does not reach its tier.
    fn is_locked(&self, name: &str, access: ThemeAccess) -> bool {
        self.get(name).is_some_and(|t| !access.allows(t.tier))
    }

    /// Names selectable under `access`, in display order.
    fn names(&self, access: ThemeAccess) -> Vec<&str> {
        self.themes()
            .iter()
            .filter(|t| access.allows(t.tier))
            .map(|t| t.name.as_str())
            .collect()
    }
}

#[derive(Debug, Deserialize)]
struct ThemeFile {
    theme: Vec<Theme>,
}

const BUILTIN_THEMES: &str = include_str!("../themes.toml");

/// Catalog backed by a parsed TOML document.
#[derive(Debug, Clone)]
pub struct TomlThemes {
    themes: Vec<Theme>,
}

impl TomlThemes {
    /// The palettes shipped with the crate.
    pub fn builtin() -> Result<Self> {
        Self::from_toml(BUILTIN_THEMES)
    }

    /// Parse a `[[theme]]` document. Names must be unique and lowercase.
    pub fn from_toml(text: &str) -> Result<Self> {
        let file: ThemeFile = toml::from_str(text)?;
        for (i, theme) in file.theme.iter().enumerate() {
            if theme.name != theme.name.to_lowercase() {
                return Err(ShellError::Config(format!(
                    "theme name must be lowercase: {}",
                    theme.name
                )));
            }
            if file.theme[..i].iter().any(|t| t.name == theme.name) {
                return Err(ShellError::Config(format!(
                    "duplicate theme: {}",
                    theme.name
                )));
            }
        }
        log::debug!("Loaded {} themes", file.theme.len());
        Ok(Self { themes: file.theme })
    }
}

impl ThemeCatalog for TomlThemes {
    fn themes(&self) -> &[Theme] {
        &self.themes
    }
}

/// Parse `#rrggbb` into components.
pub fn parse_hex(color: &str) -> Option<(u8, u8, u8)> {
    let hex = color.strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> TomlThemes {
        TomlThemes::builtin().unwrap()
    }

    #[test]
    fn builtin_parses() {
        let c = catalog();
        assert_eq!(c.themes().len(), 10);
        assert_eq!(c.themes()[0].name, "amber");
        assert_eq!(c.label("amber"), "Amber (Default)");
    }

    #[test]
    fn tiers_match_expectations() {
        let c = catalog();
        let tier = |n: &str| c.get(n).unwrap().tier;
        assert_eq!(tier("dracula"), ThemeTier::Standard);
        assert_eq!(tier("vaporwave"), ThemeTier::Secret);
        assert_eq!(tier("glitch"), ThemeTier::EasterEgg);
    }

    #[test]
    fn names_respect_access() {
        let c = catalog();
        let base = c.names(ThemeAccess::default());
        assert_eq!(base, vec!["amber", "green", "blue", "matrix", "dracula"]);

        let all = c.names(ThemeAccess {
            fully_unlocked: true,
            glitch_unlocked: true,
        });
        assert_eq!(all.len(), 10);

        let glitch_only = c.names(ThemeAccess {
            fully_unlocked: false,
            glitch_unlocked: true,
        });
        assert!(glitch_only.contains(&"glitch"));
        assert!(!glitch_only.contains(&"cga"));
    }

    #[test]
    fn locked_vs_unknown() {
        let c = catalog();
        let none = ThemeAccess::default();
        assert!(c.is_locked("hotdog", none));
        assert!(c.is_locked("glitch", none));
        assert!(!c.is_locked("green", none));
        assert!(!c.is_locked("nonexistent", none));
        assert!(!c.exists("nonexistent"));
    }

    #[test]
    fn duplicate_names_rejected() {
        let text = r##"
[[theme]]
name = "a"
label = "A"
tier = "standard"
colors = { bg = "#000000", text = "#ffffff", dim = "#888888", error = "#ff0000", glow = "#ffffff" }

[[theme]]
name = "a"
label = "A again"
tier = "secret"
colors = { bg = "#000000", text = "#ffffff", dim = "#888888", error = "#ff0000", glow = "#ffffff" }
"##;
        assert!(matches!(
            TomlThemes::from_toml(text),
            Err(ShellError::Config(_))
        ));
    }

    #[test]
    fn every_builtin_color_parses() {
        for theme in catalog().themes() {
            let p = &theme.colors;
            for color in [&p.bg, &p.text, &p.dim, &p.error, &p.glow] {
                assert!(parse_hex(color).is_some(), "{}: {color}", theme.name);
            }
        }
    }

    #[test]
    fn parse_hex_values() {
        assert_eq!(parse_hex("#ffb000"), Some((255, 176, 0)));
        assert_eq!(parse_hex("ffb000"), None);
        assert_eq!(parse_hex("#fff"), None);
        assert_eq!(parse_hex("#gg0000"), None);
    }
}
