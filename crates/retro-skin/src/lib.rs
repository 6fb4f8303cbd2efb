//! Theme catalog for RETROTERM.
//!
//! Themes are data-driven TOML palettes grouped into tiers. The terminal
//! queries the catalog for names, labels and gating; applying colors is the
//! presentation layer's job.

pub mod theme;

pub use theme::{Palette, Theme, ThemeAccess, ThemeCatalog, ThemeTier, TomlThemes, parse_hex};
