//! Shell and session commands: help, clear, theme, neofetch, achievements,
//! history, sound, font size, reset, restore, channel, gui.

use std::rc::Rc;

use retro_platform::format_uptime;
use retro_progress::{Progression, UnlockId, format_achievements};
use retro_skin::{ThemeAccess, ThemeTier};
use retro_types::config::FontSize;
use retro_types::error::Result;

use crate::interpreter::{
    Category, Command, CommandRegistry, CommandResult, Effect, Environment,
};

pub fn register_system_commands(reg: &mut CommandRegistry) {
    reg.register(Rc::new(HelpCmd));
    reg.register(Rc::new(ClearCmd));
    reg.register(Rc::new(ThemeCmd));
    reg.register(Rc::new(NeofetchCmd));
    reg.register(Rc::new(AchievementsCmd));
    reg.register(Rc::new(HistoryCmd));
    reg.register(Rc::new(MuteCmd));
    reg.register(Rc::new(UnmuteCmd));
    reg.register(Rc::new(SplitCmd));
    reg.register(Rc::new(FontSizeCmd));
    reg.register(Rc::new(ResetCmd));
    reg.register(Rc::new(RestoreCmd));
    reg.register(Rc::new(ChannelCmd));
    reg.register(Rc::new(GuiCmd));
}

/// Theme gating facts derived from progression.
pub fn theme_access(progress: &Progression) -> ThemeAccess {
    ThemeAccess {
        fully_unlocked: progress.is_fully_unlocked(),
        glitch_unlocked: progress.has(UnlockId::GlitchTheme),
    }
}

// ---------------------------------------------------------------------------
// help
// ---------------------------------------------------------------------------

const SECRET_SECTION: &str = "Secret (100%)";

struct HelpCmd;
impl Command for HelpCmd {
    fn name(&self) -> &str {
        "help"
    }
    fn description(&self) -> &str {
        "Show available commands"
    }
    fn category(&self) -> Category {
        Category::System
    }
    fn execute(&self, _args: &[&str], env: &mut Environment<'_>) -> Result<CommandResult> {
        Ok(CommandResult::text(help_text(env.registry, env.progress)))
    }
}

/// Visible commands grouped by section, followed by tips.
pub fn help_text(registry: &CommandRegistry, progress: &Progression) -> String {
    let entry = |cmd: &Rc<dyn Command>| {
        let aliases = if cmd.aliases().is_empty() {
            String::new()
        } else {
            format!(" ({})", cmd.aliases().join(", "))
        };
        format!("  {:<16} {}{aliases}", cmd.name(), cmd.description())
    };

    let mut sections: Vec<(&str, Vec<String>)> = Category::ALL
        .iter()
        .map(|cat| {
            let lines = registry
                .visible(progress)
                .filter(|cmd| !cmd.secret() && cmd.category() == *cat)
                .map(entry)
                .collect();
            (cat.title(), lines)
        })
        .collect();
    sections.push((
        SECRET_SECTION,
        registry
            .visible(progress)
            .filter(|cmd| cmd.secret())
            .map(entry)
            .collect(),
    ));

    let mut lines = vec!["Available commands:".to_string(), String::new()];
    for (title, entries) in sections {
        if entries.is_empty() {
            continue;
        }
        lines.push(format!("  {title}:"));
        lines.extend(entries);
        lines.push(String::new());
    }
    lines.extend(
        [
            "Tips:",
            "  Use Tab for autocomplete",
            "  Use Up/Down for command history",
            "  Try pipes: skills | grep Python",
            "  Explore the filesystem: cd ~/projects",
        ]
        .map(str::to_string),
    );
    lines.join("\n")
}

// ---------------------------------------------------------------------------
// clear
// ---------------------------------------------------------------------------

struct ClearCmd;
impl Command for ClearCmd {
    fn name(&self) -> &str {
        "clear"
    }
    fn description(&self) -> &str {
        "Clear the terminal"
    }
    fn category(&self) -> Category {
        Category::System
    }
    fn aliases(&self) -> &[&str] {
        &["cls"]
    }
    fn execute(&self, _args: &[&str], _env: &mut Environment<'_>) -> Result<CommandResult> {
        Ok(CommandResult::empty().with_effect(Effect::ClearScreen))
    }
}

// ---------------------------------------------------------------------------
// theme
// ---------------------------------------------------------------------------

struct ThemeCmd;
impl Command for ThemeCmd {
    fn name(&self) -> &str {
        "theme"
    }
    fn description(&self) -> &str {
        "Change color theme"
    }
    fn category(&self) -> Category {
        Category::System
    }
    fn execute(&self, args: &[&str], env: &mut Environment<'_>) -> Result<CommandResult> {
        let access = theme_access(env.progress);
        let requested = match args.first() {
            None | Some(&"--list") => {
                return Ok(CommandResult::text(theme_list(env, access)));
            },
            Some(name) => *name,
        };

        let name = requested.to_lowercase();
        let Some(theme) = env.themes.get(&name) else {
            return Ok(CommandResult::error(format!(
                "Unknown theme: {requested}. Type 'theme --list' for options."
            )));
        };
        if !access.allows(theme.tier) {
            let message = match theme.tier {
                ThemeTier::Secret => {
                    format!("Theme '{name}' requires 100% completion to unlock.")
                },
                _ => format!("Theme '{name}' is locked. Find the easter egg to unlock it."),
            };
            return Ok(CommandResult::error(message));
        }

        env.prefs.theme = theme.name.clone();
        env.progress.state.record_theme(&theme.name);
        Ok(CommandResult::system(format!(
            "Theme changed to {}",
            theme.label
        )))
    }
}

fn theme_list(env: &Environment<'_>, access: ThemeAccess) -> String {
    let row = |name: &str, label: &str| {
        let active = if name == env.prefs.theme {
            " (active)"
        } else {
            ""
        };
        format!("  {name:<12} {label}{active}")
    };
    let tier = |tier: ThemeTier| {
        env.themes
            .themes()
            .iter()
            .filter(move |t| t.tier == tier)
            .map(|t| row(&t.name, &t.label))
    };

    let mut lines = vec!["Available themes:".to_string(), String::new()];
    lines.extend(tier(ThemeTier::Standard));
    if access.glitch_unlocked {
        lines.extend(tier(ThemeTier::EasterEgg));
    }
    if access.fully_unlocked {
        lines.push(String::new());
        lines.push("  Secret themes (100% completion):".to_string());
        lines.extend(tier(ThemeTier::Secret));
    }
    lines.push(String::new());
    lines.push("Usage: theme <name>".to_string());
    lines.join("\n")
}

// ---------------------------------------------------------------------------
// neofetch
// ---------------------------------------------------------------------------

struct NeofetchCmd;
impl Command for NeofetchCmd {
    fn name(&self) -> &str {
        "neofetch"
    }
    fn description(&self) -> &str {
        "System information"
    }
    fn category(&self) -> Category {
        Category::System
    }
    fn execute(&self, _args: &[&str], env: &mut Environment<'_>) -> Result<CommandResult> {
        Ok(CommandResult::text(neofetch(env)))
    }
}

fn neofetch(env: &Environment<'_>) -> String {
    let badge = badge(&env.profile.name);
    let art = [
        "   .--------------.".to_string(),
        "   |  .--------.  |".to_string(),
        format!("   |  |{badge:^8}|  |"),
        "   |  '--------'  |".to_string(),
        "   '--------------'".to_string(),
        "       |======|".to_string(),
        "   ====+------+====".to_string(),
    ];

    let uptime = match env.time.uptime_secs() {
        Ok(secs) => format_uptime(secs),
        Err(e) => {
            log::warn!("uptime unavailable: {e}");
            "unknown".to_string()
        },
    };
    let label = env.themes.label(&env.prefs.theme);
    let terminal = label.split(' ').next().unwrap_or(label);
    let languages = env
        .profile
        .skills
        .first()
        .map_or_else(|| "n/a".to_string(), |s| s.items.join(", "));
    let login = format!("{}@{}", env.config.user, env.config.host);

    let info = [
        login.clone(),
        "-".repeat(login.chars().count()),
        format!("OS: RetroTerm v{}", env!("CARGO_PKG_VERSION")),
        "Host: Virtual CRT".to_string(),
        "Kernel: Rust 2024 edition".to_string(),
        format!("Uptime: {uptime}"),
        format!("Packages: {} (builtin)", env.registry.definitions().len()),
        "Shell: retro-sh".to_string(),
        format!("Terminal: CRT-{terminal}"),
        format!("Theme: {label}"),
        format!("Languages: {languages}"),
    ];

    let art_width = art.iter().map(|l| l.chars().count()).max().unwrap_or(0) + 3;
    (0..art.len().max(info.len()))
        .map(|i| {
            let left = art.get(i).map_or("", String::as_str);
            let right = info.get(i).map_or("", String::as_str);
            format!("{left:<art_width$}{right}").trim_end().to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// `A.QUINN` style tag for the monitor art, at most 8 characters.
fn badge(name: &str) -> String {
    let mut words = name.split_whitespace();
    let tag = match (words.next(), words.last()) {
        (Some(first), Some(last)) => {
            let initial = first.chars().next().unwrap_or('?');
            format!("{initial}.{last}")
        },
        (Some(only), None) => only.to_string(),
        _ => String::new(),
    };
    tag.to_uppercase().chars().take(8).collect()
}

// ---------------------------------------------------------------------------
// achievements
// ---------------------------------------------------------------------------

struct AchievementsCmd;
impl Command for AchievementsCmd {
    fn name(&self) -> &str {
        "achievements"
    }
    fn description(&self) -> &str {
        "View achievements"
    }
    fn category(&self) -> Category {
        Category::System
    }
    fn aliases(&self) -> &[&str] {
        &["progress"]
    }
    fn execute(&self, _args: &[&str], env: &mut Environment<'_>) -> Result<CommandResult> {
        Ok(CommandResult::text(format_achievements(&env.progress.state)))
    }
}

// ---------------------------------------------------------------------------
// history
// ---------------------------------------------------------------------------

struct HistoryCmd;
impl Command for HistoryCmd {
    fn name(&self) -> &str {
        "history"
    }
    fn description(&self) -> &str {
        "Command history"
    }
    fn category(&self) -> Category {
        Category::System
    }
    fn execute(&self, _args: &[&str], env: &mut Environment<'_>) -> Result<CommandResult> {
        if env.history.is_empty() {
            return Ok(CommandResult::text("  (no history)"));
        }
        let lines: Vec<String> = env
            .history
            .iter()
            .enumerate()
            .map(|(i, cmd)| format!("  {:>4}  {cmd}", i + 1))
            .collect();
        Ok(CommandResult::text(lines.join("\n")))
    }
}

// ---------------------------------------------------------------------------
// mute / unmute
// ---------------------------------------------------------------------------

struct MuteCmd;
impl Command for MuteCmd {
    fn name(&self) -> &str {
        "mute"
    }
    fn description(&self) -> &str {
        "Mute sound effects"
    }
    fn category(&self) -> Category {
        Category::System
    }
    fn execute(&self, _args: &[&str], env: &mut Environment<'_>) -> Result<CommandResult> {
        env.prefs.sound_enabled = false;
        Ok(CommandResult::system("  Sound muted"))
    }
}

struct UnmuteCmd;
impl Command for UnmuteCmd {
    fn name(&self) -> &str {
        "unmute"
    }
    fn description(&self) -> &str {
        "Unmute sound effects"
    }
    fn category(&self) -> Category {
        Category::System
    }
    fn execute(&self, _args: &[&str], env: &mut Environment<'_>) -> Result<CommandResult> {
        env.prefs.sound_enabled = true;
        Ok(CommandResult::system("  Sound unmuted"))
    }
}

// ---------------------------------------------------------------------------
// split
// ---------------------------------------------------------------------------

struct SplitCmd;
impl Command for SplitCmd {
    fn name(&self) -> &str {
        "split"
    }
    fn description(&self) -> &str {
        "Toggle info panel"
    }
    fn category(&self) -> Category {
        Category::System
    }
    fn aliases(&self) -> &[&str] {
        &["panel"]
    }
    fn execute(&self, _args: &[&str], _env: &mut Environment<'_>) -> Result<CommandResult> {
        Ok(CommandResult::empty().with_effect(Effect::TogglePanel))
    }
}

// ---------------------------------------------------------------------------
// fontsize
// ---------------------------------------------------------------------------

struct FontSizeCmd;
impl Command for FontSizeCmd {
    fn name(&self) -> &str {
        "fontsize"
    }
    fn description(&self) -> &str {
        "Change terminal font size"
    }
    fn category(&self) -> Category {
        Category::System
    }
    fn execute(&self, args: &[&str], env: &mut Environment<'_>) -> Result<CommandResult> {
        let Some(arg) = args.first() else {
            return Ok(CommandResult::text(format!(
                "  Current: {}\n  Usage: fontsize <small|medium|large>",
                env.prefs.font_size
            )));
        };
        match arg.parse::<FontSize>() {
            Ok(size) => {
                env.prefs.font_size = size;
                Ok(CommandResult::system(format!(
                    "  Font size changed to {size}"
                )))
            },
            Err(e) => Ok(CommandResult::error(format!("  {e}"))),
        }
    }
}

// ---------------------------------------------------------------------------
// reset
// ---------------------------------------------------------------------------

struct ResetCmd;
impl Command for ResetCmd {
    fn name(&self) -> &str {
        "reset"
    }
    fn description(&self) -> &str {
        "Reset all progress"
    }
    fn category(&self) -> Category {
        Category::System
    }
    fn execute(&self, _args: &[&str], _env: &mut Environment<'_>) -> Result<CommandResult> {
        Ok(CommandResult::system(
            "  Are you sure you want to reset all progress? This cannot be undone. (y/n)",
        )
        .with_effect(Effect::ConfirmReset))
    }
}

// ---------------------------------------------------------------------------
// restore
// ---------------------------------------------------------------------------

struct RestoreCmd;
impl Command for RestoreCmd {
    fn name(&self) -> &str {
        "restore"
    }
    fn description(&self) -> &str {
        "Restore the system"
    }
    fn category(&self) -> Category {
        Category::System
    }
    fn gate(&self) -> Option<UnlockId> {
        Some(UnlockId::GlitchTheme)
    }
    fn execute(&self, _args: &[&str], _env: &mut Environment<'_>) -> Result<CommandResult> {
        Ok(CommandResult::empty().with_effect(Effect::StartRestore))
    }
}

// ---------------------------------------------------------------------------
// channel
// ---------------------------------------------------------------------------

/// CRT channels: number, short name, label.
pub const CHANNELS: [(u8, &str, &str); 5] = [
    (1, "terminal", "Terminal"),
    (2, "dvd", "DVD Logo"),
    (3, "banjo", "Banjo-Kazooie"),
    (4, "bars", "Color Bars"),
    (5, "static", "Static"),
];

struct ChannelCmd;
impl Command for ChannelCmd {
    fn name(&self) -> &str {
        "channel"
    }
    fn description(&self) -> &str {
        "Switch CRT channel"
    }
    fn category(&self) -> Category {
        Category::System
    }
    fn gate(&self) -> Option<UnlockId> {
        Some(UnlockId::Channels)
    }
    fn execute(&self, args: &[&str], _env: &mut Environment<'_>) -> Result<CommandResult> {
        let Some(arg) = args.first() else {
            let mut lines = vec!["  CRT Channels:".to_string()];
            lines.extend(
                CHANNELS
                    .iter()
                    .map(|(n, name, label)| format!("    {n}  {name:<12} {label}")),
            );
            lines.push(String::new());
            lines.push("  Usage: channel <number|name>".to_string());
            return Ok(CommandResult::text(lines.join("\n")));
        };

        match parse_channel(arg) {
            Some(n) => Ok(CommandResult::system(format!(
                "  Switching to channel {n}..."
            ))
            .with_effect(Effect::SwitchChannel(n))),
            None => Ok(CommandResult::error(format!(
                "  Unknown channel: {arg}. Use 1-5 or terminal/dvd/banjo/bars/static."
            ))),
        }
    }
}

fn parse_channel(arg: &str) -> Option<u8> {
    let arg = arg.to_lowercase();
    CHANNELS
        .iter()
        .find(|(_, name, _)| *name == arg)
        .map(|(n, _, _)| *n)
        .or_else(|| arg.parse::<u8>().ok().filter(|n| (1..=5).contains(n)))
}

// ---------------------------------------------------------------------------
// gui
// ---------------------------------------------------------------------------

struct GuiCmd;
impl Command for GuiCmd {
    fn name(&self) -> &str {
        "gui"
    }
    fn description(&self) -> &str {
        "Visual portfolio (click-friendly)"
    }
    fn category(&self) -> Category {
        Category::System
    }
    fn execute(&self, _args: &[&str], _env: &mut Environment<'_>) -> Result<CommandResult> {
        Ok(CommandResult::empty().with_effect(Effect::StartGui))
    }
}
