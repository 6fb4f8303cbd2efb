//! Shared fixture for command tests.

use retro_platform::{FixedClock, SystemTime};
use retro_progress::{Progression, UnlockId};
use retro_skin::TomlThemes;
use retro_types::config::{Preferences, ShellConfig};
use retro_vfs::{OverlayStore, ProfileData, VirtualFs, build_base_tree};

use crate::commands::register_builtins;
use crate::interpreter::{CommandRegistry, CommandResult, Environment, Mode, execute_line};

pub struct Fixture {
    pub registry: CommandRegistry,
    pub fs: VirtualFs,
    pub progress: Progression,
    pub prefs: Preferences,
    pub themes: TomlThemes,
    pub profile: ProfileData,
    pub clock: FixedClock,
    pub config: ShellConfig,
    pub history: Vec<String>,
}

impl Fixture {
    /// Sample profile with every built-in command registered.
    pub fn new() -> Self {
        let mut registry = CommandRegistry::new();
        register_builtins(&mut registry);
        Self::with_registry(registry)
    }

    pub fn with_registry(registry: CommandRegistry) -> Self {
        let profile = ProfileData::sample();
        let fs = VirtualFs::new(build_base_tree(&profile), OverlayStore::new());
        Self {
            registry,
            fs,
            progress: Progression::new(),
            prefs: Preferences::default(),
            themes: TomlThemes::builtin().unwrap(),
            profile,
            clock: FixedClock::new(SystemTime {
                year: 2026,
                month: 2,
                day: 13,
                hour: 14,
                minute: 30,
                second: 45,
            }),
            config: ShellConfig::default(),
            history: Vec::new(),
        }
    }

    pub fn with_editor() -> Self {
        let mut f = Self::new();
        f.progress.grant(UnlockId::Editor);
        f
    }

    pub fn run(&mut self, line: &str) -> CommandResult {
        self.run_in(line, Mode::Command)
    }

    pub fn run_in(&mut self, line: &str, mode: Mode) -> CommandResult {
        self.history.push(line.to_string());
        let mut env = Environment {
            registry: &self.registry,
            fs: &mut self.fs,
            progress: &mut self.progress,
            prefs: &mut self.prefs,
            themes: &self.themes,
            profile: &self.profile,
            time: &self.clock,
            config: &self.config,
            history: &self.history,
            invoked_as: String::new(),
        };
        execute_line(line, mode, &mut env)
    }
}
