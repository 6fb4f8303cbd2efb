//! The interactive session: one visitor, one shell.
//!
//! `Session` owns the filesystem view, progression, preferences and
//! scrollback, and is the only place effects advertised by command results
//! are applied. Time is caller-driven: [`Session::tick`] moves the session
//! clock, fires scheduled sequence events and advances the output reveal.

use retro_platform::{SoundCue, SoundSink, TimeService};
use retro_progress::{AchievementId, Progression, UnlockId, format_notification};
use retro_skin::ThemeCatalog;
use retro_terminal::{
    CommandRegistry, CommandResult, CompletionSources, Effect, Environment, Game, Mode,
    OutputKind, TabCompletion, complete, execute_line, parse_pipeline, register_builtins,
    theme_access, tokenize,
};
use retro_types::config::{DEFAULT_THEME, Preferences, ShellConfig};
use retro_types::error::Result;
use retro_types::storage::KeyValueStore;
use retro_vfs::{ProfileData, VirtualFs, build_base_tree};

use crate::editor::{Editor, EditorAction};
use crate::input::{Key, KonamiTracker};
use crate::persist;
use crate::reveal::Reveal;
use crate::sequences::{self, Step};
use crate::timeline::{OutputLine, OutputLog, Timeline};

/// Glitch theme applied when the meltdown ends.
const GLITCH_THEME: &str = "glitch";

/// External services a session is built on.
pub struct Services<S, A> {
    pub store: S,
    pub sound: A,
    pub time: Box<dyn TimeService>,
    pub themes: Box<dyn ThemeCatalog>,
}

/// Something the timeline fires later.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Scheduled {
    /// A line and its typewriter speed.
    Line(OutputLine, u64),
    BootComplete,
    MeltdownStart,
    MeltdownEnd,
    RestoreComplete,
}

pub struct Session<S: KeyValueStore, A: SoundSink> {
    config: ShellConfig,
    profile: ProfileData,
    registry: CommandRegistry,
    fs: VirtualFs,
    progress: Progression,
    prefs: Preferences,
    store: S,
    sound: A,
    time: Box<dyn TimeService>,
    themes: Box<dyn ThemeCatalog>,

    mode: Mode,
    history: Vec<String>,
    log: OutputLog,
    reveal: Option<Reveal>,
    timeline: Timeline<Scheduled>,
    now_ms: u64,
    started_ms: u64,
    konami: KonamiTracker,
    pending_reset: bool,
    editor: Option<Editor>,

    /// The boot sequence has played in this session. Never persisted.
    booted: bool,
    booting: bool,
    meltdown_active: bool,
    panel_open: bool,
    channel: u8,
    game: Option<Game>,
    gui_open: bool,
}

impl<S: KeyValueStore, A: SoundSink> Session<S, A> {
    /// Restore a session from `services.store`. Missing or corrupt records
    /// start fresh.
    pub fn new(config: ShellConfig, profile: ProfileData, services: Services<S, A>) -> Self {
        let Services {
            store,
            mut sound,
            time,
            themes,
        } = services;

        let progress = Progression::load(&store);
        let mut prefs = persist::load_preferences(&store);
        if !themes.exists(&prefs.theme) || themes.is_locked(&prefs.theme, theme_access(&progress))
        {
            log::warn!("Stored theme '{}' unavailable, using default", prefs.theme);
            prefs.theme = DEFAULT_THEME.to_string();
        }
        sound.set_enabled(prefs.sound_enabled);

        let mut fs = VirtualFs::new(build_base_tree(&profile), persist::load_overlay(&store));
        fs.set_owner(&config.user);

        let mut registry = CommandRegistry::new();
        register_builtins(&mut registry);
        log::debug!("Session ready with {} commands", registry.definitions().len());

        Self {
            config,
            profile,
            registry,
            fs,
            progress,
            prefs,
            store,
            sound,
            time,
            themes,
            mode: Mode::Command,
            history: Vec::new(),
            log: OutputLog::default(),
            reveal: None,
            timeline: Timeline::new(),
            now_ms: 0,
            started_ms: 0,
            konami: KonamiTracker::new(),
            pending_reset: false,
            editor: None,
            booted: false,
            booting: false,
            meltdown_active: false,
            panel_open: false,
            channel: 1,
            game: None,
            gui_open: false,
        }
    }

    // -- accessors ------------------------------------------------------

    pub fn log(&self) -> &OutputLog {
        &self.log
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn prefs(&self) -> &Preferences {
        &self.prefs
    }

    pub fn progress(&self) -> &Progression {
        &self.progress
    }

    pub fn fs(&self) -> &VirtualFs {
        &self.fs
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Tear down the session, handing back its store.
    pub fn into_store(self) -> S {
        self.store
    }

    pub fn sound(&self) -> &A {
        &self.sound
    }

    pub fn sound_mut(&mut self) -> &mut A {
        &mut self.sound
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    pub fn editor(&self) -> Option<&Editor> {
        self.editor.as_ref()
    }

    /// The output line currently being typed out, if any.
    pub fn reveal(&self) -> Option<&Reveal> {
        self.reveal.as_ref().filter(|r| !r.is_done())
    }

    pub fn prompt(&self) -> String {
        self.config.prompt(&self.fs.pwd())
    }

    pub fn is_booting(&self) -> bool {
        self.booting
    }

    pub fn has_booted(&self) -> bool {
        self.booted
    }

    pub fn is_confirming_reset(&self) -> bool {
        self.pending_reset
    }

    pub fn meltdown_active(&self) -> bool {
        self.meltdown_active
    }

    pub fn panel_open(&self) -> bool {
        self.panel_open
    }

    pub fn channel(&self) -> u8 {
        self.channel
    }

    pub fn game(&self) -> Option<Game> {
        self.game
    }

    /// Presentation reports the game closed.
    pub fn end_game(&mut self) {
        if self.game.take().is_some() {
            self.sound.play(SoundCue::GameOver);
        }
    }

    pub fn gui_open(&self) -> bool {
        self.gui_open
    }

    pub fn close_gui(&mut self) {
        self.gui_open = false;
    }

    /// Milliseconds on the session clock.
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Due time of the next scheduled event.
    pub fn next_event_ms(&self) -> Option<u64> {
        self.timeline.next_due()
    }

    // -- lifecycle ------------------------------------------------------

    /// Show the boot sequence on the first start of this session, or the
    /// ready line after.
    pub fn start(&mut self) {
        if self.booting {
            return;
        }
        self.started_ms = self.now_ms;
        self.sound.play(SoundCue::PowerOn);
        if self.booted {
            self.log.push(OutputLine::system(sequences::READY_TEXT));
            return;
        }

        let hour = match self.time.now() {
            Ok(now) => now.hour,
            Err(e) => {
                log::warn!("Clock unavailable for greeting: {e}");
                12
            },
        };
        self.booting = true;
        self.sound.play(SoundCue::Boot);
        let steps = sequences::boot_sequence(&self.profile, hour);
        let end = self.schedule_steps(&steps);
        self.timeline.schedule(end, Scheduled::BootComplete);
    }

    /// Move the session clock to `now_ms`, firing everything due.
    pub fn tick(&mut self, now_ms: u64) {
        let elapsed = now_ms.saturating_sub(self.now_ms);
        self.now_ms = self.now_ms.max(now_ms);
        if let Some(reveal) = &mut self.reveal {
            reveal.tick(elapsed);
        }
        for event in self.timeline.advance(self.now_ms) {
            self.fire(event);
        }
    }

    /// Finish any in-progress reveal at once.
    pub fn skip_reveal(&mut self) {
        if let Some(reveal) = &mut self.reveal {
            reveal.skip();
        }
    }

    /// Schedule `steps` from now. Returns the due time of the last step.
    fn schedule_steps(&mut self, steps: &[Step]) -> u64 {
        let offsets = sequences::offsets(steps);
        for (step, offset) in steps.iter().zip(&offsets) {
            self.timeline.schedule(
                self.now_ms + offset,
                Scheduled::Line(OutputLine::system(step.text.clone()), step.type_speed_ms),
            );
        }
        self.now_ms + offsets.last().copied().unwrap_or(0)
    }

    fn fire(&mut self, event: Scheduled) {
        match event {
            Scheduled::Line(line, speed) => {
                if speed > 0 {
                    self.reveal = Some(Reveal::new(line.text.clone(), speed));
                }
                self.log.push(line);
            },
            Scheduled::BootComplete => {
                self.booting = false;
                self.booted = true;
            },
            Scheduled::MeltdownStart => {
                self.meltdown_active = true;
                self.sound.play(SoundCue::Meltdown);
            },
            Scheduled::MeltdownEnd => {
                self.meltdown_active = false;
                if self.themes.exists(GLITCH_THEME) {
                    self.prefs.theme = GLITCH_THEME.to_string();
                }
                self.log.push(OutputLine::system(sequences::MELTDOWN_UNLOCK_TEXT));
                self.persist();
            },
            Scheduled::RestoreComplete => {
                self.prefs.theme = DEFAULT_THEME.to_string();
                self.sound.play(SoundCue::RestoreComplete);
                self.persist();
            },
        }
    }

    // -- line submission ------------------------------------------------

    /// Handle one submitted line and return its result.
    pub fn submit(&mut self, input: &str) -> CommandResult {
        let line = input.trim();
        if line.is_empty() || self.editor.is_some() {
            return CommandResult::empty();
        }
        self.skip_reveal();
        self.sound.play(SoundCue::Enter);

        if self.pending_reset {
            return self.answer_reset(line);
        }

        self.history.push(line.to_string());
        if self.history.len() > self.config.history_limit {
            let excess = self.history.len() - self.config.history_limit;
            self.history.drain(..excess);
        }
        let echo = format!("{}{line}", self.prompt());
        self.log.push(OutputLine::input(echo));

        let mode = self.mode;
        let mut env = Environment {
            registry: &self.registry,
            fs: &mut self.fs,
            progress: &mut self.progress,
            prefs: &mut self.prefs,
            themes: self.themes.as_ref(),
            profile: &self.profile,
            time: self.time.as_ref(),
            config: &self.config,
            history: &self.history,
            invoked_as: String::new(),
        };
        let result = execute_line(line, mode, &mut env);

        if mode == Mode::Command && !line.starts_with('/') {
            self.track(line, &result);
        }
        self.apply_effects(&result);

        let cleared = result.has_effect(&Effect::ClearScreen);
        if !cleared && !result.output.is_empty() {
            if result.kind != OutputKind::Error {
                self.reveal = Some(Reveal::new(
                    result.output.clone(),
                    self.config.reveal_speed_ms,
                ));
            }
            self.log
                .push(OutputLine::new(result.output.clone(), result.kind));
        }
        if result.is_error() {
            self.sound.play(SoundCue::Error);
        }

        self.sound.set_enabled(self.prefs.sound_enabled);
        self.announce_achievements();
        self.persist();
        result
    }

    /// Update achievement state from a dispatched line.
    fn track(&mut self, line: &str, result: &CommandResult) {
        let segments = parse_pipeline(line);
        let Some(first) = segments.first() else {
            return;
        };
        let tokens = tokenize(first);
        let Some(verb) = tokens.first().map(|v| v.to_lowercase()) else {
            return;
        };

        let state = &mut self.progress.state;
        state.record_command(&verb);
        if segments.len() > 1 {
            state.record_pipe();
        }
        if result.command_failed() {
            return;
        }
        match verb.as_str() {
            "cd" => state.record_directory(&self.fs.pwd()),
            "cat" => {
                if let Some(arg) = tokens.get(1) {
                    state.record_file(&self.fs.resolve(arg).to_string());
                }
            },
            _ => {},
        }
    }

    fn apply_effects(&mut self, result: &CommandResult) {
        for effect in &result.effects {
            match effect {
                Effect::ClearScreen => self.log.clear(),
                Effect::SwitchMode(mode) => self.mode = *mode,
                Effect::StartGame(game) => {
                    self.progress.state.record_game(game.as_str());
                    self.game = Some(*game);
                },
                Effect::SwitchChannel(n) => {
                    self.channel = *n;
                    self.sound.play(SoundCue::ChannelChange);
                },
                Effect::TogglePanel => self.panel_open = !self.panel_open,
                Effect::StartEditor(path) => {
                    let content = self.fs.read(path).unwrap_or_default();
                    let editor = Editor::open(path.clone(), content, self.config.chord_window_ms);
                    log::debug!("Editing {path}");
                    self.editor = Some(editor);
                },
                Effect::ConfirmReset => self.pending_reset = true,
                Effect::UnlockAll => log::info!("All unlocks granted"),
                Effect::StartMeltdown => {
                    self.timeline.schedule(
                        self.now_ms + sequences::MELTDOWN_START_MS,
                        Scheduled::MeltdownStart,
                    );
                    self.timeline.schedule(
                        self.now_ms + sequences::MELTDOWN_END_MS,
                        Scheduled::MeltdownEnd,
                    );
                },
                Effect::StartRestore => {
                    let steps = sequences::recovery_sequence(self.restore_seed());
                    let end = self.schedule_steps(&steps);
                    self.timeline.schedule(
                        end + sequences::RESTORE_SETTLE_MS,
                        Scheduled::RestoreComplete,
                    );
                },
                Effect::StartGui => self.gui_open = true,
            }
        }
    }

    fn restore_seed(&self) -> u64 {
        let uptime = self.time.uptime_secs().unwrap_or_default();
        uptime.wrapping_mul(1000).wrapping_add(self.now_ms)
    }

    fn answer_reset(&mut self, answer: &str) -> CommandResult {
        self.pending_reset = false;
        self.log.push(OutputLine::input(format!("> {answer}")));
        let result = if answer.eq_ignore_ascii_case("y") {
            self.reset_all();
            CommandResult::system("  All progress has been reset.")
        } else {
            CommandResult::system("  Reset cancelled.")
        };
        self.log.push(OutputLine::system(result.output.clone()));
        result
    }

    /// Clear overlay, progression and preferences, in memory and in the
    /// store.
    fn reset_all(&mut self) {
        if let Err(e) = persist::reset_all(&mut self.store) {
            log::warn!("Failed to reset persisted state: {e}");
        }
        self.fs.reset();
        self.progress.reset();
        self.prefs = Preferences::default();
        self.sound.set_enabled(false);
        log::info!("All progress reset");
    }

    // -- keys -----------------------------------------------------------

    /// Handle a key outside line editing: editor input, or the konami
    /// watcher while the shell is idle.
    pub fn handle_key(&mut self, key: Key) {
        if let Some(editor) = &mut self.editor {
            let action = editor.handle_key(key, self.now_ms);
            self.apply_editor_action(action);
            return;
        }
        if self.konami.handle_key(key) {
            self.trigger_konami();
        }
    }

    fn apply_editor_action(&mut self, action: EditorAction) {
        let (save, quit) = match action {
            EditorAction::None => return,
            EditorAction::Save => (true, false),
            EditorAction::Quit => (false, true),
            EditorAction::SaveAndQuit => (true, true),
        };
        if save {
            self.save_editor();
        }
        if quit {
            self.editor = None;
        }
    }

    fn save_editor(&mut self) {
        let Some(editor) = &mut self.editor else {
            return;
        };
        match self.fs.write_file(editor.path(), &editor.content()) {
            Ok(()) => {
                editor.mark_saved();
                log::debug!("Saved {}", editor.path());
                self.persist();
            },
            Err(e) => editor.mark_save_failed(e.to_string()),
        }
    }

    fn trigger_konami(&mut self) {
        self.progress.state.record_egg("konami");
        let fresh = self.progress.grant(UnlockId::Channels);
        self.sound.play(SoundCue::KonamiUnlock);
        let text = if fresh {
            sequences::KONAMI_UNLOCK_TEXT
        } else {
            sequences::KONAMI_REPEAT_TEXT
        };
        self.log.push(OutputLine::system(text));
        self.announce_achievements();
        self.persist();
    }

    // -- autocomplete ---------------------------------------------------

    pub fn complete(&self, input: &str) -> TabCompletion {
        complete(
            input,
            &CompletionSources {
                registry: &self.registry,
                progress: &self.progress,
                fs: &self.fs,
                themes: self.themes.as_ref(),
            },
        )
    }

    // -- progression ----------------------------------------------------

    fn announce_achievements(&mut self) {
        let fresh = self.progress.poll_new_achievements();
        for achievement in &fresh {
            log::info!("Achievement unlocked: {}", achievement.id);
            self.log.push(OutputLine::system(format_notification(achievement)));
            self.sound.play(SoundCue::Achievement);
        }
        let completed = fresh.iter().any(|a| a.id == AchievementId::Completionist);
        if completed && self.progress.take_celebration() {
            let secs = self.now_ms.saturating_sub(self.started_ms) / 1000;
            let steps = sequences::celebration_sequence(&sequences::format_elapsed(secs));
            self.schedule_steps(&steps);
        }
    }

    /// Write everything persisted in one `apply`. Failures are logged.
    fn persist(&mut self) {
        if let Err(e) = self.try_persist() {
            log::warn!("Failed to persist session state: {e}");
        }
    }

    fn try_persist(&mut self) -> Result<()> {
        let mut records = self.progress.records()?;
        records.extend(persist::preference_records(&self.prefs)?);
        records.push(persist::overlay_record(self.fs.overlay())?);
        self.store.apply(&records, &[])
    }
}

#[cfg(test)]
mod tests;
