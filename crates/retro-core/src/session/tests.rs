//! End-to-end tests for the session engine.

use super::*;
use retro_platform::{CueRecorder, FixedClock, SystemTime};
use retro_skin::TomlThemes;
use retro_types::storage::{MemoryStore, keys};
use retro_vfs::CanonicalPath;

use crate::editor::EditorMode;
use crate::input::Key;

type TestSession = Session<MemoryStore, CueRecorder>;

fn session_with(config: ShellConfig, store: MemoryStore) -> TestSession {
    let services = Services {
        store,
        sound: CueRecorder::new(),
        time: Box::new(FixedClock::new(SystemTime {
            year: 2026,
            month: 2,
            day: 13,
            hour: 9,
            minute: 15,
            second: 0,
        })),
        themes: Box::new(TomlThemes::builtin().unwrap()),
    };
    Session::new(config, ProfileData::sample(), services)
}

fn session() -> TestSession {
    session_with(ShellConfig::default(), MemoryStore::new())
}

fn reopen(s: TestSession) -> TestSession {
    session_with(ShellConfig::default(), s.into_store())
}

fn count(s: &TestSession, needle: &str) -> usize {
    s.log()
        .lines()
        .iter()
        .filter(|l| l.text.contains(needle))
        .count()
}

fn type_keys(s: &mut TestSession, keys: &[Key]) {
    for key in keys {
        s.handle_key(*key);
    }
}

fn chars(text: &str) -> Vec<Key> {
    text.chars().map(Key::Char).collect()
}

const KONAMI_KEYS: [Key; 10] = [
    Key::Up,
    Key::Up,
    Key::Down,
    Key::Down,
    Key::Left,
    Key::Right,
    Key::Left,
    Key::Right,
    Key::Char('b'),
    Key::Char('a'),
];

// ---------------------------------------------------------------------------
// Boot
// ---------------------------------------------------------------------------

#[test]
fn boot_plays_once_per_session() {
    let mut s = session();
    s.start();
    assert!(s.is_booting());
    assert!(s.log().lines().is_empty());
    s.start();
    assert_eq!(s.next_event_ms(), Some(300));

    s.tick(10_000);
    assert!(!s.is_booting());
    assert!(s.has_booted());
    assert!(s.log().contains("AVERY QUINN"));
    assert!(s.log().contains("Good morning"));

    s.start();
    assert!(!s.is_booting());
    assert_eq!(count(&s, "AVERY QUINN"), 1);
    assert_eq!(
        s.log().last().map(|l| l.text.as_str()),
        Some(sequences::READY_TEXT)
    );
}

#[test]
fn a_new_session_boots_again() {
    let mut s = session();
    s.start();
    s.tick(10_000);
    assert!(s.store().get("retroterm.booted").is_none());

    let mut again = reopen(s);
    assert!(!again.has_booted());
    again.start();
    assert!(again.is_booting());
    again.tick(10_000);
    assert!(again.log().contains("AVERY QUINN"));
    assert!(again.has_booted());
}

#[test]
fn boot_lines_arrive_on_schedule() {
    let mut s = session();
    s.start();
    s.tick(299);
    assert!(s.log().lines().is_empty());
    s.tick(300);
    assert_eq!(s.log().lines().len(), 1);
    assert_eq!(s.next_event_ms(), Some(500));
}

// ---------------------------------------------------------------------------
// Submission
// ---------------------------------------------------------------------------

#[test]
fn submit_echoes_prompt_and_output() {
    let mut s = session();
    let r = s.submit("pwd");
    assert_eq!(r.output, "~");
    let texts: Vec<&str> = s.log().lines().iter().map(|l| l.text.as_str()).collect();
    assert_eq!(texts, vec!["visitor@portfolio:~$ pwd", "~"]);
    assert_eq!(s.history(), ["pwd"]);
}

#[test]
fn blank_lines_do_nothing() {
    let mut s = session();
    assert_eq!(s.submit("   "), CommandResult::empty());
    assert!(s.log().lines().is_empty());
    assert!(s.history().is_empty());
}

#[test]
fn history_is_bounded() {
    let config = ShellConfig {
        history_limit: 3,
        ..ShellConfig::default()
    };
    let mut s = session_with(config, MemoryStore::new());
    for line in ["pwd", "ls", "about", "skills", "pwd"] {
        s.submit(line);
    }
    assert_eq!(s.history(), ["about", "skills", "pwd"]);
}

#[test]
fn clear_empties_the_log() {
    let mut s = session();
    s.submit("ls");
    s.submit("clear");
    assert!(s.log().lines().is_empty());
}

#[test]
fn output_is_revealed_over_time() {
    let mut s = session();
    s.submit("about");
    assert!(s.reveal().is_some());
    s.tick(1_000_000);
    assert!(s.reveal().is_none());
}

#[test]
fn errors_play_the_error_cue() {
    let mut s = session();
    s.submit("unmute");
    assert!(s.sound().is_enabled());
    let r = s.submit("frobnicate");
    assert!(r.is_error());
    assert!(s.sound().played().contains(&SoundCue::Error));
}

#[test]
fn chat_mode_runs_nothing() {
    let mut s = session();
    s.submit("/chat");
    assert_eq!(s.mode(), Mode::Chat);
    let r = s.submit("ls");
    assert!(r.output.contains("AI chat is coming soon"));
    assert!(!s.progress().state.commands_used.contains("ls"));
    s.submit("/command");
    assert_eq!(s.mode(), Mode::Command);
}

#[test]
fn pipes_filter_and_unlock_pipe_dream() {
    let mut s = session();
    let r = s.submit("skills | grep Python");
    assert!(r.output.contains("Python"));
    assert!(!r.output.contains("Linux"));
    assert!(s.progress().state.pipe_used);
    assert!(s.log().contains("Achievement Unlocked: Pipe Dream"));
}

#[test]
fn reading_a_dotfile_finds_the_hidden_path() {
    let mut s = session();
    s.submit("cat .bashrc");
    assert!(s.progress().state.files_viewed.contains("~/.bashrc"));
    assert_eq!(count(&s, "Achievement Unlocked: Hidden Path"), 1);
    s.submit("cat .vimrc");
    assert_eq!(count(&s, "Achievement Unlocked: Hidden Path"), 1);
}

#[test]
fn failing_last_filter_still_tracks_the_command() {
    let mut s = session();
    let r = s.submit("cat .bashrc | nosuch");
    assert!(r.is_error());
    assert!(s.progress().state.files_viewed.contains("~/.bashrc"));
    assert!(s.progress().state.pipe_used);

    s.submit("cd projects | nosuch");
    assert!(s.progress().state.directories_visited.contains("~/projects"));

    s.submit("cat nothing.txt | wc");
    assert!(!s.progress().state.files_viewed.contains("~/nothing.txt"));
}

#[test]
fn failed_cd_records_no_directory() {
    let mut s = session();
    s.submit("cd nowhere");
    assert!(s.progress().state.commands_used.contains("cd"));
    assert!(s.progress().state.directories_visited.is_empty());
    s.submit("cd projects");
    assert!(s.progress().state.directories_visited.contains("~/projects"));
}

#[test]
fn games_start_and_end() {
    let mut s = session();
    s.submit("snake");
    assert_eq!(s.game(), Some(Game::Snake));
    assert!(s.log().contains("Achievement Unlocked: Game On"));
    s.end_game();
    assert_eq!(s.game(), None);
}

// ---------------------------------------------------------------------------
// Files and the editor
// ---------------------------------------------------------------------------

#[test]
fn user_file_lifecycle() {
    let mut s = session();
    assert!(s.submit("touch notes.txt").is_error());

    s.submit("vim");
    assert!(s.progress().has(UnlockId::Editor));

    assert!(!s.submit("touch notes.txt").is_error());
    assert!(s.submit("ls").output.contains("notes.txt"));
    assert_eq!(s.submit("cat notes.txt").output, "");

    s.submit("vim notes.txt");
    assert!(s.editor().is_some());
    type_keys(&mut s, &[Key::Char('i')]);
    type_keys(&mut s, &chars("hi"));
    type_keys(&mut s, &[Key::Escape, Key::Char(':')]);
    type_keys(&mut s, &chars("wq"));
    type_keys(&mut s, &[Key::Enter]);
    assert!(s.editor().is_none());
    assert_eq!(s.submit("cat notes.txt").output, "hi");

    assert!(!s.submit("rm notes.txt").is_error());
    let r = s.submit("cat notes.txt");
    assert!(r.is_error());
    assert!(r.output.contains("No such file or directory"));
}

#[test]
fn submit_is_ignored_while_editing() {
    let mut s = session();
    s.submit("vim");
    s.submit("vim about.txt");
    assert_eq!(s.submit("ls"), CommandResult::empty());
    assert_eq!(s.editor().map(|e| e.mode()), Some(EditorMode::Normal));
}

#[test]
fn editing_a_base_file_keeps_the_shadow_copy() {
    let mut s = session();
    s.submit("vim");
    s.submit("vim about.txt");
    let about = CanonicalPath::parse("~/about.txt");
    assert!(s.fs().is_user_file(&about));

    type_keys(&mut s, &[Key::Char('i'), Key::Char('X'), Key::Escape]);
    type_keys(&mut s, &[Key::Ctrl('s')]);
    assert_eq!(
        s.editor().map(|e| e.status().to_string()).as_deref(),
        Some("\"~/about.txt\" written")
    );
    type_keys(&mut s, &[Key::Char(':'), Key::Char('q'), Key::Enter]);
    assert!(s.editor().is_none());

    s.submit("vim about.txt");
    let content = s.editor().map(|e| e.content()).unwrap_or_default();
    assert!(content.starts_with('X'));
}

#[test]
fn emacs_chord_saves_and_quits() {
    let mut s = session();
    s.submit("vim");
    s.submit("emacs story.md");
    type_keys(&mut s, &[Key::Char('i')]);
    type_keys(&mut s, &chars("once"));
    type_keys(&mut s, &[Key::Ctrl('x'), Key::Ctrl('c')]);
    assert!(s.editor().is_none());
    assert_eq!(s.fs().read(&CanonicalPath::parse("~/story.md")), Some("once"));
    assert!(s.progress().state.has_egg("editor_emacs"));
}

// ---------------------------------------------------------------------------
// Konami
// ---------------------------------------------------------------------------

#[test]
fn konami_unlocks_channels_once() {
    let mut s = session();
    type_keys(&mut s, &KONAMI_KEYS);
    assert!(s.progress().has(UnlockId::Channels));
    assert!(s.log().contains("KONAMI CODE ACTIVATED!"));
    assert!(s.log().contains("Achievement Unlocked: Secret Code"));

    type_keys(&mut s, &KONAMI_KEYS);
    assert!(s.log().contains("Channel system already unlocked!"));
    assert_eq!(count(&s, "Achievement Unlocked: Secret Code"), 1);

    s.submit("channel 3");
    assert_eq!(s.channel(), 3);
}

// ---------------------------------------------------------------------------
// Meltdown and restore
// ---------------------------------------------------------------------------

#[test]
fn meltdown_runs_on_the_timeline() {
    let mut s = session();
    s.submit("rm -rf /");
    assert!(!s.meltdown_active());

    s.tick(799);
    assert!(!s.meltdown_active());
    s.tick(800);
    assert!(s.meltdown_active());

    s.tick(3499);
    assert_eq!(s.prefs().theme, "amber");
    s.tick(3500);
    assert!(!s.meltdown_active());
    assert_eq!(s.prefs().theme, "glitch");
    assert!(s.log().contains("Theme 'glitch' activated."));
    assert!(s.log().contains("Achievement Unlocked: Glitch Lord"));
    assert_eq!(s.store().get(keys::THEME).as_deref(), Some("\"glitch\""));
}

#[test]
fn restore_returns_to_amber() {
    let mut s = session();
    s.submit("rm -rf /");
    s.tick(5_000);
    assert!(!s.submit("restore").is_error());
    assert_eq!(s.prefs().theme, "glitch");

    s.tick(60_000);
    assert!(s.log().contains("System restored successfully."));
    assert_eq!(s.prefs().theme, "amber");
    assert!(s.next_event_ms().is_none());
}

// ---------------------------------------------------------------------------
// Reset
// ---------------------------------------------------------------------------

#[test]
fn reset_can_be_cancelled() {
    let mut s = session();
    s.submit("skills | grep Rust");
    s.submit("reset");
    assert!(s.is_confirming_reset());

    let r = s.submit("n");
    assert_eq!(r.output, "  Reset cancelled.");
    assert!(!s.is_confirming_reset());
    assert!(s.progress().state.pipe_used);
}

#[test]
fn confirmed_reset_clears_everything_but_the_session() {
    let mut s = session();
    s.start();
    s.tick(10_000);
    s.submit("vim");
    s.submit("touch notes.txt");
    s.submit("theme green");
    s.submit("reset");
    let r = s.submit("y");
    assert_eq!(r.output, "  All progress has been reset.");

    assert!(!s.fs().exists(&CanonicalPath::parse("~/notes.txt")));
    assert!(!s.progress().has(UnlockId::Editor));
    assert_eq!(s.prefs(), &Preferences::default());
    assert!(s.store().get(keys::ACHIEVEMENTS).is_none());
    assert!(s.store().get(keys::USER_FILES).is_none());
    assert!(s.has_booted());
    assert!(s.log().contains("> y"));
}

// ---------------------------------------------------------------------------
// Persistence
// ---------------------------------------------------------------------------

#[test]
fn state_survives_a_reload() {
    let mut s = session();
    s.submit("vim");
    s.submit("touch notes.txt");
    s.submit("theme green");
    s.submit("fontsize large");

    let s = reopen(s);
    assert!(s.fs().exists(&CanonicalPath::parse("~/notes.txt")));
    assert_eq!(s.prefs().theme, "green");
    assert!(s.progress().has(UnlockId::Editor));
    assert!(s.progress().state.themes_used.contains("green"));
}

#[test]
fn locked_stored_theme_falls_back() {
    let mut store = MemoryStore::new();
    store.set(keys::THEME, "\"vaporwave\"").unwrap();
    let s = session_with(ShellConfig::default(), store);
    assert_eq!(s.prefs().theme, "amber");
}

#[test]
fn corrupt_records_start_fresh() {
    let mut store = MemoryStore::new();
    store.set(keys::ACHIEVEMENTS, "not json").unwrap();
    store.set(keys::USER_FILES, "[[1,2]]").unwrap();
    let mut s = session_with(ShellConfig::default(), store);
    assert!(s.fs().overlay().is_empty());
    assert_eq!(s.submit("pwd").output, "~");
}

// ---------------------------------------------------------------------------
// Full completion
// ---------------------------------------------------------------------------

fn complete_everything(s: &mut TestSession) {
    for line in [
        "sudo ls",
        "theme green",
        "theme blue",
        "theme matrix",
        "theme dracula",
        "theme amber",
        "cat ~/about.txt",
        "cat ~/contact.txt",
        "cat ~/.bashrc",
        "cat ~/.vimrc",
        "cat ~/skills/languages.txt",
        "cat ~/skills/infrastructure.txt",
        "cat ~/education/degree.txt",
        "cat ~/projects/tidepool/README.md",
        "cd ~/projects",
        "cd ~/skills",
        "cd ~/education",
        "cd ~/experience",
        "cd ~/.secret",
        "cd ~",
        "snake",
        "skills | grep Python",
        "ls",
        "pwd",
        "help",
        "neofetch",
        "history",
        "tree",
        "about",
        "education",
        "vim",
        "rm -rf /",
    ] {
        s.submit(line);
    }
    s.end_game();
    s.tick(s.now_ms() + 5_000);
    type_keys(s, &KONAMI_KEYS);
}

#[test]
fn completing_everything_celebrates_once() {
    let mut s = session();
    complete_everything(&mut s);
    assert!(s.progress().is_fully_unlocked());
    assert_eq!(count(&s, "Achievement Unlocked: Completionist"), 1);

    let before = s.now_ms();
    s.tick(before + 1_499);
    assert!(!s.log().contains("SYSTEM OVERRIDE DETECTED"));
    s.tick(before + 10_000);
    assert_eq!(count(&s, "100% COMPLETION ACHIEVED"), 1);
    assert!(s.log().contains("Completion time this session:"));

    let help = s.submit("help").output;
    assert!(help.contains("Secret (100%)"));
    assert!(help.contains("iddqd"));
    assert!(s.submit("achievements").output.contains("Progress: 13/13"));
    assert!(s.submit("iddqd").output.contains("God mode already active"));

    let mut s = reopen(s);
    s.start();
    s.submit("pwd");
    s.tick(100_000);
    assert!(!s.log().contains("Achievement Unlocked"));
    assert!(!s.log().contains("100% COMPLETION ACHIEVED"));
}

#[test]
fn iddqd_is_hidden_until_completion() {
    let mut s = session();
    assert!(s.submit("iddqd").is_error());
    assert!(!s.submit("help").output.contains("iddqd"));
}

// ---------------------------------------------------------------------------
// Autocomplete
// ---------------------------------------------------------------------------

#[test]
fn tab_completes_against_the_live_filesystem() {
    let mut s = session();
    assert_eq!(
        s.complete("cd proj"),
        TabCompletion::Filled("cd projects/".to_string())
    );
    s.submit("vim");
    s.submit("touch zebra.txt");
    assert_eq!(
        s.complete("cat zeb"),
        TabCompletion::Filled("cat zebra.txt ".to_string())
    );
}
