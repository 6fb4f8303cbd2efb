//! RETROTERM line-mode entry point.
//!
//! Reads lines from stdin and feeds them to a session. A trailing tab
//! completes, a line starting with `<` is sent as raw keys (`<up>`,
//! `<esc>`, `<C-x>`), and while the editor is open every line is typed into
//! it. End of input quits.
//!
//! Config comes from the first argument or `RETROTERM_CONFIG`.

mod bell;
mod input;
mod render;
mod store;

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;

use bell::TerminalBell;
use input::LineAction;
use render::Printer;
use retro_core::config::ShellConfig;
use retro_core::platform::DesktopClock;
use retro_core::skin::TomlThemes;
use retro_core::vfs::ProfileData;
use retro_core::{Services, Session};
use store::JsonFileStore;

const DEFAULT_STATE_FILE: &str = "retroterm-state.json";

type App = Session<JsonFileStore, TerminalBell>;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = load_config()?;
    let profile = match &config.profile_path {
        Some(path) => ProfileData::from_toml(&fs::read_to_string(path)?)?,
        None => ProfileData::sample(),
    };
    let state_path = config
        .state_path
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_STATE_FILE));
    let store = JsonFileStore::open(state_path)?;
    log::info!(
        "Starting RetroTerm v{} for {} (state: {})",
        env!("CARGO_PKG_VERSION"),
        profile.name,
        store.path().display()
    );

    let services = Services {
        store,
        sound: TerminalBell::default(),
        time: Box::new(DesktopClock::new()),
        themes: Box::new(TomlThemes::builtin()?),
    };
    let mut session = Session::new(config, profile, services);
    let clock = Instant::now();
    let mut printer = Printer::default();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    session.start();
    run_timeline(&mut session, &clock, &mut printer, &mut out)?;

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        write_prompt(&session, &mut out)?;
        let Some(line) = lines.next().transpose()? else {
            break;
        };
        session.tick(elapsed_ms(&clock));
        handle_line(&mut session, &line, &mut out)?;
        run_timeline(&mut session, &clock, &mut printer, &mut out)?;
        close_surfaces(&mut session, &mut out)?;
        if let Some(editor) = session.editor() {
            writeln!(out, "{}", render::editor_view(editor))?;
        }
    }

    writeln!(out)?;
    log::info!("Session ended after {} lines", session.history().len());
    log::debug!("Bell rang {} times", session.sound().rung());
    Ok(())
}

fn load_config() -> Result<ShellConfig> {
    let Some(path) = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("RETROTERM_CONFIG").ok())
    else {
        return Ok(ShellConfig::default());
    };
    let config = ShellConfig::from_toml(&fs::read_to_string(&path)?)?;
    log::info!("Loaded config from {path}");
    Ok(config)
}

fn elapsed_ms(clock: &Instant) -> u64 {
    u64::try_from(clock.elapsed().as_millis()).unwrap_or(u64::MAX)
}

fn write_prompt(session: &App, out: &mut impl Write) -> io::Result<()> {
    if session.editor().is_some() {
        write!(out, "edit> ")?;
    } else if session.is_confirming_reset() {
        write!(out, "> ")?;
    } else {
        write!(out, "{}", session.prompt())?;
    }
    out.flush()
}

fn handle_line(session: &mut App, line: &str, out: &mut impl Write) -> io::Result<()> {
    if session.editor().is_some() {
        for key in input::editor_keys(line) {
            session.handle_key(key);
        }
        return Ok(());
    }

    match input::classify(line) {
        LineAction::Submit(text) => {
            session.submit(text);
        },
        LineAction::Keys(keys) => {
            for key in keys {
                session.handle_key(key);
            }
        },
        LineAction::Complete(partial) => {
            if let Some(view) = render::completion_view(&session.complete(partial)) {
                writeln!(out, "{view}")?;
            }
        },
    }
    Ok(())
}

/// Games and the desktop need a graphical front end; close them at once.
fn close_surfaces(session: &mut App, out: &mut impl Write) -> io::Result<()> {
    if let Some(game) = session.game() {
        writeln!(out, "  [{} needs the graphical front end]", game.as_str())?;
        session.end_game();
    }
    if session.gui_open() {
        writeln!(out, "  [desktop mode needs the graphical front end]")?;
        session.close_gui();
    }
    Ok(())
}

/// Print new output, sleeping through scheduled sequence steps until
/// none remain.
fn run_timeline(
    session: &mut App,
    clock: &Instant,
    printer: &mut Printer,
    out: &mut impl Write,
) -> io::Result<()> {
    loop {
        session.tick(elapsed_ms(clock));
        printer.flush_log(session.log(), out)?;
        let Some(due) = session.next_event_ms() else {
            return Ok(());
        };
        let wait = due.saturating_sub(elapsed_ms(clock));
        std::thread::sleep(Duration::from_millis(wait));
    }
}
