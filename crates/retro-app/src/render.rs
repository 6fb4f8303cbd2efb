//! Plain-text rendering of session state for a line terminal.

use std::io::{self, Write};

use retro_core::terminal::{OutputKind, TabCompletion};
use retro_core::{Editor, EditorMode, OutputLog};

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";
const RED: &str = "\x1b[31m";
const DIM: &str = "\x1b[2m";
const RESET: &str = "\x1b[0m";

/// Prints scrollback lines not yet shown.
#[derive(Debug, Default)]
pub struct Printer {
    printed: usize,
    clears: u64,
}

impl Printer {
    pub fn flush_log(&mut self, log: &OutputLog, out: &mut impl Write) -> io::Result<()> {
        let lines = log.lines();
        if log.clears() != self.clears {
            out.write_all(CLEAR_SCREEN.as_bytes())?;
            self.clears = log.clears();
            self.printed = 0;
        }
        for line in &lines[self.printed..] {
            match line.kind {
                OutputKind::Error => writeln!(out, "{RED}{}{RESET}", line.text)?,
                OutputKind::Output | OutputKind::System => writeln!(out, "{}", line.text)?,
            }
        }
        self.printed = lines.len();
        out.flush()
    }
}

/// The editor buffer with line numbers and a status line.
pub fn editor_view(editor: &Editor) -> String {
    let (row, col) = editor.cursor();
    let width = editor.lines().len().to_string().len();
    let mut out = vec![format!("{DIM}-- {} --{RESET}", editor.path())];
    for (i, line) in editor.lines().iter().enumerate() {
        let marker = if i == row { '>' } else { ' ' };
        out.push(format!("{marker}{:>width$} {line}", i + 1));
    }
    let status = match (editor.mode(), editor.command_line()) {
        (EditorMode::Command, Some(cmd)) => format!(":{cmd}"),
        (EditorMode::Insert, _) => "-- INSERT --".to_string(),
        _ => editor.status().to_string(),
    };
    let dirty = if editor.is_dirty() { " [+]" } else { "" };
    out.push(format!("{status}{dirty}  {},{}", row + 1, col + 1));
    out.join("\n")
}

/// Candidates from a tab press, one per line.
pub fn completion_view(completion: &TabCompletion) -> Option<String> {
    match completion {
        TabCompletion::NoMatch => None,
        TabCompletion::Filled(line) => Some(line.clone()),
        TabCompletion::Choices(choices) => Some(
            choices
                .iter()
                .map(|c| format!("  {:<20} {}", c.value, c.description))
                .collect::<Vec<_>>()
                .join("\n"),
        ),
    }
}
