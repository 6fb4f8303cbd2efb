//! Modal text editor for overlay files.
//!
//! Vim-style normal/insert/command modes plus a few emacs bindings. The
//! editor only edits its buffer; saving and quitting are reported to the
//! caller as [`EditorAction`]s so the filesystem stays with the session.

use retro_vfs::CanonicalPath;

use crate::chord::ChordTimer;
use crate::input::Key;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EditorMode {
    #[default]
    Normal,
    Insert,
    /// Typing an ex command after `:`.
    Command,
}

/// What the session must do after a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorAction {
    None,
    Save,
    Quit,
    SaveAndQuit,
}

#[derive(Debug, Clone)]
pub struct Editor {
    path: CanonicalPath,
    lines: Vec<String>,
    row: usize,
    col: usize,
    mode: EditorMode,
    command: String,
    status: String,
    dirty: bool,
    chord: ChordTimer,
}

/// Byte offset of char column `col` in `line`, clamped to the end.
fn byte_at(line: &str, col: usize) -> usize {
    line.char_indices().nth(col).map_or(line.len(), |(i, _)| i)
}

fn char_len(line: &str) -> usize {
    line.chars().count()
}

impl Editor {
    pub fn open(path: CanonicalPath, content: &str, chord_window_ms: u64) -> Self {
        let lines = if content.is_empty() {
            vec![String::new()]
        } else {
            content.split('\n').map(str::to_string).collect()
        };
        Self {
            path,
            lines,
            row: 0,
            col: 0,
            mode: EditorMode::Normal,
            command: String::new(),
            status: String::new(),
            dirty: false,
            chord: ChordTimer::new(chord_window_ms),
        }
    }

    pub fn path(&self) -> &CanonicalPath {
        &self.path
    }

    pub fn content(&self) -> String {
        self.lines.join("\n")
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    pub fn cursor(&self) -> (usize, usize) {
        (self.row, self.col)
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    /// The `:` line being typed, if any.
    pub fn command_line(&self) -> Option<&str> {
        (self.mode == EditorMode::Command).then_some(self.command.as_str())
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Called by the session after the buffer was written.
    pub fn mark_saved(&mut self) {
        self.dirty = false;
        self.status = format!("\"{}\" written", self.path);
    }

    /// Called by the session when a write failed.
    pub fn mark_save_failed(&mut self, message: impl Into<String>) {
        self.status = message.into();
    }

    pub fn handle_key(&mut self, key: Key, now_ms: u64) -> EditorAction {
        // Chords work in every mode.
        if key == Key::Ctrl('x') {
            self.chord.arm(now_ms);
            self.status = "C-x -".to_string();
            return EditorAction::None;
        }
        if self.chord.consume(now_ms) {
            match key {
                Key::Ctrl('s') => return EditorAction::Save,
                Key::Ctrl('c') => return EditorAction::SaveAndQuit,
                _ => self.status.clear(),
            }
        }
        if key == Key::Ctrl('s') {
            return EditorAction::Save;
        }

        match self.mode {
            EditorMode::Command => self.command_key(key),
            EditorMode::Normal => {
                self.normal_key(key);
                EditorAction::None
            },
            EditorMode::Insert => {
                self.insert_key(key);
                EditorAction::None
            },
        }
    }

    // -- command mode ---------------------------------------------------

    fn command_key(&mut self, key: Key) -> EditorAction {
        match key {
            Key::Enter => {
                let cmd = std::mem::take(&mut self.command);
                self.mode = EditorMode::Normal;
                match cmd.trim() {
                    "w" => EditorAction::Save,
                    "q" if self.dirty => {
                        self.status = "No write since last change (use :wq or :q!)".to_string();
                        EditorAction::None
                    },
                    "q" | "q!" => EditorAction::Quit,
                    "wq" | "x" => EditorAction::SaveAndQuit,
                    other => {
                        self.status = format!("Not a command: {other}");
                        EditorAction::None
                    },
                }
            },
            Key::Escape => {
                self.leave_command();
                EditorAction::None
            },
            Key::Backspace => {
                if self.command.pop().is_none() || self.command.is_empty() {
                    self.leave_command();
                }
                EditorAction::None
            },
            Key::Char(c) => {
                self.command.push(c);
                EditorAction::None
            },
            _ => EditorAction::None,
        }
    }

    fn leave_command(&mut self) {
        self.mode = EditorMode::Normal;
        self.command.clear();
    }

    // -- normal mode ----------------------------------------------------

    fn normal_key(&mut self, key: Key) {
        self.status.clear();
        match key {
            Key::Char('i') => self.mode = EditorMode::Insert,
            Key::Char('a') => {
                self.mode = EditorMode::Insert;
                self.col = (self.col + 1).min(self.line_len());
            },
            Key::Char('o') => {
                self.lines.insert(self.row + 1, String::new());
                self.row += 1;
                self.col = 0;
                self.mode = EditorMode::Insert;
                self.dirty = true;
            },
            Key::Char('O') => {
                self.lines.insert(self.row, String::new());
                self.col = 0;
                self.mode = EditorMode::Insert;
                self.dirty = true;
            },
            Key::Char(':') => {
                self.mode = EditorMode::Command;
                self.command.clear();
            },
            Key::Char('h') | Key::Left => self.col = self.col.saturating_sub(1),
            Key::Char('l') | Key::Right => {
                self.col = (self.col + 1).min(self.line_len().saturating_sub(1));
            },
            Key::Char('j') | Key::Down => self.move_row(self.row + 1),
            Key::Char('k') | Key::Up => self.move_row(self.row.saturating_sub(1)),
            Key::Char('0') => self.col = 0,
            Key::Char('$') => self.col = self.line_len().saturating_sub(1),
            Key::Char('g') => (self.row, self.col) = (0, 0),
            Key::Char('G') => (self.row, self.col) = (self.lines.len() - 1, 0),
            Key::Char('x') => {
                let len = self.line_len();
                if len > 0 {
                    let line = &mut self.lines[self.row];
                    let at = byte_at(line, self.col);
                    if at < line.len() {
                        line.remove(at);
                    }
                    self.col = self.col.min(len.saturating_sub(2));
                    self.dirty = true;
                }
            },
            Key::Char('d') => {
                if self.lines.len() > 1 {
                    self.lines.remove(self.row);
                    self.row = self.row.min(self.lines.len() - 1);
                } else {
                    self.lines[0].clear();
                }
                self.col = 0;
                self.dirty = true;
            },
            _ => {},
        }
    }

    // -- insert mode ----------------------------------------------------

    fn insert_key(&mut self, key: Key) {
        match key {
            Key::Escape => {
                self.mode = EditorMode::Normal;
                self.col = self.col.saturating_sub(1);
            },
            Key::Enter => {
                let line = &mut self.lines[self.row];
                let at = byte_at(line, self.col);
                let rest = line.split_off(at);
                self.lines.insert(self.row + 1, rest);
                self.row += 1;
                self.col = 0;
                self.dirty = true;
            },
            Key::Backspace => self.backspace(),
            Key::Tab => {
                for _ in 0..2 {
                    self.insert_char(' ');
                }
            },
            Key::Char(c) => self.insert_char(c),
            Key::Left => self.col = self.col.saturating_sub(1),
            Key::Right => self.col = (self.col + 1).min(self.line_len()),
            Key::Up => self.move_row(self.row.saturating_sub(1)),
            Key::Down => self.move_row(self.row + 1),
            Key::Ctrl('a') => self.col = 0,
            Key::Ctrl('e') => self.col = self.line_len(),
            Key::Ctrl('f') => self.col = (self.col + 1).min(self.line_len()),
            Key::Ctrl('b') => self.col = self.col.saturating_sub(1),
            Key::Ctrl('n') => self.move_row(self.row + 1),
            Key::Ctrl('p') => self.move_row(self.row.saturating_sub(1)),
            Key::Ctrl('k') => {
                let line = &mut self.lines[self.row];
                let at = byte_at(line, self.col);
                if at < line.len() {
                    line.truncate(at);
                    self.dirty = true;
                }
            },
            Key::Ctrl(_) => {},
        }
    }

    fn insert_char(&mut self, c: char) {
        let line = &mut self.lines[self.row];
        let at = byte_at(line, self.col);
        line.insert(at, c);
        self.col += 1;
        self.dirty = true;
    }

    fn backspace(&mut self) {
        if self.col > 0 {
            let line = &mut self.lines[self.row];
            let at = byte_at(line, self.col - 1);
            line.remove(at);
            self.col -= 1;
            self.dirty = true;
        } else if self.row > 0 {
            let line = self.lines.remove(self.row);
            self.row -= 1;
            self.col = self.line_len();
            self.lines[self.row].push_str(&line);
            self.dirty = true;
        }
    }

    fn line_len(&self) -> usize {
        char_len(&self.lines[self.row])
    }

    fn move_row(&mut self, row: usize) {
        self.row = row.min(self.lines.len() - 1);
        self.col = self.col.min(self.line_len());
    }
}
