//! Deterministic scheduling on a caller-driven millisecond clock.
//!
//! Nothing here reads a real clock. The session passes `now` in, and due
//! events come back in due order, ties broken by scheduling order.

use retro_terminal::OutputKind;

/// Handle for cancelling a scheduled event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

#[derive(Debug)]
struct Entry<E> {
    due_ms: u64,
    id: TimerId,
    event: E,
}

/// Pending events keyed by absolute due time.
#[derive(Debug)]
pub struct Timeline<E> {
    entries: Vec<Entry<E>>,
    next_id: u64,
}

impl<E> Default for Timeline<E> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 0,
        }
    }
}

impl<E> Timeline<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `event` at absolute time `due_ms`.
    pub fn schedule(&mut self, due_ms: u64, event: E) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        // Insert after every entry due no later, so equal times keep
        // scheduling order.
        let pos = self.entries.partition_point(|e| e.due_ms <= due_ms);
        self.entries.insert(pos, Entry { due_ms, id, event });
        id
    }

    /// Drop a pending event. False when it already fired or never existed.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    /// Drop every pending event.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Remove and return every event due at or before `now_ms`.
    pub fn advance(&mut self, now_ms: u64) -> Vec<E> {
        let due = self.entries.partition_point(|e| e.due_ms <= now_ms);
        self.entries.drain(..due).map(|e| e.event).collect()
    }

    /// Due time of the next pending event.
    pub fn next_due(&self) -> Option<u64> {
        self.entries.first().map(|e| e.due_ms)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One line of terminal output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLine {
    pub text: String,
    pub kind: OutputKind,
}

impl OutputLine {
    pub fn new(text: impl Into<String>, kind: OutputKind) -> Self {
        Self {
            text: text.into(),
            kind,
        }
    }

    pub fn system(text: impl Into<String>) -> Self {
        Self::new(text, OutputKind::System)
    }

    /// Echo of a submitted line.
    pub fn input(text: impl Into<String>) -> Self {
        Self::new(text, OutputKind::Output)
    }
}

/// Append-only terminal scrollback. Only `clear` removes lines.
#[derive(Debug, Clone, Default)]
pub struct OutputLog {
    lines: Vec<OutputLine>,
    clears: u64,
}

impl OutputLog {
    pub fn push(&mut self, line: OutputLine) {
        self.lines.push(line);
    }

    pub fn lines(&self) -> &[OutputLine] {
        &self.lines
    }

    pub fn last(&self) -> Option<&OutputLine> {
        self.lines.last()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
        self.clears += 1;
    }

    /// Times the log has been cleared.
    pub fn clears(&self) -> u64 {
        self.clears
    }

    /// All line texts joined with newlines.
    pub fn text(&self) -> String {
        self.lines
            .iter()
            .map(|l| l.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.lines.iter().any(|l| l.text.contains(needle))
    }
}
