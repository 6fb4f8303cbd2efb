//! Keys the session reacts to outside of line submission.

/// A key press, already mapped from the platform's native event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Enter,
    Escape,
    Tab,
    Backspace,
    Char(char),
    /// `Ctrl` plus a lowercase letter.
    Ctrl(char),
}

// ---------------------------------------------------------------------------
// Konami code
// ---------------------------------------------------------------------------

const KONAMI: [Key; 10] = [
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

/// Watches the key stream for ↑↑↓↓←→←→BA.
#[derive(Debug, Clone, Default)]
pub struct KonamiTracker {
    progress: usize,
}

impl KonamiTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one key. True exactly when the sequence completes.
    pub fn handle_key(&mut self, key: Key) -> bool {
        if key == KONAMI[self.progress] {
            self.progress += 1;
            if self.progress == KONAMI.len() {
                self.progress = 0;
                return true;
            }
        } else {
            // A wrong key may still start a new attempt.
            self.progress = usize::from(key == KONAMI[0]);
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(tracker: &mut KonamiTracker, keys: &[Key]) -> bool {
        keys.iter().fold(false, |_, k| tracker.handle_key(*k))
    }

    #[test]
    fn full_sequence_triggers_once() {
        let mut t = KonamiTracker::new();
        assert!(feed(&mut t, &KONAMI));
        assert!(!t.handle_key(Key::Up));
    }

    #[test]
    fn mistake_restarts() {
        let mut t = KonamiTracker::new();
        assert!(!feed(&mut t, &KONAMI[..5]));
        assert!(!t.handle_key(Key::Char('x')));
        assert!(feed(&mut t, &KONAMI));
    }

    #[test]
    fn wrong_key_that_starts_sequence_counts() {
        let mut t = KonamiTracker::new();
        // Up, Up, Up: the third Up breaks the run but begins a new one.
        feed(&mut t, &[Key::Up, Key::Up, Key::Up]);
        assert!(feed(&mut t, &KONAMI[1..]));
    }
}
