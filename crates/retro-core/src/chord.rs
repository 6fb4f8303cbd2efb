//! Two-key chord timing (`Ctrl+X` then a second key).

/// A single outstanding chord deadline. Arming replaces any previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChordTimer {
    window_ms: u64,
    deadline: Option<u64>,
}

impl ChordTimer {
    pub fn new(window_ms: u64) -> Self {
        Self {
            window_ms,
            deadline: None,
        }
    }

    /// Start (or restart) the chord at `now_ms`.
    pub fn arm(&mut self, now_ms: u64) {
        self.deadline = Some(now_ms + self.window_ms);
    }

    /// True while the chord is pending at `now_ms`. An expired chord is
    /// released.
    pub fn is_armed(&mut self, now_ms: u64) -> bool {
        match self.deadline {
            Some(deadline) if now_ms <= deadline => true,
            Some(_) => {
                self.deadline = None;
                false
            },
            None => false,
        }
    }

    /// Take the pending chord. True when it was armed and unexpired.
    pub fn consume(&mut self, now_ms: u64) -> bool {
        let armed = self.is_armed(now_ms);
        self.deadline = None;
        armed
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }
}
