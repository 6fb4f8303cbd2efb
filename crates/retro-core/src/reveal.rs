//! Staged (typewriter) reveal of output text.

/// Reveals `text` one character per `speed_ms`. A speed of zero shows
/// everything at once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reveal {
    text: String,
    total_chars: usize,
    shown_chars: usize,
    speed_ms: u64,
    carry_ms: u64,
}

impl Reveal {
    pub fn new(text: impl Into<String>, speed_ms: u64) -> Self {
        let text = text.into();
        let total_chars = text.chars().count();
        Self {
            shown_chars: if speed_ms == 0 { total_chars } else { 0 },
            text,
            total_chars,
            speed_ms,
            carry_ms: 0,
        }
    }

    /// Advance by `elapsed_ms` and return the visible prefix.
    pub fn tick(&mut self, elapsed_ms: u64) -> &str {
        if !self.is_done() {
            let budget = self.carry_ms + elapsed_ms;
            let steps = usize::try_from(budget / self.speed_ms).unwrap_or(usize::MAX);
            self.carry_ms = budget % self.speed_ms;
            self.shown_chars = self.shown_chars.saturating_add(steps).min(self.total_chars);
        }
        self.visible()
    }

    /// Jump straight to the fully revealed state.
    pub fn skip(&mut self) {
        self.shown_chars = self.total_chars;
        self.carry_ms = 0;
    }

    pub fn is_done(&self) -> bool {
        self.shown_chars >= self.total_chars
    }

    pub fn visible(&self) -> &str {
        let end = self
            .text
            .char_indices()
            .nth(self.shown_chars)
            .map_or(self.text.len(), |(i, _)| i);
        &self.text[..end]
    }

    pub fn full_text(&self) -> &str {
        &self.text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reveals_by_speed_with_carry() {
        let mut r = Reveal::new("hello", 10);
        assert_eq!(r.visible(), "");
        assert_eq!(r.tick(15), "h");
        assert_eq!(r.tick(5), "he");
        assert_eq!(r.tick(1000), "hello");
        assert!(r.is_done());
    }

    #[test]
    fn skip_is_atomic() {
        let mut r = Reveal::new("░░ multi-byte ░░", 50);
        r.tick(60);
        r.skip();
        assert!(r.is_done());
        assert_eq!(r.visible(), r.full_text());
    }

    #[test]
    fn zero_speed_is_immediate() {
        let r = Reveal::new("now", 0);
        assert!(r.is_done());
        assert_eq!(r.visible(), "now");
    }

    #[test]
    fn multibyte_prefix_is_char_aligned() {
        let mut r = Reveal::new("★ok", 1);
        assert_eq!(r.tick(1), "★");
        assert_eq!(r.tick(1), "★o");
    }
}
