use std::io::Write;

use retro_core::platform::{SoundCue, SoundSink};

/// Rings the terminal bell for the cues that matter in a line terminal.
#[derive(Debug, Default)]
pub struct TerminalBell {
    enabled: bool,
    rung: usize,
}

impl TerminalBell {
    pub fn rung(&self) -> usize {
        self.rung
    }

    fn rings(cue: SoundCue) -> bool {
        matches!(
            cue,
            SoundCue::Error | SoundCue::Achievement | SoundCue::KonamiUnlock | SoundCue::GameOver
        )
    }
}

impl SoundSink for TerminalBell {
    fn play(&mut self, cue: SoundCue) {
        if !self.enabled {
            return;
        }
        log::debug!("sound cue: {}", cue.name());
        if Self::rings(cue) {
            self.rung += 1;
            let mut err = std::io::stderr();
            let _ = err.write_all(b"\x07").and_then(|()| err.flush());
        }
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }
}
