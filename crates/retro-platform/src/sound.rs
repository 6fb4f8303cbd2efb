//! Sound sink abstraction.
//!
//! The shell only names cues; synthesis lives with the presentation layer.
//! `play` is fire-and-forget and must never fail a command.

/// A named sound effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundCue {
    Keypress,
    Enter,
    Error,
    Boot,
    Achievement,
    GameOver,
    PowerOn,
    PowerDown,
    ChannelChange,
    KonamiUnlock,
    Meltdown,
    RestoreComplete,
}

impl SoundCue {
    pub fn name(self) -> &'static str {
        match self {
            Self::Keypress => "keypress",
            Self::Enter => "enter",
            Self::Error => "error",
            Self::Boot => "boot",
            Self::Achievement => "achievement",
            Self::GameOver => "game_over",
            Self::PowerOn => "power_on",
            Self::PowerDown => "power_down",
            Self::ChannelChange => "channel_change",
            Self::KonamiUnlock => "konami_unlock",
            Self::Meltdown => "meltdown",
            Self::RestoreComplete => "restore_complete",
        }
    }
}

/// Consumer of sound cues.
pub trait SoundSink {
    /// Play a cue. Implementations drop cues while muted.
    fn play(&mut self, cue: SoundCue);

    /// Mute or unmute.
    fn set_enabled(&mut self, enabled: bool);

    fn is_enabled(&self) -> bool;
}

/// Discards every cue.
#[derive(Debug, Default)]
pub struct NullSound {
    enabled: bool,
}

impl SoundSink for NullSound {
    fn play(&mut self, _cue: SoundCue) {}

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }
}

/// Records cues that would have been audible, newest last.
#[derive(Debug, Default)]
pub struct CueRecorder {
    enabled: bool,
    played: Vec<SoundCue>,
}

impl CueRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn played(&self) -> &[SoundCue] {
        &self.played
    }

    /// Take and clear the recorded cues.
    pub fn drain(&mut self) -> Vec<SoundCue> {
        std::mem::take(&mut self.played)
    }
}

impl SoundSink for CueRecorder {
    fn play(&mut self, cue: SoundCue) {
        if self.enabled {
            log::debug!("sound cue: {}", cue.name());
            self.played.push(cue);
        }
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }
}
