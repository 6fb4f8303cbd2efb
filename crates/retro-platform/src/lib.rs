//! Platform services for RETROTERM.
//!
//! The shell core never reads the clock or touches audio directly. A session
//! is handed a [`TimeService`] and a [`SoundSink`] at construction time.

pub mod sound;
pub mod time;

pub use sound::{CueRecorder, NullSound, SoundCue, SoundSink};
pub use time::{DesktopClock, FixedClock, SystemTime, TimeService, format_uptime};
