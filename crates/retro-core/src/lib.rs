//! RETROTERM session engine.
//!
//! Ties the interpreter, filesystem, progression and preferences together
//! behind [`Session`], drives scripted sequences on a caller-supplied
//! millisecond clock, and owns the in-terminal editor. Everything here is
//! platform-free; a front end supplies keys, ticks and a store.

pub mod chord;
pub mod editor;
pub mod input;
pub mod persist;
pub mod reveal;
pub mod sequences;
pub mod session;
pub mod timeline;

pub use retro_platform as platform;
pub use retro_progress as progress;
pub use retro_skin as skin;
pub use retro_terminal as terminal;
pub use retro_types::{config, error, storage};
pub use retro_vfs as vfs;

pub use editor::{Editor, EditorAction, EditorMode};
pub use input::{Key, KonamiTracker};
pub use session::{Services, Session};
pub use timeline::{OutputLine, OutputLog, Timeline, TimerId};
