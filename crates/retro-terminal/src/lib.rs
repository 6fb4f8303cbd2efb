//! Command interpreter for the RETROTERM shell.
//!
//! Parses a submitted line into a pipeline, dispatches the first segment to
//! an easter egg or a registered command, and runs the remaining segments
//! as text filters. Results carry advertised [`Effect`]s for the session to
//! apply; nothing here touches storage, sound or the screen.

pub mod autocomplete;
pub mod commands;
pub mod easter_eggs;
pub mod file_commands;
pub mod fun_commands;
pub mod info_commands;
pub mod interpreter;
pub mod pipeline;
pub mod system_commands;

#[cfg(test)]
mod test_support;

pub use autocomplete::{Candidate, CompletionSources, TabCompletion, apply_candidate, complete};
pub use commands::register_builtins;
pub use interpreter::{
    Category, Command, CommandRegistry, CommandResult, Effect, Environment, Game, Mode,
    OutputKind, dispatch, execute_line,
};
pub use pipeline::{parse_pipeline, tokenize, verb_of};
pub use system_commands::{CHANNELS, help_text, theme_access};
