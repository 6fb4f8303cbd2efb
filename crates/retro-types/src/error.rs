//! Error types for RETROTERM.

use std::io;

/// Errors produced by the shell core.
///
/// Path-level variants carry the operand as the user typed it (or its
/// canonical display form). The dispatcher prefixes the command verb when
/// turning a handler error into a displayable result, so `NotFound("a.txt")`
/// surfaces as `cat: a.txt: No such file or directory`.
#[derive(Debug, thiserror::Error)]
pub enum ShellError {
    #[error("{0}: No such file or directory")]
    NotFound(String),

    /// Missing or gated command. Gated commands deliberately render the same
    /// text as commands that do not exist.
    #[error("Command not found: {0}. Type \"help\" for available commands.")]
    CommandNotFound(String),

    #[error("{0}: Not a directory")]
    NotADirectory(String),

    #[error("{0}: Is a directory")]
    IsADirectory(String),

    #[error("{0}: Permission denied")]
    PermissionDenied(String),

    #[error("{0}")]
    InvalidArgument(String),

    #[error("pipe: command not found: {0}")]
    FilterNotFound(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, ShellError>;
