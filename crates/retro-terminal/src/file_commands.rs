//! Editor unlock and the overlay-mutating file commands.
//!
//! `vim` is always available and grants the editor unlock on first use;
//! the remaining commands are gated behind it. Base files are never
//! modified: editing one writes a shadow copy into the overlay, and only
//! overlay files can be removed or moved.

use std::rc::Rc;

use retro_progress::UnlockId;
use retro_types::error::{Result, ShellError};
use retro_vfs::{CanonicalPath, FsNode};

use crate::interpreter::{Category, Command, CommandRegistry, CommandResult, Effect, Environment};

pub fn register_file_commands(reg: &mut CommandRegistry) {
    reg.register(Rc::new(VimCmd));
    reg.register(Rc::new(TouchCmd));
    reg.register(Rc::new(RmCmd));
    reg.register(Rc::new(MkdirCmd));
    reg.register(Rc::new(CpCmd));
    reg.register(Rc::new(MvCmd));
}

/// Keeps an otherwise empty user directory alive in the overlay.
const DIR_MARKER: &str = ".keep";

/// `dst`, or `dst/<name of src>` when `dst` is an existing directory.
fn destination(env: &Environment<'_>, src: &CanonicalPath, dst: &str) -> CanonicalPath {
    let dst = env.fs.resolve(dst);
    match (env.fs.get_node(&dst).is_some_and(FsNode::is_dir), src.file_name()) {
        (true, Some(name)) => dst.join(name),
        _ => dst,
    }
}

// ---------------------------------------------------------------------------
// vim
// ---------------------------------------------------------------------------

const NEW_UNLOCK_TEXT: &str = "  ░░░░ NEW UNLOCK ░░░░

  Editor mode activated!
  New commands available:
    vim <path>    — Open file in the editor
    touch <path>  — Create a new file
    mkdir <path>  — Create a directory
    cp <src> <dst> — Copy a file
    mv <src> <dst> — Move/rename a file
    rm <path>     — Remove user-created files

  Edit any file! System files are saved as shadow copies.
  Try: vim ~/about.txt";

struct VimCmd;
impl Command for VimCmd {
    fn name(&self) -> &str {
        "vim"
    }
    fn description(&self) -> &str {
        "Edit a file"
    }
    fn category(&self) -> Category {
        Category::Nav
    }
    fn aliases(&self) -> &[&str] {
        &["vi", "emacs", "nano", "edit"]
    }
    fn execute(&self, args: &[&str], env: &mut Environment<'_>) -> Result<CommandResult> {
        let editor = match env.invoked_as.as_str() {
            "emacs" => "emacs",
            "nano" => "nano",
            _ => "vim",
        };
        env.progress.state.record_egg(&format!("editor_{editor}"));
        let first_use = env.progress.grant(UnlockId::Editor);

        let Some(arg) = args.first() else {
            let text = if first_use {
                NEW_UNLOCK_TEXT
            } else {
                "  Usage: vim <file>"
            };
            return Ok(CommandResult::text(text));
        };

        let path = env.fs.resolve(arg);
        if env.fs.get_node(&path).is_some_and(FsNode::is_dir) {
            return Err(ShellError::IsADirectory((*arg).to_string()));
        }
        if !env.fs.is_user_file(&path) {
            let content = env.fs.read(&path).unwrap_or_default().to_string();
            env.fs.write_file(&path, &content)?;
            log::debug!("Shadow copy created for {path}");
        }
        Ok(CommandResult::empty().with_effect(Effect::StartEditor(path)))
    }
}

// ---------------------------------------------------------------------------
// touch
// ---------------------------------------------------------------------------

struct TouchCmd;
impl Command for TouchCmd {
    fn name(&self) -> &str {
        "touch"
    }
    fn description(&self) -> &str {
        "Create an empty file"
    }
    fn category(&self) -> Category {
        Category::Nav
    }
    fn gate(&self) -> Option<UnlockId> {
        Some(UnlockId::Editor)
    }
    fn execute(&self, args: &[&str], env: &mut Environment<'_>) -> Result<CommandResult> {
        let Some(arg) = args.first() else {
            return Err(ShellError::InvalidArgument(
                "missing file operand".to_string(),
            ));
        };
        let path = env.fs.resolve(arg);
        match env.fs.get_node(&path) {
            Some(node) if node.is_dir() => Err(ShellError::IsADirectory((*arg).to_string())),
            // Touching an existing file changes nothing.
            Some(_) => Ok(CommandResult::empty()),
            None => {
                env.fs.create_file(&path)?;
                Ok(CommandResult::empty())
            },
        }
    }
}

// ---------------------------------------------------------------------------
// rm
// ---------------------------------------------------------------------------

struct RmCmd;
impl Command for RmCmd {
    fn name(&self) -> &str {
        "rm"
    }
    fn description(&self) -> &str {
        "Remove a user file"
    }
    fn category(&self) -> Category {
        Category::Nav
    }
    fn gate(&self) -> Option<UnlockId> {
        Some(UnlockId::Editor)
    }
    fn execute(&self, args: &[&str], env: &mut Environment<'_>) -> Result<CommandResult> {
        let Some(arg) = args.iter().find(|a| !a.starts_with('-')) else {
            return Err(ShellError::InvalidArgument("missing operand".to_string()));
        };
        let path = env.fs.resolve(arg);
        if !env.fs.exists(&path) {
            return Err(ShellError::NotFound((*arg).to_string()));
        }
        if !env.fs.is_user_file(&path) {
            return Ok(CommandResult::error(format!(
                "  rm: cannot remove '{arg}': Permission denied"
            )));
        }
        env.fs.delete_file(&path)?;
        Ok(CommandResult::empty())
    }
}

// ---------------------------------------------------------------------------
// mkdir
// ---------------------------------------------------------------------------

struct MkdirCmd;
impl Command for MkdirCmd {
    fn name(&self) -> &str {
        "mkdir"
    }
    fn description(&self) -> &str {
        "Create a directory"
    }
    fn category(&self) -> Category {
        Category::Nav
    }
    fn gate(&self) -> Option<UnlockId> {
        Some(UnlockId::Editor)
    }
    fn execute(&self, args: &[&str], env: &mut Environment<'_>) -> Result<CommandResult> {
        let Some(arg) = args.iter().find(|a| !a.starts_with('-')) else {
            return Err(ShellError::InvalidArgument("missing operand".to_string()));
        };
        let path = env.fs.resolve(arg);
        if path.is_root() || env.fs.exists(&path) {
            return Ok(CommandResult::error(format!(
                "  mkdir: cannot create directory '{arg}': File exists"
            )));
        }
        env.fs.write_file(&path.join(DIR_MARKER), "")?;
        Ok(CommandResult::empty())
    }
}

// ---------------------------------------------------------------------------
// cp
// ---------------------------------------------------------------------------

struct CpCmd;
impl Command for CpCmd {
    fn name(&self) -> &str {
        "cp"
    }
    fn description(&self) -> &str {
        "Copy a file"
    }
    fn category(&self) -> Category {
        Category::Nav
    }
    fn gate(&self) -> Option<UnlockId> {
        Some(UnlockId::Editor)
    }
    fn execute(&self, args: &[&str], env: &mut Environment<'_>) -> Result<CommandResult> {
        let [src_arg, dst_arg, ..] = args else {
            return Err(ShellError::InvalidArgument(
                "missing destination operand".to_string(),
            ));
        };
        let src = env.fs.resolve(src_arg);
        let content = match env.fs.get_node(&src) {
            None => {
                return Ok(CommandResult::error(format!(
                    "  cp: {src_arg}: No such file"
                )));
            },
            Some(node) => match node.content() {
                Some(content) => content.to_string(),
                None => return Err(ShellError::IsADirectory((*src_arg).to_string())),
            },
        };
        let dst = destination(env, &src, dst_arg);
        env.fs.write_file(&dst, &content)?;
        Ok(CommandResult::empty())
    }
}

// ---------------------------------------------------------------------------
// mv
// ---------------------------------------------------------------------------

struct MvCmd;
impl Command for MvCmd {
    fn name(&self) -> &str {
        "mv"
    }
    fn description(&self) -> &str {
        "Move or rename a user file"
    }
    fn category(&self) -> Category {
        Category::Nav
    }
    fn gate(&self) -> Option<UnlockId> {
        Some(UnlockId::Editor)
    }
    fn execute(&self, args: &[&str], env: &mut Environment<'_>) -> Result<CommandResult> {
        let [src_arg, dst_arg, ..] = args else {
            return Err(ShellError::InvalidArgument(
                "missing destination operand".to_string(),
            ));
        };
        let src = env.fs.resolve(src_arg);
        if !env.fs.is_user_file(&src) {
            return Ok(CommandResult::error(format!(
                "  mv: cannot move '{src_arg}': Permission denied"
            )));
        }
        let dst = destination(env, &src, dst_arg);
        if dst != src {
            env.fs.rename_file(&src, &dst)?;
        }
        Ok(CommandResult::empty())
    }
}
