//! Built-in registration and the read-only navigation commands.

use std::rc::Rc;

use retro_types::error::{Result, ShellError};
use retro_vfs::LsFlags;

use crate::interpreter::{Category, Command, CommandRegistry, CommandResult, Environment};

/// Register every built-in command, in help listing order.
pub fn register_builtins(reg: &mut CommandRegistry) {
    reg.register(Rc::new(CdCmd));
    reg.register(Rc::new(LsCmd));
    reg.register(Rc::new(CatCmd));
    reg.register(Rc::new(PwdCmd));
    reg.register(Rc::new(TreeCmd));
    crate::info_commands::register_info_commands(reg);
    crate::system_commands::register_system_commands(reg);
    crate::file_commands::register_file_commands(reg);
    crate::fun_commands::register_fun_commands(reg);
}

// ---------------------------------------------------------------------------
// cd
// ---------------------------------------------------------------------------

struct CdCmd;
impl Command for CdCmd {
    fn name(&self) -> &str {
        "cd"
    }
    fn description(&self) -> &str {
        "Change directory"
    }
    fn category(&self) -> Category {
        Category::Nav
    }
    fn execute(&self, args: &[&str], env: &mut Environment<'_>) -> Result<CommandResult> {
        let cwd = env.fs.cd(args.first().copied().unwrap_or("~"))?;
        Ok(CommandResult::text(cwd))
    }
}

// ---------------------------------------------------------------------------
// ls
// ---------------------------------------------------------------------------

struct LsCmd;
impl Command for LsCmd {
    fn name(&self) -> &str {
        "ls"
    }
    fn description(&self) -> &str {
        "List directory contents"
    }
    fn category(&self) -> Category {
        Category::Nav
    }
    fn execute(&self, args: &[&str], env: &mut Environment<'_>) -> Result<CommandResult> {
        let (flags, paths): (Vec<&str>, Vec<&str>) =
            args.iter().copied().partition(|a| a.starts_with('-'));
        let listing = env
            .fs
            .ls(paths.first().copied(), LsFlags::parse(flags))?;
        Ok(CommandResult::text(listing))
    }
}

// ---------------------------------------------------------------------------
// cat
// ---------------------------------------------------------------------------

struct CatCmd;
impl Command for CatCmd {
    fn name(&self) -> &str {
        "cat"
    }
    fn description(&self) -> &str {
        "View file contents"
    }
    fn category(&self) -> Category {
        Category::Nav
    }
    fn execute(&self, args: &[&str], env: &mut Environment<'_>) -> Result<CommandResult> {
        let Some(path) = args.first() else {
            return Err(ShellError::InvalidArgument(
                "missing file operand".to_string(),
            ));
        };
        Ok(CommandResult::text(env.fs.cat(path)?))
    }
}

// ---------------------------------------------------------------------------
// pwd
// ---------------------------------------------------------------------------

struct PwdCmd;
impl Command for PwdCmd {
    fn name(&self) -> &str {
        "pwd"
    }
    fn description(&self) -> &str {
        "Print working directory"
    }
    fn category(&self) -> Category {
        Category::Nav
    }
    fn execute(&self, _args: &[&str], env: &mut Environment<'_>) -> Result<CommandResult> {
        Ok(CommandResult::text(env.fs.pwd()))
    }
}

// ---------------------------------------------------------------------------
// tree
// ---------------------------------------------------------------------------

struct TreeCmd;
impl Command for TreeCmd {
    fn name(&self) -> &str {
        "tree"
    }
    fn description(&self) -> &str {
        "Show directory tree"
    }
    fn category(&self) -> Category {
        Category::Nav
    }
    fn execute(&self, args: &[&str], env: &mut Environment<'_>) -> Result<CommandResult> {
        Ok(CommandResult::text(env.fs.tree(args.first().copied())?))
    }
}

#[cfg(test)]
mod tests {
    use crate::interpreter::OutputKind;
    use crate::test_support::Fixture;

    #[test]
    fn cd_then_pwd() {
        let mut f = Fixture::new();
        assert_eq!(f.run("cd projects").output, "~/projects");
        assert_eq!(f.run("pwd").output, "~/projects");
        assert_eq!(f.run("cd").output, "~");
    }

    #[test]
    fn cd_errors_keep_cwd() {
        let mut f = Fixture::new();
        f.run("cd skills");
        let r = f.run("cd nowhere");
        assert_eq!(r.kind, OutputKind::Error);
        assert_eq!(r.output, "cd: nowhere: No such file or directory");
        let r = f.run("cd languages.txt");
        assert_eq!(r.output, "cd: languages.txt: Not a directory");
        assert_eq!(f.run("pwd").output, "~/skills");
    }

    #[test]
    fn ls_root_marks_directories() {
        let mut f = Fixture::new();
        let out = f.run("ls").output;
        assert!(out.starts_with("education/  experience/  projects/  skills/"));
        assert!(out.contains("about.txt"));
        assert!(!out.contains(".bashrc"));
    }

    #[test]
    fn ls_all_shows_dotfiles() {
        let mut f = Fixture::new();
        let out = f.run("ls -a").output;
        assert!(out.starts_with("./  ../  "));
        assert!(out.contains(".secret/"));
        assert!(out.contains(".bashrc"));
    }

    #[test]
    fn ls_long_form() {
        let mut f = Fixture::new();
        let out = f.run("ls -la skills").output;
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "total 3");
        assert!(lines[1].ends_with(" ."));
        assert!(lines[2].ends_with(" .."));
        assert!(lines[3].starts_with("-rw-r--r--  1 visitor visitor "));
    }

    #[test]
    fn ls_missing_path() {
        let mut f = Fixture::new();
        assert_eq!(
            f.run("ls ghost").output,
            "ls: cannot access 'ghost': No such file or directory"
        );
    }

    #[test]
    fn cat_reads_and_reports() {
        let mut f = Fixture::new();
        assert!(f.run("cat about.txt").output.starts_with("Avery Quinn\n==========="));
        assert_eq!(
            f.run("cat projects").output,
            "cat: projects: Is a directory"
        );
        assert_eq!(f.run("cat").output, "cat: missing file operand");
    }

    #[test]
    fn tree_header_and_connectors() {
        let mut f = Fixture::new();
        let out = f.run("tree education").output;
        assert_eq!(out, "~/education\n└── degree.txt");
    }

    #[test]
    fn tree_missing() {
        let mut f = Fixture::new();
        assert_eq!(
            f.run("tree ghost").output,
            "tree: 'ghost': No such file or directory"
        );
    }
}
