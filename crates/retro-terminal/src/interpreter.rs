//! Command trait, registry, and dispatch logic.
//!
//! A line is split into a pipeline; the first segment is matched against the
//! easter-egg table and then the registry, and the remaining segments are
//! applied as text filters. Handler errors are converted into error results
//! here, so nothing escapes `dispatch`.

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use retro_platform::TimeService;
use retro_progress::{Progression, UnlockId};
use retro_skin::ThemeCatalog;
use retro_types::config::{Preferences, ShellConfig};
use retro_types::error::{Result, ShellError};
use retro_vfs::{CanonicalPath, ProfileData, VirtualFs};

use crate::easter_eggs;
use crate::pipeline::{apply_filter, parse_pipeline, tokenize};

/// How the presentation layer should style a result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputKind {
    #[default]
    Output,
    Error,
    System,
}

/// Input mode of the shell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Command,
    Chat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Game {
    Snake,
    Invaders,
    Breakout,
    Duke,
}

impl Game {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Snake => "snake",
            Self::Invaders => "invaders",
            Self::Breakout => "breakout",
            Self::Duke => "duke",
        }
    }
}

/// Side effects a result advertises to the session and presentation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    ClearScreen,
    SwitchMode(Mode),
    StartGame(Game),
    /// CRT channel, 1 through 5.
    SwitchChannel(u8),
    TogglePanel,
    StartEditor(CanonicalPath),
    ConfirmReset,
    UnlockAll,
    StartMeltdown,
    StartRestore,
    StartGui,
}

/// The outcome of one submitted line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandResult {
    pub output: String,
    pub kind: OutputKind,
    pub effects: Vec<Effect>,
    /// The error came from the last filter of a pipeline; the command
    /// itself succeeded.
    pub filter_failed: bool,
}

impl CommandResult {
    /// No output and no effects.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn text(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            ..Self::default()
        }
    }

    pub fn system(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            kind: OutputKind::System,
            ..Self::default()
        }
    }

    pub fn error(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            kind: OutputKind::Error,
            ..Self::default()
        }
    }

    /// Builder: append an effect.
    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn is_error(&self) -> bool {
        self.kind == OutputKind::Error
    }

    /// True when the first segment of the line failed.
    pub fn command_failed(&self) -> bool {
        self.is_error() && !self.filter_failed
    }

    pub fn has_effect(&self, effect: &Effect) -> bool {
        self.effects.contains(effect)
    }
}

/// Help section a command is listed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Category {
    Nav,
    Info,
    System,
    Fun,
}

impl Category {
    pub const ALL: [Category; 4] = [Self::Nav, Self::Info, Self::System, Self::Fun];

    pub fn title(self) -> &'static str {
        match self {
            Self::Nav => "Navigation",
            Self::Info => "Info",
            Self::System => "System",
            Self::Fun => "Fun",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Everything a handler may read or change.
pub struct Environment<'a> {
    pub registry: &'a CommandRegistry,
    pub fs: &'a mut VirtualFs,
    pub progress: &'a mut Progression,
    pub prefs: &'a mut Preferences,
    pub themes: &'a dyn ThemeCatalog,
    pub profile: &'a ProfileData,
    pub time: &'a dyn TimeService,
    pub config: &'a ShellConfig,
    /// Submitted lines, oldest first, including the current one.
    pub history: &'a [String],
    /// The verb as typed, lowercased, before alias resolution.
    pub invoked_as: String,
}

/// A single executable command.
pub trait Command {
    /// The command name (what the user types).
    fn name(&self) -> &str;

    /// One-line description for `help`.
    fn description(&self) -> &str;

    fn category(&self) -> Category;

    /// Other names that resolve to this command.
    fn aliases(&self) -> &[&str] {
        &[]
    }

    /// Hidden until every achievement is unlocked.
    fn secret(&self) -> bool {
        false
    }

    /// Unlock required before the command exists for the visitor.
    fn gate(&self) -> Option<UnlockId> {
        None
    }

    fn execute(&self, args: &[&str], env: &mut Environment<'_>) -> Result<CommandResult>;
}

/// Name and alias lookup. Aliases share the definition's handle.
#[derive(Default)]
pub struct CommandRegistry {
    commands: BTreeMap<String, Rc<dyn Command>>,
    order: Vec<Rc<dyn Command>>,
}

impl CommandRegistry {
    /// Create an empty command registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a command under its name and every alias. Replaces any
    /// existing entry with the same name.
    pub fn register(&mut self, cmd: Rc<dyn Command>) {
        let name = cmd.name().to_lowercase();
        self.order.retain(|c| c.name() != cmd.name());
        self.order.push(Rc::clone(&cmd));
        for alias in cmd.aliases() {
            self.commands.insert(alias.to_lowercase(), Rc::clone(&cmd));
        }
        self.commands.insert(name, cmd);
    }

    /// Case-insensitive lookup by name or alias.
    pub fn get(&self, name: &str) -> Option<&Rc<dyn Command>> {
        self.commands.get(&name.to_lowercase())
    }

    /// Every definition once, in registration order.
    pub fn definitions(&self) -> &[Rc<dyn Command>] {
        &self.order
    }

    /// True when the visitor may see and run `cmd`.
    pub fn is_visible(cmd: &dyn Command, progress: &Progression) -> bool {
        if cmd.secret() && !progress.is_fully_unlocked() {
            return false;
        }
        cmd.gate().is_none_or(|gate| progress.has(gate))
    }

    /// Visible definitions, in registration order.
    pub fn visible<'r>(
        &'r self,
        progress: &'r Progression,
    ) -> impl Iterator<Item = &'r Rc<dyn Command>> {
        self.order
            .iter()
            .filter(move |cmd| Self::is_visible(cmd.as_ref(), progress))
    }
}

fn not_found(verb: &str) -> CommandResult {
    CommandResult::error(ShellError::CommandNotFound(verb.to_string()).to_string())
}

/// Handle one submitted line in `mode`.
///
/// `/chat` and `/command` switch modes in either mode. Chat mode answers
/// every other line with a fixed message and runs nothing.
pub fn execute_line(input: &str, mode: Mode, env: &mut Environment<'_>) -> CommandResult {
    let trimmed = input.trim();
    match trimmed {
        "/chat" => CommandResult::system(format!(
            "Entering chat mode. Ask me anything about {}.\n(Type /command to switch back)\n\nNote: AI chat is coming soon. For now, use commands.",
            env.profile.name
        ))
        .with_effect(Effect::SwitchMode(Mode::Chat)),
        "/command" => CommandResult::system(
            "Returning to command mode. Type \"help\" for available commands.",
        )
        .with_effect(Effect::SwitchMode(Mode::Command)),
        "" => CommandResult::empty(),
        _ if mode == Mode::Chat => CommandResult::system(
            "AI chat is coming soon. Type /command to return to command mode.",
        ),
        _ => dispatch(trimmed, env),
    }
}

/// Run a pipeline: the first segment is a command, the rest are filters.
///
/// An error from the command is returned as is. A failing filter replaces
/// the flowing text with its message and the remaining filters still run.
pub fn dispatch(input: &str, env: &mut Environment<'_>) -> CommandResult {
    let segments = parse_pipeline(input);
    let Some((first, filters)) = segments.split_first() else {
        return CommandResult::empty();
    };

    let mut result = run_command(first, env);
    if result.is_error() || filters.is_empty() {
        return result;
    }

    let mut failed = false;
    for filter in filters {
        match apply_filter(filter, &result.output) {
            Ok(text) => {
                result.output = text;
                failed = false;
            },
            Err(e) => {
                log::debug!("filter '{filter}' failed: {e}");
                result.output = e.to_string();
                failed = true;
            },
        }
    }
    if failed {
        result.kind = OutputKind::Error;
        result.filter_failed = true;
    }
    result
}

fn run_command(segment: &str, env: &mut Environment<'_>) -> CommandResult {
    let tokens = tokenize(segment);
    let Some((verb, rest)) = tokens.split_first() else {
        return CommandResult::empty();
    };
    let verb = verb.to_lowercase();
    let args: Vec<&str> = rest.iter().map(String::as_str).collect();

    if let Some(result) = easter_eggs::handle(&verb, &args, env) {
        log::debug!("easter egg: {verb}");
        return result;
    }

    let registry = env.registry;
    let Some(cmd) = registry.get(&verb) else {
        return not_found(&verb);
    };
    if !CommandRegistry::is_visible(cmd.as_ref(), env.progress) {
        log::debug!("gated command requested: {verb}");
        return not_found(&verb);
    }

    env.invoked_as = verb.clone();
    match cmd.execute(&args, env) {
        Ok(result) => result,
        Err(e) => CommandResult::error(format!("{verb}: {e}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::Fixture;

    struct EchoCmd;
    impl Command for EchoCmd {
        fn name(&self) -> &str {
            "echo"
        }
        fn description(&self) -> &str {
            "Print arguments"
        }
        fn category(&self) -> Category {
            Category::Fun
        }
        fn aliases(&self) -> &[&str] {
            &["say"]
        }
        fn execute(&self, args: &[&str], env: &mut Environment<'_>) -> Result<CommandResult> {
            Ok(CommandResult::text(format!("{}:{}", env.invoked_as, args.join(" "))))
        }
    }

    struct FailCmd;
    impl Command for FailCmd {
        fn name(&self) -> &str {
            "fail"
        }
        fn description(&self) -> &str {
            "Always fails"
        }
        fn category(&self) -> Category {
            Category::System
        }
        fn execute(&self, args: &[&str], _env: &mut Environment<'_>) -> Result<CommandResult> {
            Err(ShellError::NotFound(args.join(" ")))
        }
    }

    struct SecretCmd;
    impl Command for SecretCmd {
        fn name(&self) -> &str {
            "secret"
        }
        fn description(&self) -> &str {
            "Hidden"
        }
        fn category(&self) -> Category {
            Category::Fun
        }
        fn secret(&self) -> bool {
            true
        }
        fn execute(&self, _args: &[&str], _env: &mut Environment<'_>) -> Result<CommandResult> {
            Ok(CommandResult::text("found"))
        }
    }

    fn fixture() -> Fixture {
        let mut registry = CommandRegistry::new();
        registry.register(Rc::new(EchoCmd));
        registry.register(Rc::new(FailCmd));
        registry.register(Rc::new(SecretCmd));
        Fixture::with_registry(registry)
    }

    #[test]
    fn aliases_share_the_definition() {
        let f = fixture();
        let a = f.registry.get("echo").unwrap();
        let b = f.registry.get("SAY").unwrap();
        assert!(Rc::ptr_eq(a, b));
        assert_eq!(f.registry.definitions().len(), 3);
    }

    #[test]
    fn reregister_replaces() {
        let mut registry = CommandRegistry::new();
        registry.register(Rc::new(EchoCmd));
        registry.register(Rc::new(EchoCmd));
        assert_eq!(registry.definitions().len(), 1);
    }

    #[test]
    fn dispatch_is_case_insensitive_and_tracks_invocation() {
        let mut f = fixture();
        let r = f.run("SAY hello there");
        assert_eq!(r.output, "say:hello there");
        assert_eq!(r.kind, OutputKind::Output);
    }

    #[test]
    fn unknown_command() {
        let mut f = fixture();
        let r = f.run("frobnicate now");
        assert!(r.is_error());
        assert_eq!(
            r.output,
            "Command not found: frobnicate. Type \"help\" for available commands."
        );
    }

    #[test]
    fn secret_is_indistinguishable_from_absent() {
        let mut f = fixture();
        let hidden = f.run("secret");
        let absent = f.run("absent");
        assert_eq!(hidden.output.replace("secret", "X"), absent.output.replace("absent", "X"));
        f.progress.unlock_all();
        assert_eq!(f.run("secret").output, "found");
    }

    #[test]
    fn handler_errors_are_prefixed() {
        let mut f = fixture();
        let r = f.run("fail nope");
        assert!(r.is_error());
        assert_eq!(r.output, "fail: nope: No such file or directory");
    }

    #[test]
    fn first_segment_error_aborts_pipeline() {
        let mut f = fixture();
        let r = f.run("fail x | wc");
        assert!(r.output.starts_with("fail: "));
    }

    #[test]
    fn filters_apply_in_order() {
        let mut f = fixture();
        let r = f.run("echo b | grep b | wc");
        assert_eq!(r.output, "  1 lines  1 words  6 chars");
    }

    #[test]
    fn failing_filter_replaces_text() {
        let mut f = fixture();
        let r = f.run("echo hi | nosuch");
        assert!(r.is_error());
        assert_eq!(r.output, "pipe: command not found: nosuch");

        let r = f.run("echo hi | nosuch | wc");
        assert_eq!(r.kind, OutputKind::Output);
        assert_eq!(r.output, "  1 lines  5 words  31 chars");
    }

    #[test]
    fn quotes_reach_commands_unchanged() {
        let mut f = fixture();
        let r = f.run("echo \"hi\" 'a b'");
        assert_eq!(r.output, "echo:\"hi\" 'a b'");

        let r = f.run("echo \"open");
        assert!(!r.is_error());
        assert_eq!(r.output, "echo:\"open");

        assert!(f.run("cowsay \"hi\"").output.contains("< \"hi\" >"));
        assert!(f.run("cowsay \"open").output.contains("< \"open >"));
    }

    #[test]
    fn failing_last_filter_keeps_command_success() {
        let mut f = fixture();
        let r = f.run("echo hi | nosuch");
        assert!(r.is_error());
        assert!(r.filter_failed);
        assert!(!r.command_failed());

        let r = f.run("nosuch | wc");
        assert!(r.command_failed());
    }

    #[test]
    fn chat_mode_round_trip() {
        let mut f = fixture();
        let r = f.run_in("/chat", Mode::Command);
        assert_eq!(r.effects, vec![Effect::SwitchMode(Mode::Chat)]);
        assert_eq!(r.kind, OutputKind::System);
        assert!(r.output.contains("Avery Quinn"));

        let r = f.run_in("echo hi", Mode::Chat);
        assert!(r.output.contains("coming soon"));

        let r = f.run_in("/command", Mode::Chat);
        assert_eq!(r.effects, vec![Effect::SwitchMode(Mode::Command)]);
    }

    #[test]
    fn blank_line_is_empty() {
        let mut f = fixture();
        assert_eq!(f.run("   "), CommandResult::empty());
    }
}
