//! Games, the screensaver shortcut and the secret commands.

use std::rc::Rc;

use retro_progress::UnlockId;
use retro_types::error::Result;

use crate::interpreter::{
    Category, Command, CommandRegistry, CommandResult, Effect, Environment, Game,
};

pub fn register_fun_commands(reg: &mut CommandRegistry) {
    reg.register(Rc::new(GameCmd {
        game: Game::Snake,
        description: "Play Snake",
    }));
    reg.register(Rc::new(GameCmd {
        game: Game::Invaders,
        description: "Play Space Invaders",
    }));
    reg.register(Rc::new(GameCmd {
        game: Game::Breakout,
        description: "Play Breakout",
    }));
    reg.register(Rc::new(ScreensaverCmd));
    reg.register(Rc::new(BubblegumCmd));
    reg.register(Rc::new(DiscoCmd));
    reg.register(Rc::new(IddqdCmd));
}

// ---------------------------------------------------------------------------
// games
// ---------------------------------------------------------------------------

/// One command per mini-game; the session records the play when it
/// applies the effect.
struct GameCmd {
    game: Game,
    description: &'static str,
}

impl Command for GameCmd {
    fn name(&self) -> &str {
        self.game.as_str()
    }
    fn description(&self) -> &str {
        self.description
    }
    fn category(&self) -> Category {
        Category::Fun
    }
    fn execute(&self, _args: &[&str], _env: &mut Environment<'_>) -> Result<CommandResult> {
        Ok(CommandResult::empty().with_effect(Effect::StartGame(self.game)))
    }
}

// ---------------------------------------------------------------------------
// screensaver
// ---------------------------------------------------------------------------

const DVD_CHANNEL: u8 = 2;

struct ScreensaverCmd;
impl Command for ScreensaverCmd {
    fn name(&self) -> &str {
        "screensaver"
    }
    fn description(&self) -> &str {
        "DVD logo screensaver"
    }
    fn category(&self) -> Category {
        Category::Fun
    }
    fn gate(&self) -> Option<UnlockId> {
        Some(UnlockId::Channels)
    }
    fn execute(&self, _args: &[&str], _env: &mut Environment<'_>) -> Result<CommandResult> {
        Ok(CommandResult::system("  Switching to DVD Logo...")
            .with_effect(Effect::SwitchChannel(DVD_CHANNEL)))
    }
}

// ---------------------------------------------------------------------------
// secret commands
// ---------------------------------------------------------------------------

struct BubblegumCmd;
impl Command for BubblegumCmd {
    fn name(&self) -> &str {
        "bubblegum"
    }
    fn description(&self) -> &str {
        "It's time to kick ass..."
    }
    fn category(&self) -> Category {
        Category::Fun
    }
    fn secret(&self) -> bool {
        true
    }
    fn execute(&self, _args: &[&str], env: &mut Environment<'_>) -> Result<CommandResult> {
        env.progress.state.record_egg("bubblegum");
        Ok(CommandResult::empty().with_effect(Effect::StartGame(Game::Duke)))
    }
}

struct DiscoCmd;
impl Command for DiscoCmd {
    fn name(&self) -> &str {
        "disco"
    }
    fn description(&self) -> &str {
        "Party time"
    }
    fn category(&self) -> Category {
        Category::Fun
    }
    fn secret(&self) -> bool {
        true
    }
    fn execute(&self, _args: &[&str], env: &mut Environment<'_>) -> Result<CommandResult> {
        env.progress.state.record_egg("disco");
        Ok(CommandResult::system(
            "  Disco mode activated! The lights are going wild.",
        ))
    }
}

struct IddqdCmd;
impl Command for IddqdCmd {
    fn name(&self) -> &str {
        "iddqd"
    }
    fn description(&self) -> &str {
        "???"
    }
    fn category(&self) -> Category {
        Category::Fun
    }
    fn secret(&self) -> bool {
        true
    }
    fn execute(&self, _args: &[&str], env: &mut Environment<'_>) -> Result<CommandResult> {
        if !env.progress.unlock_all() {
            return Ok(CommandResult::system(
                "  God mode already active. You have nothing left to prove.",
            ));
        }
        log::info!("God mode: every achievement and unlock granted");
        Ok(CommandResult::system(
            "  IDDQD\n\n  God mode activated.\n  All achievements unlocked.\n\n  (You cheater.)",
        )
        .with_effect(Effect::UnlockAll))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::Fixture;

    #[test]
    fn games_start() {
        let mut f = Fixture::new();
        assert_eq!(f.run("snake").effects, vec![Effect::StartGame(Game::Snake)]);
        assert_eq!(
            f.run("INVADERS").effects,
            vec![Effect::StartGame(Game::Invaders)]
        );
        assert_eq!(
            f.run("breakout").effects,
            vec![Effect::StartGame(Game::Breakout)]
        );
    }

    #[test]
    fn screensaver_needs_channels() {
        let mut f = Fixture::new();
        assert!(f.run("screensaver").is_error());
        f.progress.grant(UnlockId::Channels);
        let r = f.run("screensaver");
        assert_eq!(r.output, "  Switching to DVD Logo...");
        assert_eq!(r.effects, vec![Effect::SwitchChannel(2)]);
    }

    #[test]
    fn secrets_hidden_before_completion() {
        let mut f = Fixture::new();
        for verb in ["bubblegum", "disco", "iddqd"] {
            assert_eq!(
                f.run(verb).output,
                format!("Command not found: {verb}. Type \"help\" for available commands.")
            );
        }
        assert!(!f.progress.is_fully_unlocked());
    }

    #[test]
    fn secrets_run_after_completion() {
        let mut f = Fixture::new();
        f.progress.unlock_all();
        assert_eq!(f.run("bubblegum").effects, vec![Effect::StartGame(Game::Duke)]);
        assert!(f.run("disco").output.contains("Disco mode activated!"));
        assert_eq!(
            f.run("iddqd").output,
            "  God mode already active. You have nothing left to prove."
        );
    }
}
