//! Easter eggs: verbs answered before the registry is consulted.
//!
//! Each egg records its id in the achievement state. `rm` is only an egg in
//! its `-rf` form with a path argument; otherwise it falls through to the
//! registry.

use retro_progress::UnlockId;

use crate::interpreter::{CommandResult, Effect, Environment};

/// Eggs offered by autocomplete, with their descriptions.
pub const DISCOVERABLE: [(&str, &str); 5] = [
    ("cowsay", "Moo!"),
    ("whoami", "Who are you?"),
    ("ping", "Ping a host"),
    ("date", "Current date/time"),
    ("exit", "Try to leave"),
];

const COW_WIDTH: usize = 40;
const COW_DEFAULT: &str = "Moo! Check out this portfolio!";

/// Answer `verb` if it is an egg. `None` means dispatch continues.
pub fn handle(verb: &str, args: &[&str], env: &mut Environment<'_>) -> Option<CommandResult> {
    let user = env.config.user.as_str();
    let (egg, result) = match verb {
        "sudo" if args.join(" ").to_lowercase().starts_with("hire") => (
            "sudo_hire",
            CommandResult::text(
                [
                    format!("  [sudo] password for {user}: ********"),
                    String::new(),
                    "  REQUEST APPROVED.".to_string(),
                    String::new(),
                    "  Initiating hiring sequence...".to_string(),
                    "  ████████████████████████ 100%".to_string(),
                    String::new(),
                    "  Just kidding! But I appreciate the enthusiasm.".to_string(),
                    "  Feel free to reach out: type 'contact' for details.".to_string(),
                ]
                .join("\n"),
            ),
        ),
        "sudo" => (
            "sudo",
            CommandResult::text(format!(
                "  [sudo] password for {user}: ********\n  Sorry, {user} is not in the sudoers file.\n  This incident will be reported."
            )),
        ),
        "rm" if is_rm_rf(args) => {
            env.progress.grant(UnlockId::GlitchTheme);
            (
                "rm_rf",
                CommandResult::text(RM_RF_TEXT).with_effect(Effect::StartMeltdown),
            )
        },
        "exit" => ("exit", CommandResult::text(EXIT_TEXT)),
        "cowsay" => {
            let message = args.join(" ");
            let message = if message.trim().is_empty() {
                COW_DEFAULT
            } else {
                message.as_str()
            };
            ("cowsay", CommandResult::text(cowsay(message)))
        },
        "whoami" => (
            "whoami",
            CommandResult::text(format!(
                "  {user}\n\n  (But the real question is... who are we all, really?)"
            )),
        ),
        "ping" => (
            "ping",
            CommandResult::text(ping(args.first().copied().unwrap_or("localhost"))),
        ),
        "date" => {
            let result = match env.time.now() {
                Ok(now) => CommandResult::text(format!("  {}", now.long_format())),
                Err(e) => CommandResult::error(format!("date: {e}")),
            };
            ("date", result)
        },
        _ => return None,
    };
    env.progress.state.record_egg(egg);
    Some(result)
}

fn is_rm_rf(args: &[&str]) -> bool {
    args.join(" ").contains("-rf") && args.iter().any(|a| a.contains('/'))
}

const RM_RF_TEXT: &str = "  Deleting system32...
  Removing all node_modules/ (this may take a while)...
  Erasing browser history...
  Deleting photos of your cat...
  Purging embarrassing search history...
  rm: cannot remove '/dev/humor': Device or resource busy

  Just kidding! This is a virtual filesystem.
  Nothing was harmed in the making of this easter egg.

  Try 'tree' to see what's actually here.";

const EXIT_TEXT: &str = "  Logout denied.

  You can check out any time you like,
  but you can never leave.

  (Try exploring with 'help' or 'cd ~/projects')";

fn ping(host: &str) -> String {
    [
        format!("  PING {host} (127.0.0.1): 56 data bytes"),
        "  64 bytes from 127.0.0.1: icmp_seq=0 ttl=64 time=0.042 ms".to_string(),
        "  64 bytes from 127.0.0.1: icmp_seq=1 ttl=64 time=0.038 ms".to_string(),
        "  64 bytes from 127.0.0.1: icmp_seq=2 ttl=64 time=0.041 ms".to_string(),
        String::new(),
        format!("  --- {host} ping statistics ---"),
        "  3 packets transmitted, 3 packets received, 0% packet loss".to_string(),
    ]
    .join("\n")
}

/// Speech bubble wrapped at 40 columns, with the cow underneath.
pub fn cowsay(message: &str) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    for word in message.split(' ') {
        let width = current.chars().count();
        if !current.is_empty() && width + word.chars().count() + 1 > COW_WIDTH {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        } else if current.is_empty() {
            current.push_str(word);
        } else {
            current.push(' ');
            current.push_str(word);
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }

    let width = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    let border = "-".repeat(width + 2);
    let last = lines.len().saturating_sub(1);
    let body: Vec<String> = if lines.len() == 1 {
        vec![format!("< {:width$} >", lines[0])]
    } else {
        lines
            .iter()
            .enumerate()
            .map(|(i, line)| {
                let (open, close) = match i {
                    0 => ('/', '\\'),
                    i if i == last => ('\\', '/'),
                    _ => ('|', '|'),
                };
                format!("{open} {line:width$} {close}")
            })
            .collect()
    };

    let mut out = vec![format!("   {border}")];
    out.extend(body);
    out.push(format!("   {border}"));
    out.extend(
        [
            "          \\   ^__^",
            "           \\  (oo)\\_______",
            "              (__)\\       )\\/\\",
            "                  ||----w |",
            "                  ||     ||",
        ]
        .map(str::to_string),
    );
    out.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::Fixture;

    #[test]
    fn sudo_records_egg() {
        let mut f = Fixture::new();
        let r = f.run("sudo ls");
        assert!(r.output.contains("not in the sudoers file"));
        assert!(f.progress.state.has_egg("sudo"));
        assert!(!f.progress.state.has_egg("sudo_hire"));
    }

    #[test]
    fn sudo_hire_variant() {
        let mut f = Fixture::new();
        let r = f.run("sudo HIRE me");
        assert!(r.output.contains("REQUEST APPROVED."));
        assert!(f.progress.state.has_egg("sudo_hire"));
    }

    #[test]
    fn rm_rf_grants_glitch_and_melts_down() {
        let mut f = Fixture::new();
        let r = f.run("rm -rf /");
        assert!(r.has_effect(&Effect::StartMeltdown));
        assert!(f.progress.has(UnlockId::GlitchTheme));
        assert!(f.progress.state.has_egg("rm_rf"));
    }

    #[test]
    fn plain_rm_is_not_an_egg() {
        let mut f = Fixture::new();
        // Without the editor unlock rm does not exist yet.
        let r = f.run("rm -rf foo");
        assert!(r.output.starts_with("Command not found: rm."));
        assert!(!f.progress.state.has_egg("rm_rf"));
    }

    #[test]
    fn exit_refuses() {
        let mut f = Fixture::new();
        assert!(f.run("exit").output.contains("Logout denied."));
        assert!(f.progress.state.has_egg("exit"));
    }

    #[test]
    fn date_uses_injected_clock() {
        let mut f = Fixture::new();
        assert_eq!(f.run("date").output, "  Fri Feb 13 2026 14:30:45 UTC");
    }

    #[test]
    fn ping_defaults_to_localhost() {
        let mut f = Fixture::new();
        let r = f.run("ping");
        assert!(r.output.starts_with("  PING localhost (127.0.0.1)"));
        let r = f.run("ping example.org");
        assert!(r.output.contains("--- example.org ping statistics ---"));
    }

    #[test]
    fn whoami_uses_configured_user() {
        let mut f = Fixture::new();
        f.config.user = "guest".into();
        assert!(f.run("whoami").output.starts_with("  guest\n"));
    }

    #[test]
    fn cowsay_single_line() {
        let out = cowsay("hello");
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "   -------");
        assert_eq!(lines[1], "< hello >");
        assert_eq!(lines[2], "   -------");
        assert_eq!(lines[3], "          \\   ^__^");
    }

    #[test]
    fn cowsay_wraps_at_forty() {
        let message = "the quick brown fox jumps over the lazy dog and keeps on running far away";
        let out = cowsay(message);
        let lines: Vec<&str> = out.lines().collect();
        assert!(lines[1].starts_with("/ "));
        assert!(lines[1].ends_with(" \\"));
        assert!(lines[2].starts_with("\\ "));
        assert!(lines[2].ends_with(" /"));
        // Every bubble line is padded to the same width.
        assert_eq!(lines[1].chars().count(), lines[2].chars().count());
        assert!(lines[1].chars().count() <= COW_WIDTH + 4);
    }

    #[test]
    fn cowsay_default_message() {
        let mut f = Fixture::new();
        assert!(f.run("cowsay").output.contains(COW_DEFAULT));
    }
}
