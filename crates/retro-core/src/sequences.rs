//! Scripted multi-line sequences: boot, recovery, meltdown, konami and the
//! completion celebration.
//!
//! Each step carries the delay since the previous step; the session turns
//! them into absolute due times on its timeline.

use retro_vfs::ProfileData;

/// One line of a scripted sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    /// Delay after the previous step.
    pub delay_ms: u64,
    pub text: String,
    /// Typewriter speed for this line, zero for instant.
    pub type_speed_ms: u64,
}

impl Step {
    fn new(delay_ms: u64, text: impl Into<String>) -> Self {
        Self {
            delay_ms,
            text: text.into(),
            type_speed_ms: 0,
        }
    }
}

/// Absolute offsets of every step, starting from zero.
pub fn offsets(steps: &[Step]) -> Vec<u64> {
    steps
        .iter()
        .scan(0, |at, step| {
            *at += step.delay_ms;
            Some(*at)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Boot
// ---------------------------------------------------------------------------

pub const READY_TEXT: &str = "System ready. Type \"help\" to see available commands.";

/// Time-of-day greeting for a local hour (0-23).
pub fn greeting(hour: u8) -> &'static str {
    match hour {
        5..=11 => "Good morning! Early birds catch the bugs.",
        12..=16 => "Good afternoon! Hope your day is compiling smoothly.",
        17..=20 => "Good evening! Time for some after-hours hacking.",
        21..=23 | 0..=1 => "Burning the midnight oil? Welcome, fellow night owl.",
        _ => "It's late... or early? Either way, welcome.",
    }
}

fn banner(profile: &ProfileData) -> String {
    const INNER: usize = 38;
    let row = |text: &str| {
        let text: String = text.chars().take(INNER - 3).collect();
        format!("|   {text:<width$}|", width = INNER - 3)
    };
    let blank = format!("|{}|", " ".repeat(INNER));
    let border = format!("+{}+", "-".repeat(INNER));
    [
        border.clone(),
        blank.clone(),
        row(&profile.name.to_uppercase()),
        row(&profile.title),
        blank.clone(),
        row(&format!("RetroTerm v{}", env!("CARGO_PKG_VERSION"))),
        blank,
        border,
    ]
    .join("\n")
}

/// The first-visit boot script.
pub fn boot_sequence(profile: &ProfileData, hour: u8) -> Vec<Step> {
    vec![
        Step::new(300, "BIOS v2.4.1 ... OK"),
        Step::new(200, "Memory check ... 640K OK"),
        Step::new(400, "Loading portfolio.sys ..."),
        Step::new(500, ""),
        Step::new(200, banner(profile)),
        Step::new(100, ""),
        Step::new(200, greeting(hour)),
        Step {
            delay_ms: 300,
            text: format!(
                "{READY_TEXT}\nTip: Try Tab for autocomplete, or cd ~/projects to explore."
            ),
            type_speed_ms: 20,
        },
    ]
}

// ---------------------------------------------------------------------------
// Recovery
// ---------------------------------------------------------------------------

/// The `restore` script. `seed` varies the sector count and checksum.
pub fn recovery_sequence(seed: u64) -> Vec<Step> {
    let sectors = 1000 + seed % 9000;
    let checksum = (seed.wrapping_mul(0x9E37_79B9_7F4A_7C15) >> 32) as u32;
    vec![
        Step::new(0, "  SYSTEM RECOVERY v2.1"),
        Step::new(100, "  ===================="),
        Step::new(200, ""),
        Step::new(400, "  [PHASE 1] Scanning disk sectors..."),
        Step::new(800, format!("  Sectors scanned: {sectors}/{sectors}")),
        Step::new(400, "  Filesystem integrity: COMPROMISED"),
        Step::new(200, ""),
        Step::new(600, "  [PHASE 2] Rebuilding filesystem..."),
        Step::new(300, "  ░░░░░░░░░░░░░░░░░░░░ 0%"),
        Step::new(400, "  ████░░░░░░░░░░░░░░░░ 20%"),
        Step::new(350, "  ████████░░░░░░░░░░░░ 40%"),
        Step::new(300, "  ████████████░░░░░░░░ 60%"),
        Step::new(350, "  ████████████████░░░░ 80%"),
        Step::new(300, "  ████████████████████ 100%"),
        Step::new(200, ""),
        Step::new(500, "  [PHASE 3] Restoring system configs..."),
        Step::new(600, format!("  Checksum: 0x{checksum:08x} ... VERIFIED")),
        Step::new(300, "  Theme subsystem: RESTORED"),
        Step::new(300, "  Filesystem: REBUILT"),
        Step::new(300, "  Permissions: RESET"),
        Step::new(200, ""),
        Step::new(600, "  [PHASE 4] Rebooting..."),
        Step::new(400, ""),
        Step::new(500, "  ✓ System restored successfully."),
        Step::new(300, "  All data recovered. Welcome back."),
    ]
}

/// Gap between the last recovery line and the theme reset.
pub const RESTORE_SETTLE_MS: u64 = 200;

// ---------------------------------------------------------------------------
// Meltdown
// ---------------------------------------------------------------------------

/// Visual meltdown starts this long after `rm -rf`.
pub const MELTDOWN_START_MS: u64 = 800;
/// Meltdown ends and the glitch theme applies.
pub const MELTDOWN_END_MS: u64 = 3500;

pub const MELTDOWN_UNLOCK_TEXT: &str = "
  ░░░░ NEW UNLOCK ░░░░

  Theme 'glitch' activated.
  Command 'restore' is now available.";

// ---------------------------------------------------------------------------
// Konami
// ---------------------------------------------------------------------------

pub const KONAMI_REPEAT_TEXT: &str = "
  ↑↑↓↓←→←→BA

  Channel system already unlocked!
  Use the monitor buttons to change channels.
";

pub const KONAMI_UNLOCK_TEXT: &str = "
  ╔═══════════════════════════════╗
  ║    KONAMI CODE ACTIVATED!      ║
  ╠═══════════════════════════════╣
  ║                               ║
  ║  ░░░░ NEW UNLOCK ░░░░         ║
  ║                               ║
  ║  CRT Channel System enabled!  ║
  ║                               ║
  ║  Monitor buttons now switch   ║
  ║  between channels:            ║
  ║                               ║
  ║  CH 1: Terminal               ║
  ║  CH 2: DVD Logo               ║
  ║  CH 3: Banjo-Kazooie          ║
  ║  CH 4: Color Bars             ║
  ║  CH 5: Static                 ║
  ║                               ║
  ║  Try: screensaver             ║
  ╚═══════════════════════════════╝
";

// ---------------------------------------------------------------------------
// Celebration
// ---------------------------------------------------------------------------

/// Spacing between celebration messages.
pub const CELEBRATION_INTERVAL_MS: u64 = 1500;

/// `2m 5s` or `5s`.
pub fn format_elapsed(secs: u64) -> String {
    let (m, s) = (secs / 60, secs % 60);
    if m > 0 {
        format!("{m}m {s}s")
    } else {
        format!("{s}s")
    }
}

/// The four messages shown once on full completion.
pub fn celebration_sequence(elapsed: &str) -> Vec<Step> {
    let texts = [
        [
            "",
            "  +------------------------------------------+",
            "  |                                          |",
            "  |         SYSTEM OVERRIDE DETECTED         |",
            "  |                                          |",
            "  |         FULL ACCESS GRANTED              |",
            "  |                                          |",
            "  +------------------------------------------+",
            "",
        ]
        .join("\n"),
        [
            "",
            "                ___________",
            "               '._==_==_=_.'",
            "               .-\\:      /-.",
            "              | (|:.     |) |",
            "               '-|:.     |-'",
            "                 \\::.    /",
            "                  '::. .'",
            "                    ) (",
            "                  _.' '._",
            "                 '-------'",
            "",
            "        ★  100% COMPLETION ACHIEVED  ★",
            "",
        ]
        .join("\n"),
        format!("  Completion time this session: {elapsed}"),
        [
            "",
            "  New content unlocked:",
            "",
            "  Themes:   hotdog, vaporwave, c64, cga",
            "  Commands: disco, iddqd",
            "",
            "  Type 'theme --list' or 'help' to see them.",
            "",
        ]
        .join("\n"),
    ];
    texts
        .into_iter()
        .map(|text| Step::new(CELEBRATION_INTERVAL_MS, text))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn greeting_by_hour() {
        assert!(greeting(5).starts_with("Good morning"));
        assert!(greeting(14).starts_with("Good afternoon"));
        assert!(greeting(20).starts_with("Good evening"));
        assert!(greeting(1).starts_with("Burning the midnight oil"));
        assert!(greeting(3).starts_with("It's late"));
    }

    #[test]
    fn boot_banner_is_boxed() {
        let steps = boot_sequence(&ProfileData::sample(), 9);
        let banner = &steps[4].text;
        let widths: Vec<usize> = banner.lines().map(|l| l.chars().count()).collect();
        assert!(widths.iter().all(|w| *w == widths[0]));
        assert!(banner.contains("AVERY QUINN"));
        assert_eq!(steps[6].text, greeting(9));
        assert!(steps.last().unwrap().type_speed_ms > 0);
    }

    #[test]
    fn offsets_accumulate() {
        let steps = boot_sequence(&ProfileData::sample(), 9);
        let at = offsets(&steps);
        assert_eq!(at[0], 300);
        assert_eq!(at[2], 900);
        assert_eq!(*at.last().unwrap(), 2200);
    }

    #[test]
    fn recovery_varies_by_seed() {
        let a = recovery_sequence(1);
        let b = recovery_sequence(2);
        assert_eq!(a.len(), 25);
        assert_ne!(a[4].text, b[4].text);
        assert_eq!(a[4].text, "  Sectors scanned: 1001/1001");
        assert!(a[16].text.ends_with("... VERIFIED"));
    }

    #[test]
    fn celebration_spacing() {
        let steps = celebration_sequence("1m 2s");
        assert_eq!(offsets(&steps), vec![1500, 3000, 4500, 6000]);
        assert_eq!(steps[2].text, "  Completion time this session: 1m 2s");
    }

    #[test]
    fn elapsed_format() {
        assert_eq!(format_elapsed(5), "5s");
        assert_eq!(format_elapsed(125), "2m 5s");
        assert_eq!(format_elapsed(3725), "62m 5s");
    }
}
