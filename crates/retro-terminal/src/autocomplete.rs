//! Tab completion over commands, paths, themes and font sizes.

use retro_progress::Progression;
use retro_skin::ThemeCatalog;
use retro_types::config::FontSize;
use retro_vfs::VirtualFs;

use crate::easter_eggs::DISCOVERABLE;
use crate::interpreter::CommandRegistry;
use crate::system_commands::theme_access;

/// Verbs whose arguments complete against the filesystem.
const FS_VERBS: [&str; 14] = [
    "cd", "ls", "cat", "tree", "touch", "vim", "vi", "emacs", "nano", "edit", "rm", "mkdir",
    "cp", "mv",
];

/// One completion choice. `value` replaces the last token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub value: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TabCompletion {
    NoMatch,
    /// Exactly one candidate: the completed input line.
    Filled(String),
    /// Several candidates to show.
    Choices(Vec<Candidate>),
}

/// Everything completion reads.
pub struct CompletionSources<'a> {
    pub registry: &'a CommandRegistry,
    pub progress: &'a Progression,
    pub fs: &'a VirtualFs,
    pub themes: &'a dyn ThemeCatalog,
}

/// Complete the last token of `input`.
pub fn complete(input: &str, src: &CompletionSources<'_>) -> TabCompletion {
    let mut candidates = candidates(input, src);
    match candidates.len() {
        0 => TabCompletion::NoMatch,
        1 => {
            let only = candidates.remove(0);
            TabCompletion::Filled(apply_candidate(input, &only))
        },
        _ => TabCompletion::Choices(candidates),
    }
}

/// Replace the last token of `input` with `candidate`. A trailing space is
/// added unless the candidate is a directory.
pub fn apply_candidate(input: &str, candidate: &Candidate) -> String {
    let (head, _) = split_last(input);
    let sep = if candidate.value.ends_with('/') { "" } else { " " };
    format!("{head}{}{sep}", candidate.value)
}

/// Input before the last token, and the last token itself (empty after
/// trailing whitespace).
fn split_last(input: &str) -> (&str, &str) {
    let start = input
        .rfind(char::is_whitespace)
        .map_or(0, |i| i + input[i..].chars().next().map_or(1, char::len_utf8));
    input.split_at(start)
}

/// Every candidate for `input`, before the fill/list decision.
pub fn candidates(input: &str, src: &CompletionSources<'_>) -> Vec<Candidate> {
    let tokens: Vec<&str> = input.split_whitespace().collect();
    let (_, last) = split_last(input);
    let completing_verb = tokens.is_empty() || (tokens.len() == 1 && !last.is_empty());

    if completing_verb {
        return command_candidates(last, src);
    }

    let verb = tokens[0].to_lowercase();
    if FS_VERBS.contains(&verb.as_str()) {
        return path_candidates(last, src.fs);
    }
    // Option completion only applies to the first argument.
    let first_arg = tokens.len() + usize::from(last.is_empty()) == 2;
    match verb.as_str() {
        "theme" if first_arg => theme_candidates(last, src),
        "fontsize" if first_arg => FontSize::ALL
            .iter()
            .filter(|size| size.as_str().starts_with(&last.to_lowercase()))
            .map(|size| Candidate {
                value: size.as_str().to_string(),
                description: size.pixels().to_string(),
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn command_candidates(prefix: &str, src: &CompletionSources<'_>) -> Vec<Candidate> {
    let prefix = prefix.to_lowercase();
    let mut out: Vec<Candidate> = src
        .registry
        .visible(src.progress)
        .map(|cmd| Candidate {
            value: cmd.name().to_string(),
            description: cmd.description().to_string(),
        })
        .chain(DISCOVERABLE.iter().map(|(name, description)| Candidate {
            value: (*name).to_string(),
            description: (*description).to_string(),
        }))
        .filter(|c| c.value.to_lowercase().starts_with(&prefix))
        .collect();
    out.sort_by_key(|c| c.value.to_lowercase());
    out.dedup_by(|a, b| a.value == b.value);
    out
}

fn path_candidates(partial: &str, fs: &VirtualFs) -> Vec<Candidate> {
    let dir_part = partial.rfind('/').map_or("", |i| &partial[..=i]);
    fs.completions(partial)
        .into_iter()
        .map(|c| {
            let (suffix, description) = if c.is_dir {
                ("/", "directory")
            } else {
                ("", "file")
            };
            Candidate {
                value: format!("{dir_part}{}{suffix}", c.name),
                description: description.to_string(),
            }
        })
        .collect()
}

fn theme_candidates(prefix: &str, src: &CompletionSources<'_>) -> Vec<Candidate> {
    let prefix = prefix.to_lowercase();
    src.themes
        .names(theme_access(src.progress))
        .into_iter()
        .filter(|name| name.starts_with(&prefix))
        .map(|name| Candidate {
            value: name.to_string(),
            description: src.themes.label(name).to_string(),
        })
        .collect()
}
