//! Pipeline splitting, argument tokenizing and the text filter library.
//!
//! Only the first segment of a pipeline is a command; every later segment is
//! a filter applied to the text flowing out of it.

use retro_types::error::{Result, ShellError};

/// Default line count for `head` and `tail`.
const DEFAULT_LINES: usize = 10;

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Split `input` on `|` outside quotes.
///
/// Quotes are kept in the segments. A backslash outside quotes keeps itself
/// and the character after it, so `\|` never splits. Segments are trimmed
/// and empty ones dropped.
pub fn parse_pipeline(input: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut chars = input.chars();
    let mut quote: Option<char> = None;

    while let Some(ch) = chars.next() {
        if let Some(open) = quote {
            current.push(ch);
            if ch == open {
                quote = None;
            }
            continue;
        }
        match ch {
            '\'' | '"' => {
                quote = Some(ch);
                current.push(ch);
            },
            '\\' => {
                current.push(ch);
                if let Some(next) = chars.next() {
                    current.push(next);
                }
            },
            '|' => push_segment(&mut segments, &mut current),
            _ => current.push(ch),
        }
    }
    push_segment(&mut segments, &mut current);
    segments
}

fn push_segment(segments: &mut Vec<String>, current: &mut String) {
    let trimmed = current.trim();
    if !trimmed.is_empty() {
        segments.push(trimmed.to_string());
    }
    current.clear();
}

/// Split one segment into whitespace-separated words.
///
/// Quotes and backslashes are kept as typed; they only matter to
/// [`parse_pipeline`].
pub fn tokenize(segment: &str) -> Vec<String> {
    segment.split_whitespace().map(str::to_string).collect()
}

/// Lowercased verb of a command segment, for tracking and completion.
pub fn verb_of(segment: &str) -> Option<String> {
    segment
        .split_whitespace()
        .next()
        .map(|word| word.to_lowercase())
}

// ---------------------------------------------------------------------------
// Filters
// ---------------------------------------------------------------------------

/// Apply one filter segment to `text`.
pub fn apply_filter(segment: &str, text: &str) -> Result<String> {
    let words = tokenize(segment);
    let Some((name, args)) = words.split_first() else {
        return Ok(text.to_string());
    };
    let name = name.to_lowercase();

    match name.as_str() {
        "grep" => {
            let pattern = args.join(" ").to_lowercase();
            if pattern.is_empty() {
                return Err(ShellError::InvalidArgument(
                    "grep: no pattern provided".to_string(),
                ));
            }
            let hits: Vec<&str> = text
                .split('\n')
                .filter(|line| line.to_lowercase().contains(&pattern))
                .collect();
            if hits.is_empty() {
                Ok("(no matches)".to_string())
            } else {
                Ok(hits.join("\n"))
            }
        },
        "head" => {
            let n = line_count(args.first());
            Ok(text.split('\n').take(n).collect::<Vec<_>>().join("\n"))
        },
        "tail" => {
            let n = line_count(args.first());
            let lines: Vec<&str> = text.split('\n').collect();
            let start = lines.len().saturating_sub(n);
            Ok(lines[start..].join("\n"))
        },
        "sort" => {
            let mut lines: Vec<&str> = text.split('\n').collect();
            lines.sort_unstable();
            Ok(lines.join("\n"))
        },
        "wc" => {
            let lines = text.split('\n').count();
            let words = text.split_whitespace().count();
            let chars = text.chars().count();
            Ok(format!("  {lines} lines  {words} words  {chars} chars"))
        },
        "uniq" => {
            let mut lines: Vec<&str> = text.split('\n').collect();
            lines.dedup();
            Ok(lines.join("\n"))
        },
        _ => Err(ShellError::FilterNotFound(name)),
    }
}

/// Parse a `head`/`tail` count. Missing, non-numeric or zero means 10.
fn line_count(arg: Option<&String>) -> usize {
    arg.and_then(|a| a.parse::<usize>().ok())
        .filter(|n| *n > 0)
        .unwrap_or(DEFAULT_LINES)
}
