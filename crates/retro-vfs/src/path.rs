//! Canonical shell paths.
//!
//! Every path in the shell is rooted at the home sentinel `~`. `/` is an
//! alias for `~`, so there is no way to address anything above it.

use std::fmt;

/// Root sentinel as displayed in prompts and listings.
pub const ROOT: &str = "~";

/// A fully resolved path: a (possibly empty) list of segments below `~`.
///
/// Segments are never empty, `.` or `..`, and never contain `/`, which makes
/// resolving a path's display form yield the same path again.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CanonicalPath {
    segments: Vec<String>,
}

impl CanonicalPath {
    /// The home directory `~`.
    pub fn root() -> Self {
        Self::default()
    }

    /// Resolve `input` against `cwd`.
    ///
    /// `~`, `~/...` and `/...` are absolute; anything else is relative to
    /// `cwd`. Empty input resolves to root. `.` segments are dropped, `..`
    /// pops one segment (a no-op at root), and repeated or trailing slashes
    /// are ignored.
    pub fn resolve(input: &str, cwd: &CanonicalPath) -> Self {
        let (mut segments, rest) = if input.is_empty() || input == ROOT {
            return Self::root();
        } else if let Some(rest) = input.strip_prefix("~/") {
            (Vec::new(), rest)
        } else if let Some(rest) = input.strip_prefix('/') {
            (Vec::new(), rest)
        } else {
            (cwd.segments.clone(), input)
        };

        for part in rest.split('/') {
            match part {
                "" | "." => {},
                ".." => {
                    segments.pop();
                },
                name => segments.push(name.to_string()),
            }
        }
        Self { segments }
    }

    /// Resolve `input` as if the working directory were root.
    pub fn parse(input: &str) -> Self {
        Self::resolve(input, &Self::root())
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Segments below root, outermost first.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Containing directory; `None` at root.
    pub fn parent(&self) -> Option<Self> {
        let (_, rest) = self.segments.split_last()?;
        Some(Self {
            segments: rest.to_vec(),
        })
    }

    /// Last segment; `None` at root.
    pub fn file_name(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// Append one child name. `name` must not contain `/`.
    pub fn join(&self, name: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(name.to_string());
        Self { segments }
    }

    /// True when any segment is a dotfile.
    pub fn is_hidden(&self) -> bool {
        self.segments.iter().any(|s| s.starts_with('.'))
    }

    /// True when `self` is `other` or lies beneath it.
    pub fn starts_with(&self, other: &CanonicalPath) -> bool {
        self.segments.starts_with(&other.segments)
    }
}

impl fmt::Display for CanonicalPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(ROOT)?;
        for segment in &self.segments {
            write!(f, "/{segment}")?;
        }
        Ok(())
    }
}
