//! Filesystem tree nodes.

use std::collections::BTreeMap;

/// Modification stamp shown for base (profile-generated) nodes.
pub const BASE_MODIFIED: &str = "Feb 05 2026";
/// Modification stamp shown for overlay-materialized nodes.
pub const USER_MODIFIED: &str = "Feb 10 2026";

const BASE_FILE_PERMS: &str = "-rw-r--r--";
const BASE_DIR_PERMS: &str = "drwxr-xr-x";
const USER_FILE_PERMS: &str = "-rw-rw-r--";
const USER_DIR_PERMS: &str = "drwxrwxr-x";

/// Reported size of every directory.
pub const DIR_SIZE: usize = 4096;

/// A node in the virtual tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FsNode {
    File {
        content: String,
        permissions: &'static str,
        modified: &'static str,
    },
    Directory {
        children: BTreeMap<String, FsNode>,
        permissions: &'static str,
        modified: &'static str,
    },
}

impl FsNode {
    /// Read-only base file.
    pub fn file(content: impl Into<String>) -> Self {
        Self::File {
            content: content.into(),
            permissions: BASE_FILE_PERMS,
            modified: BASE_MODIFIED,
        }
    }

    /// Base directory built from `(name, node)` pairs.
    pub fn dir<I, S>(children: I) -> Self
    where
        I: IntoIterator<Item = (S, FsNode)>,
        S: Into<String>,
    {
        Self::Directory {
            children: children.into_iter().map(|(k, v)| (k.into(), v)).collect(),
            permissions: BASE_DIR_PERMS,
            modified: BASE_MODIFIED,
        }
    }

    /// File materialized from the overlay.
    pub fn user_file(content: impl Into<String>) -> Self {
        Self::File {
            content: content.into(),
            permissions: USER_FILE_PERMS,
            modified: USER_MODIFIED,
        }
    }

    /// Empty directory synthesized for an overlay path.
    pub fn user_dir() -> Self {
        Self::Directory {
            children: BTreeMap::new(),
            permissions: USER_DIR_PERMS,
            modified: USER_MODIFIED,
        }
    }

    pub fn is_dir(&self) -> bool {
        matches!(self, Self::Directory { .. })
    }

    pub fn permissions(&self) -> &'static str {
        match self {
            Self::File { permissions, .. } | Self::Directory { permissions, .. } => *permissions,
        }
    }

    pub fn modified(&self) -> &'static str {
        match self {
            Self::File { modified, .. } | Self::Directory { modified, .. } => *modified,
        }
    }

    /// Content length in characters for files, [`DIR_SIZE`] for directories.
    pub fn size(&self) -> usize {
        match self {
            Self::File { content, .. } => content.chars().count(),
            Self::Directory { .. } => DIR_SIZE,
        }
    }

    /// File content; `None` for directories.
    pub fn content(&self) -> Option<&str> {
        match self {
            Self::File { content, .. } => Some(content),
            Self::Directory { .. } => None,
        }
    }

    /// Children; `None` for files.
    pub fn children(&self) -> Option<&BTreeMap<String, FsNode>> {
        match self {
            Self::Directory { children, .. } => Some(children),
            Self::File { .. } => None,
        }
    }

    /// Look up a direct child.
    pub fn child(&self, name: &str) -> Option<&FsNode> {
        self.children()?.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_file_metadata() {
        let f = FsNode::file("hello");
        assert_eq!(f.permissions(), "-rw-r--r--");
        assert_eq!(f.modified(), BASE_MODIFIED);
        assert_eq!(f.size(), 5);
        assert!(!f.is_dir());
    }

    #[test]
    fn user_nodes_are_group_writable() {
        assert_eq!(FsNode::user_file("").permissions(), "-rw-rw-r--");
        assert_eq!(FsNode::user_dir().permissions(), "drwxrwxr-x");
        assert_eq!(FsNode::user_dir().modified(), USER_MODIFIED);
    }

    #[test]
    fn dir_size_is_fixed() {
        let d = FsNode::dir([("a.txt", FsNode::file("x".repeat(9000)))]);
        assert_eq!(d.size(), DIR_SIZE);
        assert!(d.child("a.txt").is_some());
        assert!(d.child("b.txt").is_none());
    }

    #[test]
    fn size_counts_chars() {
        assert_eq!(FsNode::file("héllo").size(), 5);
    }
}
