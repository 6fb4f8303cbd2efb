//! Merged filesystem view: base tree plus overlay.
//!
//! `VirtualFs` owns the working directory, the read-only base tree and the
//! overlay. Reads go through a cached merged tree that is rebuilt whenever
//! the overlay's revision moves, so every write is visible to the next read.

use std::collections::BTreeMap;

use retro_types::error::{Result, ShellError};

use crate::node::FsNode;
use crate::overlay::OverlayStore;
use crate::path::CanonicalPath;

/// One autocomplete candidate from [`VirtualFs::completions`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub name: String,
    pub is_dir: bool,
}

/// Parsed `ls` flags. Any `-` argument containing `a` or `l` enables it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LsFlags {
    pub all: bool,
    pub long: bool,
}

impl LsFlags {
    pub fn parse<'a>(flags: impl IntoIterator<Item = &'a str>) -> Self {
        let mut out = Self::default();
        for flag in flags {
            if let Some(letters) = flag.strip_prefix('-') {
                out.all |= letters.contains('a');
                out.long |= letters.contains('l');
            }
        }
        out
    }
}

#[derive(Debug)]
pub struct VirtualFs {
    base: FsNode,
    overlay: OverlayStore,
    merged: FsNode,
    merged_revision: u64,
    cwd: CanonicalPath,
    owner: String,
}

impl VirtualFs {
    /// Create a view over `base` with `overlay` applied. Starts at root.
    pub fn new(base: FsNode, overlay: OverlayStore) -> Self {
        let merged = merge(&base, &overlay);
        let merged_revision = overlay.revision();
        Self {
            base,
            overlay,
            merged,
            merged_revision,
            cwd: CanonicalPath::root(),
            owner: "visitor".to_string(),
        }
    }

    /// Owner/group shown in long listings.
    pub fn set_owner(&mut self, owner: &str) {
        self.owner = owner.to_string();
    }

    pub fn cwd(&self) -> &CanonicalPath {
        &self.cwd
    }

    /// Working directory display string, also used by the prompt.
    pub fn pwd(&self) -> String {
        self.cwd.to_string()
    }

    pub fn overlay(&self) -> &OverlayStore {
        &self.overlay
    }

    pub fn resolve(&self, path: &str) -> CanonicalPath {
        CanonicalPath::resolve(path, &self.cwd)
    }

    /// Walk the merged view. `None` when a segment is missing or a file is
    /// walked through.
    pub fn get_node(&self, path: &CanonicalPath) -> Option<&FsNode> {
        path.segments()
            .iter()
            .try_fold(&self.merged, |node, seg| node.child(seg))
    }

    /// Effective content of a file: overlay first, then base.
    pub fn read(&self, path: &CanonicalPath) -> Option<&str> {
        self.get_node(path).and_then(FsNode::content)
    }

    pub fn exists(&self, path: &CanonicalPath) -> bool {
        self.get_node(path).is_some()
    }

    pub fn is_user_file(&self, path: &CanonicalPath) -> bool {
        self.overlay.is_user_file(path)
    }

    /// Change directory. Empty input goes home. Returns the new cwd.
    pub fn cd(&mut self, path: &str) -> Result<String> {
        let target = self.resolve(path);
        match self.get_node(&target).map(FsNode::is_dir) {
            None => Err(ShellError::NotFound(path.to_string())),
            Some(false) => Err(ShellError::NotADirectory(path.to_string())),
            Some(true) => {
                self.cwd = target;
                Ok(self.pwd())
            },
        }
    }

    /// List a directory (or describe a single file).
    pub fn ls(&self, path: Option<&str>, flags: LsFlags) -> Result<String> {
        let target = path.map_or_else(|| self.cwd.clone(), |p| self.resolve(p));
        let node = self.get_node(&target).ok_or_else(|| {
            ShellError::NotFound(format!("cannot access '{}'", path.unwrap_or(".")))
        })?;

        let Some(children) = node.children() else {
            let name = target.file_name().unwrap_or_default();
            return Ok(if flags.long {
                self.long_line(node, name)
            } else {
                name.to_string()
            });
        };

        let entries = sorted_entries(children, flags.all);

        if flags.long {
            let mut lines = vec![format!("total {}", entries.len())];
            if flags.all {
                let dot = FsNode::dir(std::iter::empty::<(String, FsNode)>());
                lines.push(self.long_line(&dot, "."));
                lines.push(self.long_line(&dot, ".."));
            }
            for (name, child) in entries {
                let shown = display_name(name, child);
                lines.push(self.long_line(child, &shown));
            }
            return Ok(lines.join("\n"));
        }

        let mut names: Vec<String> = Vec::with_capacity(entries.len() + 2);
        if flags.all {
            names.push("./".to_string());
            names.push("../".to_string());
        }
        names.extend(entries.into_iter().map(|(name, child)| display_name(name, child)));
        Ok(names.join("  "))
    }

    /// File content. Directories and missing paths are errors.
    pub fn cat(&self, path: &str) -> Result<String> {
        match self.get_node(&self.resolve(path)) {
            None => Err(ShellError::NotFound(path.to_string())),
            Some(FsNode::Directory { .. }) => Err(ShellError::IsADirectory(path.to_string())),
            Some(FsNode::File { content, .. }) => Ok(content.clone()),
        }
    }

    /// Box-drawn tree of non-hidden entries, headed by the resolved path.
    pub fn tree(&self, path: Option<&str>) -> Result<String> {
        let target = path.map_or_else(|| self.cwd.clone(), |p| self.resolve(p));
        let node = self.get_node(&target).ok_or_else(|| {
            ShellError::NotFound(format!("'{}'", path.unwrap_or(".")))
        })?;
        if !node.is_dir() {
            return Ok(target.file_name().unwrap_or_default().to_string());
        }
        let mut lines = vec![target.to_string()];
        build_tree(node, "", &mut lines);
        Ok(lines.join("\n"))
    }

    /// Children of the directory named by `partial` up to its last `/` whose
    /// names start with the remainder. Dotfiles are never offered.
    pub fn completions(&self, partial: &str) -> Vec<Completion> {
        let (dir, prefix) = match partial.rfind('/') {
            Some(idx) => {
                let head = &partial[..idx];
                let dir = if !head.is_empty() {
                    self.resolve(head)
                } else if partial.starts_with('/') {
                    CanonicalPath::root()
                } else {
                    self.cwd.clone()
                };
                (dir, &partial[idx + 1..])
            },
            None => (self.cwd.clone(), partial),
        };

        let Some(children) = self.get_node(&dir).and_then(FsNode::children) else {
            return Vec::new();
        };
        children
            .iter()
            .filter(|(name, _)| name.starts_with(prefix) && !name.starts_with('.'))
            .map(|(name, node)| Completion {
                name: name.clone(),
                is_dir: node.is_dir(),
            })
            .collect()
    }

    // -- overlay mutation -----------------------------------------------

    pub fn create_file(&mut self, path: &CanonicalPath) -> Result<()> {
        self.overlay.create_file(path)?;
        self.sync();
        Ok(())
    }

    pub fn write_file(&mut self, path: &CanonicalPath, content: &str) -> Result<()> {
        self.overlay.write_file(path, content)?;
        self.sync();
        Ok(())
    }

    pub fn delete_file(&mut self, path: &CanonicalPath) -> Result<()> {
        self.overlay.delete_file(path)?;
        self.sync();
        Ok(())
    }

    pub fn rename_file(&mut self, src: &CanonicalPath, dst: &CanonicalPath) -> Result<()> {
        self.overlay.rename_file(src, dst)?;
        self.sync();
        Ok(())
    }

    /// Swap in a whole new overlay (used when loading persisted state).
    pub fn replace_overlay(&mut self, overlay: OverlayStore) {
        self.overlay = overlay;
        self.rebuild();
    }

    /// Drop all user files and return to root.
    pub fn reset(&mut self) {
        self.overlay = OverlayStore::new();
        self.cwd = CanonicalPath::root();
        self.rebuild();
    }

    fn sync(&mut self) {
        if self.overlay.revision() != self.merged_revision {
            self.rebuild();
        }
    }

    fn rebuild(&mut self) {
        self.merged = merge(&self.base, &self.overlay);
        self.merged_revision = self.overlay.revision();
        // The cwd may have been a synthesized directory that no longer exists.
        if !self.get_node(&self.cwd).is_some_and(FsNode::is_dir) {
            self.cwd = CanonicalPath::root();
        }
    }

    fn long_line(&self, node: &FsNode, name: &str) -> String {
        format!(
            "{}  1 {owner} {owner} {:>6} {} {name}",
            node.permissions(),
            node.size(),
            node.modified(),
            owner = self.owner,
        )
    }
}

/// Directories first, then files, each group in name order.
fn sorted_entries(
    children: &BTreeMap<String, FsNode>,
    include_hidden: bool,
) -> Vec<(&String, &FsNode)> {
    let mut entries: Vec<_> = children
        .iter()
        .filter(|(name, _)| include_hidden || !name.starts_with('.'))
        .collect();
    // BTreeMap order is by name already; a stable sort keeps it per group.
    entries.sort_by_key(|(_, node)| !node.is_dir());
    entries
}

fn display_name(name: &str, node: &FsNode) -> String {
    if node.is_dir() {
        format!("{name}/")
    } else {
        name.to_string()
    }
}

fn build_tree(node: &FsNode, prefix: &str, lines: &mut Vec<String>) {
    let Some(children) = node.children() else {
        return;
    };
    let entries = sorted_entries(children, false);
    let count = entries.len();
    for (i, (name, child)) in entries.into_iter().enumerate() {
        let last = i + 1 == count;
        let connector = if last { "└── " } else { "├── " };
        lines.push(format!("{prefix}{connector}{}", display_name(name, child)));
        if child.is_dir() {
            let next = format!("{prefix}{}", if last { "    " } else { "│   " });
            build_tree(child, &next, lines);
        }
    }
}

/// Materialize every overlay entry on top of a copy of `base`.
fn merge(base: &FsNode, overlay: &OverlayStore) -> FsNode {
    let mut root = base.clone();
    for path in overlay.list() {
        let content = overlay.read_file(&path).unwrap_or_default();
        materialize(&mut root, &path, content);
    }
    root
}

fn materialize(root: &mut FsNode, path: &CanonicalPath, content: &str) {
    let Some((name, dirs)) = path.segments().split_last() else {
        return;
    };
    let mut current = root;
    for dir in dirs {
        let FsNode::Directory { children, .. } = current else {
            return;
        };
        let child = children
            .entry(dir.clone())
            .or_insert_with(FsNode::user_dir);
        // A base file in the way becomes a synthesized directory.
        if !child.is_dir() {
            *child = FsNode::user_dir();
        }
        current = child;
    }
    if let FsNode::Directory { children, .. } = current {
        children.insert(name.clone(), FsNode::user_file(content));
    }
}
