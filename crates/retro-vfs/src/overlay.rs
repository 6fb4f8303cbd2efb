//! User-writable overlay ("shadow") files.
//!
//! The overlay maps canonical paths to file content. It always wins over the
//! base tree: editing a base file stores a full shadow copy here. Each
//! mutation bumps a revision counter that the merged view watches.

use std::collections::BTreeMap;

use retro_types::error::{Result, ShellError};

use crate::path::CanonicalPath;

/// Writable file layer, keyed by canonical display path (`~/a/b.txt`).
#[derive(Debug, Clone, Default)]
pub struct OverlayStore {
    files: BTreeMap<String, String>,
    revision: u64,
}

impl OverlayStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a store from persisted `[path, content]` pairs.
    ///
    /// Paths are re-canonicalized; entries naming root are dropped.
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut files = BTreeMap::new();
        for (path, content) in entries {
            let canonical = CanonicalPath::parse(&path);
            if canonical.is_root() {
                log::warn!("Dropping overlay entry for root path {path:?}");
                continue;
            }
            files.insert(canonical.to_string(), content);
        }
        Self { files, revision: 0 }
    }

    /// `[path, content]` pairs in path order, for persistence.
    pub fn entries(&self) -> Vec<(String, String)> {
        self.files
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Monotonic mutation counter.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Create an empty file if absent. Existing content is left alone.
    pub fn create_file(&mut self, path: &CanonicalPath) -> Result<()> {
        let key = Self::key(path)?;
        if !self.files.contains_key(&key) {
            self.files.insert(key, String::new());
            self.bump();
        }
        Ok(())
    }

    /// Create or overwrite a file.
    pub fn write_file(&mut self, path: &CanonicalPath, content: &str) -> Result<()> {
        let key = Self::key(path)?;
        self.files.insert(key, content.to_string());
        self.bump();
        Ok(())
    }

    pub fn read_file(&self, path: &CanonicalPath) -> Option<&str> {
        self.files.get(&path.to_string()).map(String::as_str)
    }

    pub fn delete_file(&mut self, path: &CanonicalPath) -> Result<()> {
        let key = path.to_string();
        if self.files.remove(&key).is_none() {
            return Err(ShellError::NotFound(key));
        }
        self.bump();
        Ok(())
    }

    /// Move `src`'s content to `dst`, replacing anything at `dst`.
    pub fn rename_file(&mut self, src: &CanonicalPath, dst: &CanonicalPath) -> Result<()> {
        if src.is_root() || dst.is_root() {
            return Err(ShellError::InvalidArgument("invalid path".to_string()));
        }
        let content = self
            .files
            .remove(&src.to_string())
            .ok_or_else(|| ShellError::NotFound(src.to_string()))?;
        self.files.insert(dst.to_string(), content);
        self.bump();
        Ok(())
    }

    pub fn is_user_file(&self, path: &CanonicalPath) -> bool {
        self.files.contains_key(&path.to_string())
    }

    /// All overlay paths, sorted by display form.
    pub fn list(&self) -> Vec<CanonicalPath> {
        self.files.keys().map(|k| CanonicalPath::parse(k)).collect()
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        if !self.files.is_empty() {
            self.files.clear();
            self.bump();
        }
    }

    fn key(path: &CanonicalPath) -> Result<String> {
        if path.is_root() {
            return Err(ShellError::InvalidArgument("invalid filename".to_string()));
        }
        Ok(path.to_string())
    }

    fn bump(&mut self) {
        self.revision += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(s: &str) -> CanonicalPath {
        CanonicalPath::parse(s)
    }

    #[test]
    fn create_is_idempotent() {
        let mut store = OverlayStore::new();
        store.write_file(&p("~/notes.txt"), "keep me").unwrap();
        let rev = store.revision();
        store.create_file(&p("~/notes.txt")).unwrap();
        assert_eq!(store.read_file(&p("~/notes.txt")), Some("keep me"));
        assert_eq!(store.revision(), rev);
    }

    #[test]
    fn create_root_is_invalid() {
        let mut store = OverlayStore::new();
        let err = store.create_file(&CanonicalPath::root()).unwrap_err();
        assert_eq!(err.to_string(), "invalid filename");
    }

    #[test]
    fn write_then_read() {
        let mut store = OverlayStore::new();
        store.write_file(&p("~/a/b.txt"), "hello").unwrap();
        assert_eq!(store.read_file(&p("~/a/b.txt")), Some("hello"));
        assert!(store.is_user_file(&p("~/a/b.txt")));
        assert!(!store.is_user_file(&p("~/a")));
    }

    #[test]
    fn delete_missing_is_not_found() {
        let mut store = OverlayStore::new();
        assert!(matches!(
            store.delete_file(&p("~/ghost")),
            Err(ShellError::NotFound(_))
        ));
    }

    #[test]
    fn rename_moves_content() {
        let mut store = OverlayStore::new();
        store.write_file(&p("~/old.txt"), "data").unwrap();
        store.rename_file(&p("~/old.txt"), &p("~/new.txt")).unwrap();
        assert!(store.read_file(&p("~/old.txt")).is_none());
        assert_eq!(store.read_file(&p("~/new.txt")), Some("data"));
    }

    #[test]
    fn rename_requires_source() {
        let mut store = OverlayStore::new();
        assert!(
            store
                .rename_file(&p("~/about.txt"), &p("~/x.txt"))
                .is_err()
        );
    }

    #[test]
    fn list_is_sorted() {
        let mut store = OverlayStore::new();
        store.write_file(&p("~/z.txt"), "").unwrap();
        store.write_file(&p("~/a/b.txt"), "").unwrap();
        store.write_file(&p("~/a.txt"), "").unwrap();
        let listed: Vec<String> = store.list().iter().map(ToString::to_string).collect();
        assert_eq!(listed, vec!["~/a.txt", "~/a/b.txt", "~/z.txt"]);
    }

    #[test]
    fn every_mutation_bumps_revision() {
        let mut store = OverlayStore::new();
        let r0 = store.revision();
        store.create_file(&p("~/x")).unwrap();
        let r1 = store.revision();
        store.write_file(&p("~/x"), "1").unwrap();
        let r2 = store.revision();
        store.rename_file(&p("~/x"), &p("~/y")).unwrap();
        let r3 = store.revision();
        store.delete_file(&p("~/y")).unwrap();
        let r4 = store.revision();
        assert!(r0 < r1 && r1 < r2 && r2 < r3 && r3 < r4);
    }

    #[test]
    fn from_entries_canonicalizes() {
        let store = OverlayStore::from_entries(vec![
            ("~/a/../b.txt".to_string(), "x".to_string()),
            ("~".to_string(), "dropped".to_string()),
        ]);
        assert_eq!(store.len(), 1);
        assert_eq!(store.read_file(&p("~/b.txt")), Some("x"));
    }

    #[test]
    fn entries_round_trip_through_json() {
        let mut store = OverlayStore::new();
        store.write_file(&p("~/notes.md"), "# hi\n").unwrap();
        let json = serde_json::to_string(&store.entries()).unwrap();
        assert_eq!(json, r##"[["~/notes.md","# hi\n"]]"##);
        let back: Vec<(String, String)> = serde_json::from_str(&json).unwrap();
        let restored = OverlayStore::from_entries(back);
        assert_eq!(restored.read_file(&p("~/notes.md")), Some("# hi\n"));
    }
}
