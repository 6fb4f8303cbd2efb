//! Key-value store persisted as one JSON object on disk.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use retro_core::error::Result;
use retro_core::storage::KeyValueStore;

/// Every key lives in one JSON object. Each change rewrites the file
/// through a temporary sibling and a rename.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl JsonFileStore {
    /// Open the store at `path`. A missing file is an empty store; a corrupt
    /// one is logged and replaced on the next write.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let values = match fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text).unwrap_or_else(|e| {
                log::warn!("Ignoring corrupt state file {}: {e}", path.display());
                BTreeMap::new()
            }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        log::debug!("Opened {} with {} keys", path.display(), values.len());
        Ok(Self { path, values })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<()> {
        if let Some(dir) = self.path.parent()
            && !dir.as_os_str().is_empty()
        {
            fs::create_dir_all(dir)?;
        }
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, serde_json::to_string_pretty(&self.values)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        self.flush()
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        if self.values.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }

    fn apply(&mut self, writes: &[(&str, String)], removals: &[&str]) -> Result<()> {
        for key in removals {
            self.values.remove(*key);
        }
        for (key, value) in writes {
            self.values.insert((*key).to_string(), value.clone());
        }
        self.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::open(dir.path().join("state.json")).unwrap();
        assert!(store.get("retroterm.theme").is_none());
        assert!(!store.path().exists());
    }

    #[test]
    fn values_survive_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("state.json");
        let mut store = JsonFileStore::open(&path).unwrap();
        store
            .apply(
                &[("a", "1".to_string()), ("b", "\"two\"".to_string())],
                &[],
            )
            .unwrap();
        store.remove("a").unwrap();

        let store = JsonFileStore::open(&path).unwrap();
        assert!(store.get("a").is_none());
        assert_eq!(store.get("b").as_deref(), Some("\"two\""));
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn corrupt_file_opens_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, "{not json").unwrap();
        let mut store = JsonFileStore::open(&path).unwrap();
        assert!(store.get("anything").is_none());
        store.set("k", "v").unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"k\""));
    }
}
