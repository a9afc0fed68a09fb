use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::debug;

use super::kv::KeyValueStore;

const STORE_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct StoreDocument {
    version: u32,
    #[serde(default)]
    entries: BTreeMap<String, String>,
}

impl StoreDocument {
    fn new() -> Self {
        Self {
            version: STORE_VERSION,
            entries: BTreeMap::new(),
        }
    }
}

/// Key-value store persisted as a single JSON document.
///
/// Every call reads the file; every write replaces it atomically, so the
/// file is never left half-written.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `store.json` inside a data directory.
    pub fn in_dir(data_dir: &Path) -> Self {
        Self::new(data_dir.join("store.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// If the file doesn't exist, returns an empty document.
    /// An unsupported version is an error.
    fn load(&self) -> Result<StoreDocument> {
        if !self.path.exists() {
            return Ok(StoreDocument::new());
        }

        let file = File::open(&self.path)
            .with_context(|| format!("Failed to open store file at {}", self.path.display()))?;

        let document: StoreDocument = serde_json::from_reader(file)
            .with_context(|| format!("Failed to parse store file at {}", self.path.display()))?;

        if document.version != STORE_VERSION {
            anyhow::bail!("Unsupported store version: {}", document.version);
        }

        Ok(document)
    }

    fn save(&self, document: &StoreDocument) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create data directory at {}", parent.display())
                })?;
            }
        }

        let mut file = AtomicWriteFile::open(&self.path)
            .with_context(|| format!("Failed to open atomic write file at {}", self.path.display()))?;

        serde_json::to_writer_pretty(&mut file, document).context("Failed to serialize store")?;

        file.commit().context("Failed to save store")?;

        debug!(path = %self.path.display(), entries = document.entries.len(), "store written");
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.load()?.entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut document = self.load()?;
        document.entries.insert(key.to_string(), value.to_string());
        self.save(&document)
    }

    fn delete(&self, key: &str) -> Result<()> {
        let mut document = self.load()?;
        if document.entries.remove(key).is_some() {
            self.save(&document)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_reads_empty() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::in_dir(dir.path());
        assert!(store.get("anything").unwrap().is_none());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_set_persists_across_instances() {
        let dir = TempDir::new().unwrap();
        FileStore::in_dir(dir.path()).set("pcos_language", "en").unwrap();

        let reopened = FileStore::in_dir(dir.path());
        assert_eq!(reopened.get("pcos_language").unwrap().as_deref(), Some("en"));
    }

    #[test]
    fn test_creates_missing_parent_directories() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path().join("nested").join("store.json"));
        store.set("k", "v").unwrap();
        assert!(store.path().exists());
    }

    #[test]
    fn test_delete_removes_key() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::in_dir(dir.path());
        store.set("a", "1").unwrap();
        store.set("b", "2").unwrap();
        store.delete("a").unwrap();
        assert!(store.get("a").unwrap().is_none());
        assert_eq!(store.get("b").unwrap().as_deref(), Some("2"));
        // Deleting again is a no-op
        store.delete("a").unwrap();
    }

    #[test]
    fn test_unsupported_version_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, r#"{"version": 2, "entries": {}}"#).unwrap();
        let err = FileStore::new(&path).get("a").unwrap_err();
        assert!(err.to_string().contains("Unsupported store version"));
    }

    #[test]
    fn test_corrupt_file_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, "not json").unwrap();
        assert!(FileStore::new(&path).get("a").is_err());
    }
}
