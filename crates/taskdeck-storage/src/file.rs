//! File-backed token storage.
//!
//! Stores all slots in a single JSON object file. This is the native
//! counterpart of the browser's localStorage: a small, durable key/value
//! map that survives restarts.

use crate::{StorageError, StorageResult, TokenStore};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Token storage backed by a JSON file on disk.
pub struct FileStorage {
    path: PathBuf,
    /// Serializes read-modify-write cycles on the backing file.
    write_lock: Mutex<()>,
}

impl FileStorage {
    /// Create a storage instance backed by the given file path.
    ///
    /// The file is created lazily on first write; a missing file reads as
    /// an empty map.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    fn read_map(&self) -> StorageResult<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = std::fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&content).map_err(|e| StorageError::Encoding(e.to_string()))
    }

    fn write_map(&self, map: &BTreeMap<String, String>) -> StorageResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            serde_json::to_string_pretty(map).map_err(|e| StorageError::Encoding(e.to_string()))?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileStorage {
    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut map = self.read_map()?;
        map.insert(key.to_string(), value.to_string());
        self.write_map(&map)
    }

    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.read_map()?.get(key).cloned())
    }

    fn delete(&self, key: &str) -> StorageResult<bool> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut map = self.read_map()?;
        let existed = map.remove(key).is_some();
        if existed {
            self.write_map(&map)?;
        }
        Ok(existed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_reads_empty() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("tokens.json"));

        assert_eq!(storage.get("access_token").unwrap(), None);
        assert!(!storage.has("access_token").unwrap());
    }

    #[test]
    fn test_set_get_delete() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("tokens.json"));

        storage.set("access_token", "tok-1").unwrap();
        assert_eq!(
            storage.get("access_token").unwrap(),
            Some("tok-1".to_string())
        );

        storage.set("access_token", "tok-2").unwrap();
        assert_eq!(
            storage.get("access_token").unwrap(),
            Some("tok-2".to_string())
        );

        assert!(storage.delete("access_token").unwrap());
        assert!(!storage.delete("access_token").unwrap());
        assert_eq!(storage.get("access_token").unwrap(), None);
    }

    #[test]
    fn test_values_survive_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tokens.json");

        FileStorage::new(&path).set("refresh_token", "r-1").unwrap();

        let reopened = FileStorage::new(&path);
        assert_eq!(
            reopened.get("refresh_token").unwrap(),
            Some("r-1".to_string())
        );
    }

    #[test]
    fn test_creates_parent_dirs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("deep").join("tokens.json");

        let storage = FileStorage::new(&path);
        storage.set("access_token", "tok").unwrap();

        assert!(path.exists());
    }

    #[test]
    fn test_corrupt_file_is_an_error_not_a_panic() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tokens.json");
        std::fs::write(&path, "not json at all").unwrap();

        let storage = FileStorage::new(&path);
        assert!(storage.get("access_token").is_err());
    }
}
