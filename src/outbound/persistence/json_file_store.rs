//! File-backed key-value store.
//!
//! Persists the whole key map as one JSON object file, the local-storage
//! equivalent for a desktop host. Writes are whole-file overwrites with no
//! partial-write protection: two processes sharing the same file silently
//! overwrite each other's last write.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::PathBuf;

use crate::domain::ports::{KeyValueStore, KeyValueStoreError};

/// Key-value store backed by a single JSON object file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Use (or create on first write) the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_map(&self) -> Result<BTreeMap<String, String>, KeyValueStoreError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(error) if error.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(error) => return Err(KeyValueStoreError::backend(error.to_string())),
        };
        serde_json::from_str(&raw).map_err(|error| KeyValueStoreError::backend(error.to_string()))
    }

    fn write_map(&self, map: &BTreeMap<String, String>) -> Result<(), KeyValueStoreError> {
        let raw = serde_json::to_string_pretty(map)
            .map_err(|error| KeyValueStoreError::backend(error.to_string()))?;
        std::fs::write(&self.path, raw)
            .map_err(|error| KeyValueStoreError::backend(error.to_string()))
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, KeyValueStoreError> {
        Ok(self.read_map()?.get(key).cloned())
    }

    fn put(&self, key: &str, value: &str) -> Result<(), KeyValueStoreError> {
        let mut map = self.read_map().unwrap_or_default();
        map.insert(key.to_owned(), value.to_owned());
        self.write_map(&map)
    }

    fn remove(&self, key: &str) -> Result<(), KeyValueStoreError> {
        let mut map = match self.read_map() {
            Ok(map) => map,
            // A corrupt file has nothing worth keeping.
            Err(_) => return Ok(()),
        };
        map.remove(key);
        self.write_map(&map)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn values_survive_a_new_handle_on_the_same_file() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("store.json");

        let first = JsonFileStore::new(&path);
        first.put("k", "v").expect("put");

        let second = JsonFileStore::new(&path);
        assert_eq!(second.get("k").expect("get"), Some("v".to_owned()));
        second.remove("k").expect("remove");
        assert_eq!(first.get("k").expect("get"), None);
    }

    #[test]
    fn missing_file_reads_as_empty() {
        let dir = tempdir().expect("temp dir");
        let store = JsonFileStore::new(dir.path().join("absent.json"));
        assert_eq!(store.get("k").expect("get"), None);
    }

    #[test]
    fn corrupt_file_surfaces_a_backend_error_on_get() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("store.json");
        std::fs::write(&path, "{broken").expect("write corrupt file");
        let store = JsonFileStore::new(&path);
        assert!(store.get("k").is_err());
    }

    #[test]
    fn put_replaces_a_corrupt_file() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("store.json");
        std::fs::write(&path, "{broken").expect("write corrupt file");
        let store = JsonFileStore::new(&path);
        store.put("k", "v").expect("put");
        assert_eq!(store.get("k").expect("get"), Some("v".to_owned()));
    }
}
