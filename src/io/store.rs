//! Caller-keyed JSON persistence.

use crate::core::{Error, Result};
use parking_lot::RwLock;
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

/// Per-caller JSON values under string keys.
///
/// Callers and keys are single path-safe segments; nested keys use `/`.
pub trait KeyValueStore: Send + Sync {
    fn save(&self, caller: &str, key: &str, value: &Value) -> Result<()>;

    /// `Ok(None)` when nothing was saved under `key`.
    fn load(&self, caller: &str, key: &str) -> Result<Option<Value>>;

    /// Deleting a missing key is not an error.
    fn delete(&self, caller: &str, key: &str) -> Result<()>;
}

/// One pretty-printed JSON file per `(caller, key)` below a root directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// `DESIGNMAP_STORE_DIR`, then the platform cache directory, then the
    /// temp directory.
    pub fn default_root() -> PathBuf {
        if let Ok(custom) = std::env::var("DESIGNMAP_STORE_DIR") {
            return PathBuf::from(custom);
        }
        match dirs::cache_dir() {
            Some(cache) => cache.join("designmap"),
            None => std::env::temp_dir().join("designmap_store"),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn entry_path(&self, caller: &str, key: &str) -> Result<PathBuf> {
        check_segment(caller, caller)?;
        let mut path = self.root.join(caller);
        for segment in key.split('/') {
            check_segment(segment, key)?;
            path.push(segment);
        }
        path.set_extension("json");
        Ok(path)
    }
}

impl Default for FileStore {
    fn default() -> Self {
        Self::new(Self::default_root())
    }
}

impl KeyValueStore for FileStore {
    fn save(&self, caller: &str, key: &str, value: &Value) -> Result<()> {
        let path = self.entry_path(caller, key)?;
        let body = serde_json::to_vec_pretty(value)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| Error::store(e.to_string(), Some(parent.to_path_buf())))?;
        }
        fs::write(&path, body).map_err(|e| Error::store(e.to_string(), Some(path.clone())))?;
        log::debug!("Saved {caller}/{key} to {}", path.display());
        Ok(())
    }

    fn load(&self, caller: &str, key: &str) -> Result<Option<Value>> {
        let path = self.entry_path(caller, key)?;
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(Error::store(e.to_string(), Some(path))),
        };
        let value = serde_json::from_slice(&bytes)
            .map_err(|e| Error::store(format!("corrupt entry: {e}"), Some(path)))?;
        Ok(Some(value))
    }

    fn delete(&self, caller: &str, key: &str) -> Result<()> {
        let path = self.entry_path(caller, key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::store(e.to_string(), Some(path))),
        }
    }
}

fn check_segment(segment: &str, whole: &str) -> Result<()> {
    let valid = !segment.is_empty()
        && segment != "."
        && segment != ".."
        && !segment.contains(['\\', '/', ':'])
        && !segment.chars().any(char::is_control);
    if valid {
        Ok(())
    } else {
        Err(Error::store(format!("invalid store key `{whole}`"), None))
    }
}

/// In-process store, for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<(String, String), Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn save(&self, caller: &str, key: &str, value: &Value) -> Result<()> {
        self.entries
            .write()
            .insert((caller.to_string(), key.to_string()), value.clone());
        Ok(())
    }

    fn load(&self, caller: &str, key: &str) -> Result<Option<Value>> {
        Ok(self
            .entries
            .read()
            .get(&(caller.to_string(), key.to_string()))
            .cloned())
    }

    fn delete(&self, caller: &str, key: &str) -> Result<()> {
        self.entries
            .write()
            .remove(&(caller.to_string(), key.to_string()));
        Ok(())
    }
}

/// Stable key for a set of input files: the first 16 hex digits of a
/// SHA-256 over every path and body in path order.
pub fn content_key(files: &BTreeMap<String, Vec<u8>>) -> String {
    let mut hasher = Sha256::new();
    for (path, body) in files {
        hasher.update(path.as_bytes());
        hasher.update([0]);
        hasher.update((body.len() as u64).to_le_bytes());
        hasher.update(body);
    }
    let hash = format!("{:x}", hasher.finalize());
    hash[..16].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn exercise(store: &dyn KeyValueStore) {
        assert_eq!(store.load("alice", "doc").unwrap(), None);

        store.save("alice", "doc", &json!({"v": 1})).unwrap();
        store.save("bob", "doc", &json!({"v": 2})).unwrap();
        assert_eq!(store.load("alice", "doc").unwrap(), Some(json!({"v": 1})));
        assert_eq!(store.load("bob", "doc").unwrap(), Some(json!({"v": 2})));

        store.save("alice", "doc", &json!({"v": 3})).unwrap();
        assert_eq!(store.load("alice", "doc").unwrap(), Some(json!({"v": 3})));

        store.delete("alice", "doc").unwrap();
        store.delete("alice", "doc").unwrap();
        assert_eq!(store.load("alice", "doc").unwrap(), None);
        assert!(store.load("bob", "doc").unwrap().is_some());
    }

    #[test]
    fn test_memory_store_contract() {
        let store = MemoryStore::new();
        exercise(&store);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_file_store_contract() {
        let dir = TempDir::new().unwrap();
        exercise(&FileStore::new(dir.path()));
    }

    #[test]
    fn test_file_store_layout() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());
        store.save("alice", "docs/shop", &json!([1])).unwrap();
        assert!(dir.path().join("alice").join("docs").join("shop.json").is_file());
        assert_eq!(store.load("alice", "docs/shop").unwrap(), Some(json!([1])));
    }

    #[test]
    fn test_file_store_rejects_escaping_keys() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());
        for (caller, key) in [("..", "doc"), ("alice", "../doc"), ("alice", ""), ("a/b", "doc")] {
            let err = store.save(caller, key, &json!(1)).unwrap_err();
            assert!(matches!(err, Error::Store { .. }), "{caller} {key}");
        }
    }

    #[test]
    fn test_corrupt_entry_is_a_store_error() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("alice")).unwrap();
        fs::write(dir.path().join("alice").join("doc.json"), "{").unwrap();
        let err = FileStore::new(dir.path()).load("alice", "doc").unwrap_err();
        assert!(err.to_string().contains("corrupt entry"));
    }

    #[test]
    fn test_content_key_is_stable_and_sensitive() {
        let mut files = BTreeMap::new();
        files.insert("a.py".to_string(), b"import os".to_vec());
        let first = content_key(&files);
        assert_eq!(first.len(), 16);
        assert_eq!(first, content_key(&files));

        files.insert("b.py".to_string(), Vec::new());
        assert_ne!(first, content_key(&files));
    }
}
