//! Session-scoped key/value store
//!
//! The checkout handoff survives a restart through an opaque last-value store:
//! string keys mapped to JSON strings. The store is owned by the top-level
//! session and passed explicitly to whoever needs it.

use crate::error::StoreError;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Opaque last-value store
pub trait SessionStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError>;
    fn clear(&mut self, key: &str) -> Result<(), StoreError>;
}

/// Store that lives only as long as the process
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    values: BTreeMap<String, String>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }

    fn clear(&mut self, key: &str) -> Result<(), StoreError> {
        self.values.remove(key);
        Ok(())
    }
}

/// Store persisted as one JSON object in a session directory.
///
/// The whole file is rewritten on every `set`/`clear`.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FileSessionStore {
    /// File name used inside the session directory
    pub const FILE_NAME: &'static str = "session.json";

    /// Open (or start) the store in `dir`.
    ///
    /// A session file that is not a JSON object of strings opens empty and is
    /// overwritten by the next `set`.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir).map_err(|source| StoreError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let path = dir.join(Self::FILE_NAME);
        let values = match fs::read_to_string(&path) {
            Ok(content) if content.trim().is_empty() => BTreeMap::new(),
            Ok(content) => match serde_json::from_str(&content) {
                Ok(values) => values,
                Err(e) => {
                    warn!(path = ?path, error = %e, "ignoring unreadable session file");
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => return Err(StoreError::Io { path, source }),
        };
        debug!(path = ?path, keys = values.len(), "session store opened");
        Ok(Self { path, values })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, values: &BTreeMap<String, String>) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(values)?;
        fs::write(&self.path, json).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        let mut next = self.values.clone();
        next.insert(key.to_string(), value);
        self.write(&next)?;
        self.values = next;
        Ok(())
    }

    fn clear(&mut self, key: &str) -> Result<(), StoreError> {
        if !self.values.contains_key(key) {
            return Ok(());
        }
        let mut next = self.values.clone();
        next.remove(key);
        self.write(&next)?;
        self.values = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_roundtrip() {
        let mut store = MemorySessionStore::new();
        assert_eq!(store.get("k"), None);
        store.set("k", "v".to_string()).unwrap();
        assert_eq!(store.get("k").as_deref(), Some("v"));
        store.clear("k").unwrap();
        assert_eq!(store.get("k"), None);
    }

    #[test]
    fn test_file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut store = FileSessionStore::open(dir.path()).unwrap();
            store.set("gigahz_checkout", "{\"a\":1}".to_string()).unwrap();
        }
        let store = FileSessionStore::open(dir.path()).unwrap();
        assert_eq!(store.get("gigahz_checkout").as_deref(), Some("{\"a\":1}"));
    }

    #[test]
    fn test_corrupt_file_opens_empty_and_is_rewritten() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join(FileSessionStore::FILE_NAME);
        fs::write(&file, "{truncated").unwrap();

        let mut store = FileSessionStore::open(dir.path()).unwrap();
        assert_eq!(store.get("gigahz_checkout"), None);

        store.set("gigahz_checkout", "{}".to_string()).unwrap();
        let reopened = FileSessionStore::open(dir.path()).unwrap();
        assert_eq!(reopened.get("gigahz_checkout").as_deref(), Some("{}"));
    }

    #[test]
    fn test_failed_write_leaves_values_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileSessionStore::open(dir.path()).unwrap();
        store.set("kept", "1".to_string()).unwrap();

        // A directory where the file should be makes every write fail
        let blocked = dir.path().join("blocked");
        fs::create_dir_all(blocked.join(FileSessionStore::FILE_NAME)).unwrap();
        store.path = blocked.join(FileSessionStore::FILE_NAME);

        assert!(matches!(
            store.set("lost", "2".to_string()),
            Err(StoreError::Io { .. })
        ));
        assert_eq!(store.get("lost"), None);
        assert!(store.clear("kept").is_err());
        assert_eq!(store.get("kept").as_deref(), Some("1"));
    }
}
