use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::Result;
use tracing::debug;

/// Durable string key/value storage for drafts and the session flag.
///
/// Implementations must degrade quietly: a backend that cannot read or
/// write leaves callers operating on in-memory state for the session.
pub trait DraftStorage: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn put(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// File-backed storage, one `<key>.json` per key.
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl DraftStorage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        let path = self.entry_path(key);
        if !path.exists() {
            return None;
        }
        match std::fs::read_to_string(&path) {
            Ok(contents) => Some(contents),
            Err(e) => {
                debug!(key, error = %e, "Failed to read storage entry");
                None
            }
        }
    }

    fn put(&self, key: &str, value: &str) {
        if let Err(e) = std::fs::write(self.entry_path(key), value) {
            debug!(key, error = %e, "Failed to write storage entry");
        }
    }

    fn remove(&self, key: &str) {
        let path = self.entry_path(key);
        if path.exists() {
            if let Err(e) = std::fs::remove_file(&path) {
                debug!(key, error = %e, "Failed to remove storage entry");
            }
        }
    }
}

/// In-memory storage. Used in tests and as the degraded mode when no
/// durable directory is available.
#[derive(Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl DraftStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.lock().get(key).cloned()
    }

    fn put(&self, key: &str, value: &str) {
        self.lock().insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.lock().remove(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_storage_round_trip() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get("a"), None);

        storage.put("a", "1");
        assert_eq!(storage.get("a").as_deref(), Some("1"));

        storage.remove("a");
        assert_eq!(storage.get("a"), None);
    }

    #[test]
    fn test_keys_are_independent() {
        let storage = MemoryStorage::new();
        storage.put("a", "1");
        storage.put("b", "2");
        storage.remove("a");
        assert_eq!(storage.get("b").as_deref(), Some("2"));
    }

    #[test]
    fn test_file_storage_round_trip() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let storage = FileStorage::new(dir.path().to_path_buf()).expect("create storage");

        assert_eq!(storage.get("draft"), None);
        storage.put("draft", "{\"text\":\"hi\"}");
        assert_eq!(storage.get("draft").as_deref(), Some("{\"text\":\"hi\"}"));

        storage.remove("draft");
        assert_eq!(storage.get("draft"), None);
        assert!(!dir.path().join("draft.json").exists());
    }

    #[test]
    fn test_file_storage_survives_reopen() {
        let dir = tempfile::tempdir().expect("create temp dir");
        {
            let storage = FileStorage::new(dir.path().to_path_buf()).expect("create storage");
            storage.put("draft", "42");
        }
        let storage = FileStorage::new(dir.path().to_path_buf()).expect("reopen storage");
        assert_eq!(storage.get("draft").as_deref(), Some("42"));
    }
}
