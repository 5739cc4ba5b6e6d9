//! Key-value storage backends for persisted client state.
//!
//! The session store runs against the [`KvStore`] trait so the same
//! logic works over an in-memory map (tests, kiosk mode) or a JSON
//! file on disk (desktop shell).

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use dashmap::DashMap;

/// String key-value storage with key enumeration.
///
/// `keys()` exists so logout can sweep a whole cache namespace without
/// the store tracking every entry it ever wrote.
pub trait KvStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
    fn keys(&self) -> Vec<String>;
}

/// Volatile in-memory store.
#[derive(Debug, Default)]
pub struct MemoryKvStore {
    entries: DashMap<String, String>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemoryKvStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).map(|entry| entry.clone())
    }

    fn set(&self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.entries.remove(key);
    }

    fn keys(&self) -> Vec<String> {
        self.entries.iter().map(|entry| entry.key().clone()).collect()
    }
}

/// File-backed store persisting all entries as a single JSON object.
///
/// Reads are served from memory; every mutation rewrites the file. A
/// missing or corrupt file starts the store empty instead of failing
/// the caller, and write failures are logged rather than surfaced:
/// losing persistence degrades to a per-run session, nothing worse.
pub struct FileKvStore {
    path: PathBuf,
    entries: RwLock<HashMap<String, String>>,
}

impl FileKvStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = Self::read_entries(&path);
        Self {
            path,
            entries: RwLock::new(entries),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(path: &Path) -> HashMap<String, String> {
        let Ok(content) = std::fs::read_to_string(path) else {
            return HashMap::new();
        };
        match serde_json::from_str(&content) {
            Ok(entries) => entries,
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "Discarding corrupt storage file");
                HashMap::new()
            }
        }
    }

    fn persist(&self, entries: &HashMap<String, String>) {
        if let Some(parent) = self.path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        match serde_json::to_string_pretty(entries) {
            Ok(content) => {
                if let Err(err) = std::fs::write(&self.path, content) {
                    tracing::error!(path = %self.path.display(), error = %err, "Failed to persist storage file");
                }
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to serialize storage entries");
            }
        }
    }

    fn read_lock(&self) -> RwLockReadGuard<'_, HashMap<String, String>> {
        self.entries
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_lock(&self) -> RwLockWriteGuard<'_, HashMap<String, String>> {
        self.entries
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl KvStore for FileKvStore {
    fn get(&self, key: &str) -> Option<String> {
        self.read_lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        let mut entries = self.write_lock();
        entries.insert(key.to_string(), value.to_string());
        self.persist(&entries);
    }

    fn remove(&self, key: &str) {
        let mut entries = self.write_lock();
        if entries.remove(key).is_some() {
            self.persist(&entries);
        }
    }

    fn keys(&self) -> Vec<String> {
        self.read_lock().keys().cloned().collect()
    }
}
