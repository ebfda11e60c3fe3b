//! services/dashboard/src/adapters/session_store.rs
//!
//! Implementations of the `SessionStore` port: an in-memory map, and a JSON
//! file that plays the part of the browser's local storage between runs.

use smartdoc_core::ports::{PortError, PortResult, SessionStore};
use std::collections::{BTreeMap, HashMap};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::NamedTempFile;
use tracing::warn;

#[derive(Debug, Default)]
pub struct MemorySessionStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemorySessionStore {
    fn entries(&self) -> PortResult<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|e| PortError::Storage(e.to_string()))
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> PortResult<Option<String>> {
        Ok(self.entries()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> PortResult<()> {
        self.entries()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> PortResult<()> {
        self.entries()?.remove(key);
        Ok(())
    }
}

/// Stores all keys as one JSON object. A missing file is an empty store.
#[derive(Debug)]
pub struct FileSessionStore {
    path: PathBuf,
    // Serialises read-modify-write cycles within this process.
    lock: Mutex<()>,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> PortResult<BTreeMap<String, String>> {
        match std::fs::read(&self.path) {
            Ok(bytes) if bytes.is_empty() => Ok(BTreeMap::new()),
            Ok(bytes) => {
                serde_json::from_slice(&bytes).map_err(|e| PortError::Decode(e.to_string()))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(PortError::Storage(e.to_string())),
        }
    }

    /// Replaces the file in one rename so a reader never sees half a write.
    fn write(&self, entries: &BTreeMap<String, String>) -> PortResult<()> {
        let parent = match self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            Some(parent) => parent,
            None => Path::new("."),
        };
        std::fs::create_dir_all(parent).map_err(|e| PortError::Storage(e.to_string()))?;

        let json =
            serde_json::to_vec_pretty(entries).map_err(|e| PortError::Unexpected(e.to_string()))?;
        let mut staged =
            NamedTempFile::new_in(parent).map_err(|e| PortError::Storage(e.to_string()))?;
        staged
            .write_all(&json)
            .map_err(|e| PortError::Storage(e.to_string()))?;
        staged
            .persist(&self.path)
            .map_err(|e| PortError::Storage(e.error.to_string()))?;
        Ok(())
    }

    fn update<F>(&self, change: F) -> PortResult<()>
    where
        F: FnOnce(&mut BTreeMap<String, String>) -> bool,
    {
        let _held = self
            .lock
            .lock()
            .map_err(|e| PortError::Storage(e.to_string()))?;
        let (mut entries, corrupt) = match self.read() {
            Ok(entries) => (entries, false),
            Err(PortError::Decode(e)) => {
                warn!("Session file {} is unreadable, starting over: {}", self.path.display(), e);
                (BTreeMap::new(), true)
            }
            Err(e) => return Err(e),
        };
        if change(&mut entries) || corrupt {
            self.write(&entries)?;
        }
        Ok(())
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self, key: &str) -> PortResult<Option<String>> {
        Ok(self.read()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> PortResult<()> {
        self.update(|entries| {
            entries.insert(key.to_string(), value.to_string());
            true
        })
    }

    fn remove(&self, key: &str) -> PortResult<()> {
        self.update(|entries| entries.remove(key).is_some())
    }
}
