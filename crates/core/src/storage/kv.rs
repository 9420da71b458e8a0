use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use crate::errors::CoreError;

/// A local string-to-string persistence medium.
///
/// Every value is an opaque string, the way a browser `localStorage` holds
/// them; typed encoding lives in [`super::manager::StorageManager`].
/// Implementations write through: once `set` returns `Ok`, the value is
/// durable as far as the medium goes.
pub trait KeyValueStore: Send {
    /// Human-readable name of this medium (for logs/errors).
    fn name(&self) -> &str;

    /// Read the value stored under `key`, if any.
    fn get(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: String) -> Result<(), CoreError>;

    /// Delete `key`. Removing an absent key is not an error.
    fn remove(&mut self, key: &str) -> Result<(), CoreError>;
}

/// Volatile store for tests and throwaway sessions.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a store with raw key/value pairs.
    pub fn with_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), CoreError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), CoreError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// All keys kept in a single JSON object file, rewritten in full on every write.
///
/// A missing file opens as an empty store. A file that exists but does not
/// hold a JSON object of strings is also treated as empty, and is
/// overwritten by the next write.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    /// Open (or lazily create) the store file at `path`.
    ///
    /// Content that does not parse as a JSON object of strings, invalid UTF-8
    /// included, is discarded with a warning. Only I/O failures are errors.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, CoreError> {
        let path = path.as_ref().to_path_buf();
        let entries = match std::fs::read(&path) {
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(entries) => entries,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "discarding unreadable key-value file");
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                return Err(CoreError::Storage(format!(
                    "Failed to read {}: {e}",
                    path.display()
                )))
            }
        };

        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), CoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let payload = serde_json::to_string_pretty(&self.entries)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize key-value file: {e}")))?;
        std::fs::write(&self.path, payload)?;
        tracing::debug!(path = %self.path.display(), keys = self.entries.len(), "key-value file written");
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn name(&self) -> &str {
        "file"
    }

    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), CoreError> {
        self.entries.insert(key.to_string(), value);
        self.flush()
    }

    fn remove(&mut self, key: &str) -> Result<(), CoreError> {
        if self.entries.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }
}
