//! Key-value persistence port.
//!
//! The engine only sees [`KeyValueStore`]. `MemoryStore` backs tests and
//! previews; `FileStore` keeps everything in one JSON object on disk.

use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<Value>;
    fn set(&mut self, key: &str, value: Value);
    fn remove(&mut self, key: &str);

    /// Push buffered writes to durable storage. Fire-and-forget.
    fn flush(&mut self) {}
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Option<Value> {
        (**self).get(key)
    }
    fn set(&mut self, key: &str, value: Value) {
        (**self).set(key, value)
    }
    fn remove(&mut self, key: &str) {
        (**self).remove(key)
    }
    fn flush(&mut self) {
        (**self).flush()
    }
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{} does not hold a JSON object", path.display())]
    NotAnObject { path: PathBuf },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryStore {
    entries: BTreeMap<String, Value>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: Value) {
        self.entries.insert(key.to_string(), value);
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

/// JSON-object file store. Writes are buffered until [`KeyValueStore::flush`].
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: Map<String, Value>,
    dirty: bool,
}

impl FileStore {
    /// Open `path`, starting empty if the file is missing or unreadable.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        match Self::open_strict(&path) {
            Ok(store) => store,
            Err(e) => {
                tracing::warn!(error = %e, "state file unusable, starting empty");
                Self {
                    path,
                    entries: Map::new(),
                    dirty: false,
                }
            }
        }
    }

    /// Like [`FileStore::open`] but reports a corrupt file instead of discarding it.
    /// A missing file is still fine.
    pub fn open_strict(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            return Ok(Self {
                path,
                entries: Map::new(),
                dirty: false,
            });
        }

        let raw = fs::read_to_string(&path).map_err(|source| StoreError::Io {
            path: path.clone(),
            source,
        })?;
        let value: Value = serde_json::from_str(&raw).map_err(|source| StoreError::Json {
            path: path.clone(),
            source,
        })?;
        let Value::Object(entries) = value else {
            return Err(StoreError::NotAnObject { path });
        };

        Ok(Self {
            path,
            entries,
            dirty: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the whole object via temp file + rename.
    pub fn try_flush(&mut self) -> Result<(), StoreError> {
        if !self.dirty {
            return Ok(());
        }

        let io_err = |source: std::io::Error| StoreError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let json = serde_json::to_string_pretty(&self.entries).map_err(|source| StoreError::Json {
            path: self.path.clone(),
            source,
        })?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(io_err)?;
        fs::rename(&tmp, &self.path).map_err(io_err)?;

        self.dirty = false;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: Value) {
        self.entries.insert(key.to_string(), value);
        self.dirty = true;
    }

    fn remove(&mut self, key: &str) {
        if self.entries.remove(key).is_some() {
            self.dirty = true;
        }
    }

    fn flush(&mut self) {
        if let Err(e) = self.try_flush() {
            tracing::warn!(error = %e, "dropping failed state write");
        }
    }
}
