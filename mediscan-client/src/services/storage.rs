//! Key/value backends for the session store.
//!
//! Values are plain strings, mirroring browser local storage. A `set_many`
//! or `remove_many` call is applied as a unit by every backend.

use mediscan_core::AppError;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage lock poisoned")]
    Poisoned,
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        AppError::StorageError(anyhow::Error::new(err))
    }
}

pub trait KeyValueStorage: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set_many(&self, entries: &[(&str, String)]) -> Result<(), StorageError>;

    fn remove_many(&self, keys: &[&str]) -> Result<(), StorageError>;

    fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        self.set_many(&[(key, value)])
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.remove_many(&[key])
    }
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, StorageError> {
    mutex.lock().map_err(|_| StorageError::Poisoned)
}

/// Process-local storage. Contents vanish with the process.
#[derive(Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(lock(&self.entries)?.get(key).cloned())
    }

    fn set_many(&self, entries: &[(&str, String)]) -> Result<(), StorageError> {
        let mut map = lock(&self.entries)?;
        for (key, value) in entries {
            map.insert((*key).to_string(), value.clone());
        }
        Ok(())
    }

    fn remove_many(&self, keys: &[&str]) -> Result<(), StorageError> {
        let mut map = lock(&self.entries)?;
        for key in keys {
            map.remove(*key);
        }
        Ok(())
    }
}

/// Storage persisted as one JSON object on disk.
///
/// Every mutation rewrites the whole file through a temporary sibling and a
/// rename, so readers never observe a half-written record.
pub struct FileStorage {
    path: PathBuf,
    entries: Mutex<HashMap<String, String>>,
}

impl FileStorage {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();

        let entries = match std::fs::read(&path) {
            Ok(bytes) if bytes.is_empty() => HashMap::new(),
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(entries) => entries,
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "Session file is corrupt, starting with an empty session"
                    );
                    HashMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(source) => return Err(StorageError::Io { path, source }),
        };

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &HashMap<String, String>) -> Result<(), StorageError> {
        let bytes = serde_json::to_vec_pretty(entries)?;
        let tmp = self.path.with_extension("tmp");

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| StorageError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        std::fs::write(&tmp, bytes).map_err(|source| StorageError::Io {
            path: tmp.clone(),
            source,
        })?;
        std::fs::rename(&tmp, &self.path).map_err(|source| StorageError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(lock(&self.entries)?.get(key).cloned())
    }

    fn set_many(&self, entries: &[(&str, String)]) -> Result<(), StorageError> {
        let mut map = lock(&self.entries)?;
        let mut next = map.clone();
        for (key, value) in entries {
            next.insert((*key).to_string(), value.clone());
        }
        self.persist(&next)?;
        *map = next;
        Ok(())
    }

    fn remove_many(&self, keys: &[&str]) -> Result<(), StorageError> {
        let mut map = lock(&self.entries)?;
        if keys.iter().all(|key| !map.contains_key(*key)) {
            return Ok(());
        }
        let mut next = map.clone();
        for key in keys {
            next.remove(*key);
        }
        self.persist(&next)?;
        *map = next;
        Ok(())
    }
}
