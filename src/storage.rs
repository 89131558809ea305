//! Local key-value persistence for notes.
//!
//! Wraps a simple store (one file per key under the state dir) behind the
//! `NotesStore` trait. Availability is probed once at open; an unavailable
//! store answers every call with `StorageError::Unavailable` instead of
//! failing the notes feature outright.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use parking_lot::Mutex;

use crate::error::StorageError;

/// Storage key for the free-text notes value.
pub const NOTES_KEY: &str = "notes";

/// Key-value store used by notes autosave.
///
/// `load` distinguishes a missing key (`Ok(None)`, "first run") from an
/// empty string (an explicitly saved empty value).
pub trait NotesStore: Send + Sync {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn save(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
    fn is_available(&self) -> bool;
}

/// File-backed store: one `<key>.txt` per key under a directory.
pub struct FileStore {
    dir: PathBuf,
    available: bool,
}

impl FileStore {
    /// Open the store, probing writability once. A store that fails the
    /// probe (sandboxed environment, read-only disk) stays constructed but
    /// degraded: every operation reports `Unavailable`.
    pub fn open(dir: PathBuf) -> Self {
        let available = Self::probe(&dir);
        if !available {
            log::warn!(
                "Notes storage unavailable at {}; notes will not persist",
                dir.display()
            );
        }
        Self { dir, available }
    }

    fn probe(dir: &PathBuf) -> bool {
        if fs::create_dir_all(dir).is_err() {
            return false;
        }
        let probe = dir.join(".probe");
        if fs::write(&probe, b"").is_err() {
            return false;
        }
        let _ = fs::remove_file(&probe);
        true
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.txt"))
    }
}

impl NotesStore for FileStore {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        if !self.available {
            return Err(StorageError::Unavailable);
        }
        match fs::read_to_string(self.key_path(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::Io(e.to_string())),
        }
    }

    fn save(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if !self.available {
            return Err(StorageError::Unavailable);
        }
        fs::write(self.key_path(key), value).map_err(|e| StorageError::Io(e.to_string()))
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        if !self.available {
            return Err(StorageError::Unavailable);
        }
        match fs::remove_file(self.key_path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::Io(e.to_string())),
        }
    }

    fn is_available(&self) -> bool {
        self.available
    }
}

/// In-memory store for tests and the mock-backed demo.
pub struct MemoryStore {
    map: Mutex<HashMap<String, String>>,
    available: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            map: Mutex::new(HashMap::new()),
            available: true,
        }
    }

    /// A store that reports unavailable on every operation.
    pub fn unavailable() -> Self {
        Self {
            map: Mutex::new(HashMap::new()),
            available: false,
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl NotesStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        if !self.available {
            return Err(StorageError::Unavailable);
        }
        Ok(self.map.lock().get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if !self.available {
            return Err(StorageError::Unavailable);
        }
        self.map.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        if !self.available {
            return Err(StorageError::Unavailable);
        }
        self.map.lock().remove(key);
        Ok(())
    }

    fn is_available(&self) -> bool {
        self.available
    }
}
