//! Cart Storage
//!
//! Durable key-value storage for cart snapshots.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use rustc_hash::FxHashMap;
use thiserror::Error;

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    /// IO error reading or writing the backing file
    #[error("storage I/O failed: {0}")]
    Io(#[from] io::Error),

    /// The backing store refused the operation
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Key-value store scoped to the shopper's session.
pub trait CartStorage {
    /// Read the value stored under `key`, `None` if nothing was stored.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the store cannot be read.
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the value was not stored.
    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// In-process storage, lost when dropped.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: FxHashMap<String, String>,
}

impl MemoryStorage {
    /// Create empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create storage holding one value.
    pub fn with_entry(key: &str, value: impl Into<String>) -> Self {
        let mut storage = Self::new();

        storage.entries.insert(key.to_string(), value.into());

        storage
    }

    /// Get the value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }
}

impl CartStorage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());

        Ok(())
    }
}

/// Storage backed by one JSON file per key in a directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Create storage rooted at `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the stored files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl CartStorage for FileStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir)?;

        // Write beside the target and rename so readers never see a partial file.
        let target = self.path(key);
        let staging = self.dir.join(format!("{key}.json.tmp"));

        fs::write(&staging, value)?;
        fs::rename(&staging, &target)?;

        Ok(())
    }
}
