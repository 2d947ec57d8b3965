//! Key/value stores holding serialized session parts.

use std::collections::HashMap;
use std::fmt;
use std::io;
use std::path::{
    Path,
    PathBuf,
};

use thiserror::Error;

/// Errors reading or writing saved entries.
#[derive(Error, Debug)]
pub enum StorageError {
    /// The entry could not be read, written or removed.
    #[error("Failed to access stored entry '{key}': {source}")]
    Io {
        /// Entry name.
        key: String,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The entry is not the JSON it should be.
    #[error("Stored entry '{key}' is malformed: {source}")]
    Malformed {
        /// Entry name.
        key: String,
        /// Parser error.
        #[source]
        source: serde_json::Error,
    },

    /// The saved cursor is not a non-negative integer.
    #[error("Stored cursor '{0}' is not a number")]
    InvalidIndex(String),

    /// The saved parts do not describe one session.
    #[error("Stored session is inconsistent with its pairs")]
    Inconsistent,
}

/// String entries addressed by stable keys.
pub trait SessionStore: Send + fmt::Debug {
    /// Value of `key`, or `None` when absent.
    ///
    /// # Errors
    /// Returns [`StorageError`] when the entry exists but cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    /// Returns [`StorageError`] when the entry cannot be written.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removes `key`. Removing an absent entry succeeds.
    ///
    /// # Errors
    /// Returns [`StorageError`] when the entry cannot be removed.
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// One file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    /// Directory holding the entry files.
    dir: PathBuf,
}

impl FileStore {
    /// The directory is created on the first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the entries.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// `<dir>/<key>.json`
    fn entry_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

/// Wraps an I/O error with the entry name.
fn io_error(key: &str) -> impl FnOnce(io::Error) -> StorageError + '_ {
    move |source| StorageError::Io { key: key.to_string(), source }
}

impl SessionStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match std::fs::read_to_string(self.entry_path(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error(key)(e)),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        std::fs::create_dir_all(&self.dir).map_err(io_error(key))?;
        std::fs::write(self.entry_path(key), value).map_err(io_error(key))
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        match std::fs::remove_file(self.entry_path(key)) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(io_error(key)(e)),
            _ => Ok(()),
        }
    }
}

/// Process-local store, used when no workspace is open.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    /// Entries by name.
    entries: HashMap<String, String>,
}

impl MemoryStore {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl SessionStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;
    use tempfile::TempDir;

    use super::*;

    /// FileStore: set, get, remove
    #[googletest::test]
    fn test_file_store_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = FileStore::new(temp_dir.path().join("state"));

        expect_that!(store.get("k").unwrap().as_deref(), none());

        store.set("k", "value").unwrap();
        expect_that!(store.get("k").unwrap().as_deref(), some(eq("value")));
        expect_that!(temp_dir.path().join("state").join("k.json").exists(), eq(true));

        store.remove("k").unwrap();
        expect_that!(store.get("k").unwrap().as_deref(), none());
    }

    /// FileStore::remove: absent entry
    #[rstest]
    fn test_file_store_remove_absent() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = FileStore::new(temp_dir.path());

        assert!(store.remove("nothing").is_ok());
    }

    /// FileStore::get: unreadable entry
    #[rstest]
    fn test_file_store_unreadable_entry() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::create_dir(temp_dir.path().join("k.json")).unwrap();
        let store = FileStore::new(temp_dir.path());

        assert!(matches!(store.get("k"), Err(StorageError::Io { ref key, .. }) if key == "k"));
    }

    /// MemoryStore: set overwrites
    #[rstest]
    fn test_memory_store_overwrites() {
        let mut store = MemoryStore::new();

        store.set("k", "1").unwrap();
        store.set("k", "2").unwrap();

        assert_eq!(store.get("k").unwrap().as_deref(), Some("2"));
        assert_eq!(store.len(), 1);

        store.remove("k").unwrap();
        assert!(store.is_empty());
    }
}
