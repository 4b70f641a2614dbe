//! Local JSON document storage with ACID guarantees.
//!
//! One file holds one document. Provides the safety layer the local
//! caches (drafts, catalog, chats, credentials) sit on.
//!
//! - **Atomicity**: updates are all-or-nothing via tmp file + atomic rename
//! - **Isolation**: an exclusive file lock prevents concurrent writers
//! - **Durability**: explicit fsync before rename

use std::fs::{self, File, OpenOptions};
use std::io::Write as IoWrite;
use std::path::{Path, PathBuf};

use codebin_core::error::{CodebinError, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// A single-document JSON store.
pub struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    /// Creates a new store handle. The file need not exist yet.
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the document.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(T))`: Successfully loaded and deserialized
    /// - `Ok(None)`: File doesn't exist or is empty
    /// - `Err`: Failed to read or parse the file
    pub fn load<T: DeserializeOwned>(&self) -> Result<Option<T>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)?;

        if content.trim().is_empty() {
            return Ok(None);
        }

        let value = serde_json::from_str(&content)?;
        Ok(Some(value))
    }

    /// Saves the document atomically.
    ///
    /// Writes to a temporary file in the same directory, fsyncs, then
    /// renames over the target so readers never observe a torn write.
    pub fn save<T: Serialize>(&self, value: &T) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = self.path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let json_string = serde_json::to_string_pretty(value)?;

        let tmp_path = self.temp_path()?;
        let mut tmp_file = File::create(&tmp_path)?;
        tmp_file.write_all(json_string.as_bytes())?;

        // Ensure data is written to disk
        tmp_file.sync_all()?;
        drop(tmp_file);

        // Atomic rename
        fs::rename(&tmp_path, &self.path)?;

        Ok(())
    }

    /// Performs a transactional update with file locking.
    ///
    /// The update function receives a mutable reference to the current
    /// document (or `default` when the file doesn't exist yet) and the
    /// result is atomically written back.
    pub fn update<T, F>(&self, default: T, f: F) -> Result<()>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce(&mut T) -> Result<()>,
    {
        // Acquire exclusive lock
        let _lock = FileLock::acquire(&self.path)?;

        let mut value = self.load()?.unwrap_or(default);

        f(&mut value)?;

        self.save(&value)?;

        Ok(())
    }

    /// Gets a temporary file path for atomic writes.
    fn temp_path(&self) -> Result<PathBuf> {
        let parent = self
            .path
            .parent()
            .ok_or_else(|| CodebinError::io("Path has no parent directory"))?;

        let file_name = self
            .path
            .file_name()
            .ok_or_else(|| CodebinError::io("Path has no file name"))?;

        let tmp_name = format!(".{}.tmp", file_name.to_string_lossy());
        Ok(parent.join(tmp_name))
    }
}

/// A file lock guard that automatically releases the lock when dropped.
struct FileLock {
    #[allow(dead_code)]
    file: File,
    lock_path: PathBuf,
}

impl FileLock {
    /// Acquires an exclusive lock on the given path.
    fn acquire(path: &Path) -> Result<Self> {
        let lock_path = path.with_extension("lock");

        // Ensure parent directory exists
        if let Some(parent) = lock_path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;

        #[cfg(unix)]
        {
            use fs2::FileExt;
            file.lock_exclusive()
                .map_err(|e| CodebinError::io(format!("Failed to acquire lock: {}", e)))?;
        }

        #[cfg(not(unix))]
        {
            // No file locking off Unix; acceptable for a single-user client
        }

        Ok(FileLock { file, lock_path })
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        // Unlock is automatic when the file handle is dropped
        let _ = fs::remove_file(&self.lock_path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Doc {
        name: String,
        count: u32,
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonStore::new(temp_dir.path().join("test.json"));

        let doc = Doc {
            name: "test".to_string(),
            count: 42,
        };
        store.save(&doc).unwrap();

        let loaded: Doc = store.load().unwrap().unwrap();
        assert_eq!(loaded, doc);
    }

    #[test]
    fn test_load_nonexistent_file() {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonStore::new(temp_dir.path().join("nonexistent.json"));

        let result: Option<Doc> = store.load().unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_update() {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonStore::new(temp_dir.path().join("counts.json"));

        let default: BTreeMap<String, u32> = BTreeMap::new();

        store
            .update(default.clone(), |map| {
                map.insert("a".to_string(), 1);
                Ok(())
            })
            .unwrap();

        store
            .update(default, |map| {
                let entry = map.entry("a".to_string()).or_insert(0);
                *entry += 5;
                Ok(())
            })
            .unwrap();

        let loaded: BTreeMap<String, u32> = store.load().unwrap().unwrap();
        assert_eq!(loaded.get("a"), Some(&6));
    }

    #[test]
    fn test_atomic_write_leaves_no_temp_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("test.json");
        let store = JsonStore::new(path.clone());

        store
            .save(&Doc {
                name: "test".to_string(),
                count: 42,
            })
            .unwrap();

        let tmp_path = temp_dir.path().join(".test.json.tmp");
        assert!(!tmp_path.exists());
        assert!(path.exists());
    }

    #[test]
    fn test_save_overwrites_cleanly() {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonStore::new(temp_dir.path().join("test.json"));

        store
            .save(&Doc {
                name: "first".to_string(),
                count: 1,
            })
            .unwrap();
        store
            .save(&Doc {
                name: "second".to_string(),
                count: 2,
            })
            .unwrap();

        let loaded: Doc = store.load().unwrap().unwrap();
        assert_eq!(loaded.name, "second");
    }
}
