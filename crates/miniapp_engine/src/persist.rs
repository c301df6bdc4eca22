use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use miniapp_logging::miniapp_debug;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::storage::{LocalStorage, StorageError};

pub const STORAGE_FILENAME: &str = "local_storage.ron";

/// Ensure the storage directory exists; create if missing.
pub fn ensure_storage_dir(dir: &Path) -> Result<(), StorageError> {
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| StorageError::StorageDir(e.to_string()))?;
        if !meta.is_dir() {
            return Err(StorageError::StorageDir("path is not a directory".into()));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| StorageError::StorageDir(e.to_string()))?;
    }
    Ok(())
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredItems {
    items: BTreeMap<String, String>,
}

/// Local storage backed by a RON file, rewritten atomically on every change.
///
/// The file is read on every `get_item` so that a fresh instance sees what a
/// previous run wrote.
#[derive(Debug)]
pub struct FileLocalStorage {
    dir: PathBuf,
    write_lock: Mutex<()>,
}

impl FileLocalStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(STORAGE_FILENAME)
    }

    fn read_items(&self) -> Result<StoredItems, StorageError> {
        let path = self.path();
        let content = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Ok(StoredItems::default());
            }
            Err(err) => return Err(err.into()),
        };
        ron::from_str(&content).map_err(|err| StorageError::Corrupt(err.to_string()))
    }

    fn write_items(&self, stored: &StoredItems) -> Result<(), StorageError> {
        ensure_storage_dir(&self.dir)?;
        let pretty = ron::ser::PrettyConfig::new();
        let content = ron::ser::to_string_pretty(stored, pretty)
            .map_err(|err| StorageError::Encode(err.to_string()))?;

        let target = self.path();
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;
        tmp.persist(&target).map_err(|e| StorageError::Io(e.error))?;
        miniapp_debug!("Wrote {} storage item(s) to {:?}", stored.items.len(), target);
        Ok(())
    }
}

impl LocalStorage for FileLocalStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read_items()?.items.remove(key))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().map_err(|_| StorageError::Poisoned)?;
        let mut stored = self.read_items()?;
        stored.items.insert(key.to_string(), value.to_string());
        self.write_items(&stored)
    }
}
