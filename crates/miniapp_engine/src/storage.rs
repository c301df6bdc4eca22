use std::collections::BTreeMap;
use std::io;
use std::sync::Mutex;

use miniapp_core::Credential;
use thiserror::Error;

/// Local-storage key holding the bearer token.
pub const CREDENTIAL_KEY: &str = "miniapp_token";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage directory missing or not writable: {0}")]
    StorageDir(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("corrupt storage file: {0}")]
    Corrupt(String),
    #[error("could not encode storage: {0}")]
    Encode(String),
    #[error("storage lock poisoned")]
    Poisoned,
}

/// Durable string key/value slots, like a browser's local storage.
pub trait LocalStorage: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Reads the cached credential; an empty stored value counts as absent.
pub fn load_credential(storage: &dyn LocalStorage) -> Result<Option<Credential>, StorageError> {
    Ok(storage.get_item(CREDENTIAL_KEY)?.and_then(Credential::new))
}

pub fn save_credential(
    storage: &dyn LocalStorage,
    credential: &Credential,
) -> Result<(), StorageError> {
    storage.set_item(CREDENTIAL_KEY, credential.as_str())
}

/// In-memory storage; contents vanish with the process.
#[derive(Debug, Default)]
pub struct MemoryLocalStorage {
    items: Mutex<BTreeMap<String, String>>,
}

impl MemoryLocalStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_item(key: &str, value: &str) -> Self {
        let storage = Self::default();
        if let Ok(mut items) = storage.items.lock() {
            items.insert(key.to_string(), value.to_string());
        }
        storage
    }
}

impl LocalStorage for MemoryLocalStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let items = self.items.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut items = self.items.lock().map_err(|_| StorageError::Poisoned)?;
        items.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
