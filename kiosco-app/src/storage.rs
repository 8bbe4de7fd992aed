//! Durable key/value storage
//!
//! The terminal rendition of the browser's local storage: one JSON file
//! holding string keys and string values, written synchronously on every
//! mutation. Concurrent processes race with last-write-wins semantics,
//! same as multiple tabs on one origin.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Bearer token of the active session.
pub const KEY_TOKEN: &str = "token";
/// Identifier claim of the logged-in user.
pub const KEY_USER_ID: &str = "usuario_id";
/// Serialized cart contents.
pub const KEY_CART: &str = "carrito";
/// Screen to return to after a forced login.
pub const KEY_RETURN_TO: &str = "urlRegreso";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// File-backed string key/value store.
pub struct LocalStore {
    file_path: PathBuf,
    data: HashMap<String, String>,
}

impl LocalStore {
    /// Open (or create) the store under `data_dir`.
    pub fn open(data_dir: &Path) -> Result<Self, StorageError> {
        std::fs::create_dir_all(data_dir)?;
        let file_path = data_dir.join("storage.json");

        let data = if file_path.exists() {
            let content = std::fs::read_to_string(&file_path)?;
            serde_json::from_str(&content).unwrap_or_default()
        } else {
            HashMap::new()
        };

        Ok(Self { file_path, data })
    }

    fn save(&self) -> Result<(), StorageError> {
        let content = serde_json::to_string_pretty(&self.data)?;
        std::fs::write(&self.file_path, content)?;
        Ok(())
    }

    /// Read a value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.data.get(key).map(String::as_str)
    }

    /// Write a value and persist immediately.
    pub fn set(&mut self, key: &str, value: impl Into<String>) -> Result<(), StorageError> {
        self.data.insert(key.to_string(), value.into());
        self.save()
    }

    /// Remove a key and persist immediately. Removing an absent key is a no-op.
    pub fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        if self.data.remove(key).is_some() {
            self.save()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn values_survive_reopen() {
        let dir = TempDir::new().unwrap();
        {
            let mut store = LocalStore::open(dir.path()).unwrap();
            store.set(KEY_TOKEN, "abc").unwrap();
            store.set(KEY_CART, "[]").unwrap();
        }
        let store = LocalStore::open(dir.path()).unwrap();
        assert_eq!(store.get(KEY_TOKEN), Some("abc"));
        assert_eq!(store.get(KEY_CART), Some("[]"));
    }

    #[test]
    fn remove_persists() {
        let dir = TempDir::new().unwrap();
        let mut store = LocalStore::open(dir.path()).unwrap();
        store.set(KEY_TOKEN, "abc").unwrap();
        store.remove(KEY_TOKEN).unwrap();
        store.remove("no-such-key").unwrap();

        let reopened = LocalStore::open(dir.path()).unwrap();
        assert_eq!(reopened.get(KEY_TOKEN), None);
    }

    #[test]
    fn corrupt_file_starts_empty() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("storage.json"), "not json").unwrap();
        let store = LocalStore::open(dir.path()).unwrap();
        assert_eq!(store.get(KEY_TOKEN), None);
    }
}
