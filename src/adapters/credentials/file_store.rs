//! File-Backed Credential Store
//!
//! A flat JSON object on disk, read on every `get` and rewritten on every
//! `set`. The store holds one key in practice and is never cached.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::ports::credentials::{CredentialError, CredentialStorePort};

/// Default store file name inside the data directory
pub const DEFAULT_STORE_FILE: &str = "credentials.json";

#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    /// Store backed by `<data_dir>/credentials.json`
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Self {
        Self {
            path: data_dir.as_ref().join(DEFAULT_STORE_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<HashMap<String, String>, CredentialError> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }
        let content = fs::read_to_string(&self.path)
            .map_err(|e| CredentialError::ReadError(e.to_string()))?;
        serde_json::from_str(&content).map_err(|e| CredentialError::ReadError(e.to_string()))
    }

    fn save(&self, entries: &HashMap<String, String>) -> Result<(), CredentialError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| CredentialError::WriteError(e.to_string()))?;
        }
        let content = serde_json::to_string_pretty(entries)
            .map_err(|e| CredentialError::WriteError(e.to_string()))?;
        fs::write(&self.path, content).map_err(|e| CredentialError::WriteError(e.to_string()))
    }
}

impl CredentialStorePort for FileCredentialStore {
    fn get(&self, key: &str) -> Result<Option<String>, CredentialError> {
        Ok(self.load()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: Option<&str>) -> Result<(), CredentialError> {
        let mut entries = self.load()?;
        match value {
            Some(v) => {
                entries.insert(key.to_string(), v.to_string());
            }
            None => {
                entries.remove(key);
            }
        }
        self.save(&entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::credentials::API_KEY_STORAGE_KEY;
    use tempfile::TempDir;

    #[test]
    fn test_get_on_missing_file_is_none() {
        let dir = TempDir::new().unwrap();
        let store = FileCredentialStore::new(dir.path());
        assert_eq!(store.get(API_KEY_STORAGE_KEY).unwrap(), None);
    }

    #[test]
    fn test_set_then_get_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = FileCredentialStore::new(dir.path());

        store.set(API_KEY_STORAGE_KEY, Some("secret-token")).unwrap();
        assert_eq!(
            store.get(API_KEY_STORAGE_KEY).unwrap(),
            Some("secret-token".to_string())
        );
    }

    #[test]
    fn test_set_none_removes_key() {
        let dir = TempDir::new().unwrap();
        let store = FileCredentialStore::new(dir.path());

        store.set(API_KEY_STORAGE_KEY, Some("secret-token")).unwrap();
        store.set(API_KEY_STORAGE_KEY, None).unwrap();
        assert_eq!(store.get(API_KEY_STORAGE_KEY).unwrap(), None);
    }

    #[test]
    fn test_values_survive_reopen() {
        let dir = TempDir::new().unwrap();
        {
            let store = FileCredentialStore::new(dir.path());
            store.set(API_KEY_STORAGE_KEY, Some("persisted")).unwrap();
        }
        let reopened = FileCredentialStore::new(dir.path());
        assert_eq!(
            reopened.get(API_KEY_STORAGE_KEY).unwrap(),
            Some("persisted".to_string())
        );
    }

    #[test]
    fn test_creates_data_dir_on_write() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("deep").join("data");
        let store = FileCredentialStore::new(&nested);
        store.set(API_KEY_STORAGE_KEY, Some("x")).unwrap();
        assert!(store.path().exists());
    }

    #[test]
    fn test_corrupted_file_is_read_error() {
        let dir = TempDir::new().unwrap();
        let store = FileCredentialStore::new(dir.path());
        fs::write(store.path(), "not json").unwrap();
        assert!(store.get(API_KEY_STORAGE_KEY).is_err());
    }
}
