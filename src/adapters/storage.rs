use crate::core::KeyValueStore;
use crate::utils::error::{Result, ShopError};
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Stores each key as `<base_path>/<key>.json`.
///
/// Writes go to `<key>.json.tmp` first and are renamed into place, so an
/// interrupted write never leaves a truncated file behind.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: String,
}

impl LocalStorage {
    pub fn new(base_path: String) -> Self {
        Self { base_path }
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        Path::new(&self.base_path).join(format!("{}.json", key))
    }
}

impl KeyValueStore for LocalStorage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        let full_path = self.path_for(key);

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let tmp_path = full_path.with_extension("json.tmp");
        fs::write(&tmp_path, value)?;
        fs::rename(&tmp_path, &full_path)?;
        Ok(())
    }
}

/// In-process store. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    values: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(key: &str, value: &str) -> Self {
        let storage = Self::new();
        if let Ok(mut values) = storage.values.lock() {
            values.insert(key.to_string(), value.to_string());
        }
        storage
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.values.lock().ok()?.get(key).cloned()
    }
}

impl KeyValueStore for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let values = self.values.lock().map_err(|e| ShopError::StorageError {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(values.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        let mut values = self.values.lock().map_err(|e| ShopError::StorageError {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_local_storage_missing_key_reads_none() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path().to_str().unwrap().to_string());

        assert_eq!(storage.read("cart").unwrap(), None);
    }

    #[test]
    fn test_local_storage_creates_directories_on_write() {
        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path().join("nested").join("state");
        let storage = LocalStorage::new(base.to_str().unwrap().to_string());

        storage.write("cart", "[]").unwrap();
        storage.write("cart", "[1]").unwrap();

        assert!(base.join("cart.json").exists());
        assert_eq!(storage.read("cart").unwrap().as_deref(), Some("[1]"));
    }

    #[test]
    fn test_local_storage_replaces_file_without_leftovers() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path().to_str().unwrap().to_string());

        // A stale temp file from an interrupted run must not block the write.
        fs::write(temp_dir.path().join("cart.json.tmp"), "[{\"trunc").unwrap();

        storage.write("cart", "[1,2]").unwrap();
        storage.write("cart", "[]").unwrap();

        assert!(!temp_dir.path().join("cart.json.tmp").exists());
        assert_eq!(
            fs::read_to_string(temp_dir.path().join("cart.json")).unwrap(),
            "[]"
        );
        assert_eq!(storage.read("cart").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_memory_storage_clones_share_values() {
        let storage = MemoryStorage::new();
        let other = storage.clone();

        storage.write("cart", "[]").unwrap();
        assert_eq!(other.read("cart").unwrap().as_deref(), Some("[]"));
        assert_eq!(other.get("missing"), None);
    }
}
