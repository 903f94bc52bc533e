//! File-backed key-value storage
//!
//! One `<key>.json` document per key inside the data directory. Writes go
//! through a temporary file and a rename while holding an exclusive advisory
//! lock on `<key>.lock`, so a concurrent `rp` process never reads a torn
//! document.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use fs2::FileExt;

use crate::domain::result::{Error, Result};
use crate::ports::KeyValueStore;

/// Key-value storage in a directory of JSON files
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open (and create if needed) a store rooted at `dir`
    pub fn new(dir: &Path) -> Result<Self> {
        fs::create_dir_all(dir)?;
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the document for `key`
    pub fn document_path(&self, key: &str) -> Result<PathBuf> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{}.json", key)))
    }

    fn lock_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.lock", key))
    }

    fn open_lock(&self, key: &str) -> Result<File> {
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(self.lock_path(key))?;
        Ok(file)
    }

    fn read_blocking(&self, key: &str) -> Result<Option<String>> {
        let path = self.document_path(key)?;
        if !path.exists() {
            return Ok(None);
        }

        let lock = self.open_lock(key)?;
        FileExt::lock_shared(&lock)?;
        let content = fs::read_to_string(&path);
        FileExt::unlock(&lock)?;

        Ok(Some(content?))
    }

    fn write_blocking(&self, key: &str, value: &str) -> Result<()> {
        let path = self.document_path(key)?;
        let tmp_path = self.dir.join(format!("{}.json.tmp", key));

        let lock = self.open_lock(key)?;
        FileExt::lock_exclusive(&lock)?;

        let result = (|| -> Result<()> {
            let mut tmp = File::create(&tmp_path)?;
            tmp.write_all(value.as_bytes())?;
            tmp.sync_all()?;
            fs::rename(&tmp_path, &path)?;
            Ok(())
        })();

        FileExt::unlock(&lock)?;
        result
    }

    fn remove_blocking(&self, key: &str) -> Result<()> {
        let path = self.document_path(key)?;
        let lock = self.open_lock(key)?;
        FileExt::lock_exclusive(&lock)?;
        let result = match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        };
        FileExt::unlock(&lock)?;
        result
    }
}

/// Keys become file names, so only a conservative alphabet is accepted
fn validate_key(key: &str) -> Result<()> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(Error::storage(format!("Invalid storage key: {:?}", key)))
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get_item(&self, key: &str) -> Result<Option<String>> {
        let store = self.clone();
        let key = key.to_string();
        tokio::task::spawn_blocking(move || store.read_blocking(&key))
            .await
            .map_err(|e| Error::storage(format!("Storage task failed: {}", e)))?
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let store = self.clone();
        let key = key.to_string();
        let value = value.to_string();
        tokio::task::spawn_blocking(move || store.write_blocking(&key, &value))
            .await
            .map_err(|e| Error::storage(format!("Storage task failed: {}", e)))?
    }

    async fn remove_item(&self, key: &str) -> Result<()> {
        let store = self.clone();
        let key = key.to_string();
        tokio::task::spawn_blocking(move || store.remove_blocking(&key))
            .await
            .map_err(|e| Error::storage(format!("Storage task failed: {}", e)))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_missing_key_reads_none() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path()).unwrap();
        assert_eq!(store.get_item("users").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_write_then_read() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path()).unwrap();

        store.set_item("users", "[]").await.unwrap();
        store.set_item("users", "[{\"id\":1}]").await.unwrap();

        assert_eq!(
            store.get_item("users").await.unwrap().as_deref(),
            Some("[{\"id\":1}]")
        );
        assert!(dir.path().join("users.json").exists());
        assert!(!dir.path().join("users.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_remove_is_idempotent() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path()).unwrap();

        store.set_item("auth-storage", "{}").await.unwrap();
        store.remove_item("auth-storage").await.unwrap();
        store.remove_item("auth-storage").await.unwrap();
        assert_eq!(store.get_item("auth-storage").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_rejects_path_like_keys() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path()).unwrap();
        assert!(store.set_item("../escape", "{}").await.is_err());
        assert!(store.get_item("").await.is_err());
    }
}
