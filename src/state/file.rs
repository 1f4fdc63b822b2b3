use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;

use super::KvStore;
use crate::error::Result;

/// All keys live in one JSON object file, rewritten on every `set`.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    // Guards read-modify-write of the whole file
    write_lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<HashMap<String, Value>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(data) if data.trim().is_empty() => Ok(HashMap::new()),
            Ok(data) => Ok(serde_json::from_str(&data)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl KvStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        let mut slots = self.load().await?;
        Ok(slots.remove(key))
    }

    async fn set(&self, key: &str, value: Value) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut slots = self.load().await?;
        slots.insert(key.to_string(), value);

        if let Some(dir) = self.path.parent() {
            tokio::fs::create_dir_all(dir).await?;
        }
        // Write then rename so a crash never leaves a truncated file
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, serde_json::to_vec_pretty(&slots)?).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_file_reads_as_absent() {
        let tmp = TempDir::new().expect("create temp dir");
        let store = FileStore::new(tmp.path().join("state").join("storage.json"));
        assert!(store.get("logs").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_values_survive_reopen() {
        let tmp = TempDir::new().expect("create temp dir");
        let path = tmp.path().join("state").join("storage.json");

        let store = FileStore::new(&path);
        store.set("logs", json!(["first"])).await.unwrap();
        store.set("other", json!(42)).await.unwrap();
        drop(store);

        let reopened = FileStore::new(&path);
        assert_eq!(reopened.path(), path.as_path());
        assert_eq!(reopened.get("logs").await.unwrap(), Some(json!(["first"])));
        assert_eq!(reopened.get("other").await.unwrap(), Some(json!(42)));
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() {
        let tmp = TempDir::new().expect("create temp dir");
        let path = tmp.path().join("storage.json");
        std::fs::write(&path, "not json").unwrap();

        let store = FileStore::new(&path);
        assert!(store.get("logs").await.is_err());
    }
}
