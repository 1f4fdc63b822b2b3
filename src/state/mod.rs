//! Host key-value storage.
//!
//! The log list lives in a single slot of whichever backend is configured.
//! Values are JSON so every backend stores the same representation.

pub mod file;
pub mod memory;
pub mod redis;

use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::config::{Config, StorageBackend};
use crate::error::Result;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use self::redis::RedisStore;

#[async_trait]
pub trait KvStore: Send + Sync {
    /// Returns `None` when the key has never been written.
    async fn get(&self, key: &str) -> Result<Option<Value>>;

    async fn set(&self, key: &str, value: Value) -> Result<()>;
}

pub async fn get_json<T: DeserializeOwned>(store: &dyn KvStore, key: &str) -> Result<Option<T>> {
    match store.get(key).await? {
        Some(value) => Ok(Some(serde_json::from_value(value)?)),
        None => Ok(None),
    }
}

pub async fn set_json<T: Serialize + ?Sized>(
    store: &dyn KvStore,
    key: &str,
    value: &T,
) -> Result<()> {
    store.set(key, serde_json::to_value(value)?).await
}

/// Opens the backend selected by the configuration.
pub async fn open(config: &Config) -> Result<Arc<dyn KvStore>> {
    let store: Arc<dyn KvStore> = match config.storage {
        StorageBackend::Memory => Arc::new(MemoryStore::new()),
        StorageBackend::File => Arc::new(FileStore::new(config.storage_file_path())),
        StorageBackend::Redis => {
            let url = config.redis_url.as_deref().ok_or_else(|| {
                crate::error::HostLogError::Config("redis storage requires REDIS_URL".into())
            })?;
            tracing::info!("Connecting to Redis at {}", url);
            Arc::new(RedisStore::connect(url).await?)
        }
    };
    Ok(store)
}
