use std::sync::Arc;

use async_trait::async_trait;
use redis::AsyncCommands;
use serde_json::Value;
use tokio::sync::Mutex;

use super::KvStore;
use crate::error::Result;

pub type RedisClient = Arc<Mutex<redis::aio::MultiplexedConnection>>;

pub async fn connect(redis_url: &str) -> redis::RedisResult<RedisClient> {
    let client = redis::Client::open(redis_url)?;
    let conn = client.get_multiplexed_async_connection().await?;
    Ok(Arc::new(Mutex::new(conn)))
}

/// Each key holds its JSON value as a Redis string.
#[derive(Clone)]
pub struct RedisStore {
    client: RedisClient,
}

impl RedisStore {
    pub fn new(client: RedisClient) -> Self {
        Self { client }
    }

    pub async fn connect(redis_url: &str) -> Result<Self> {
        Ok(Self::new(connect(redis_url).await?))
    }
}

#[async_trait]
impl KvStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        let data: Option<String> = self.client.lock().await.get(key).await?;
        match data {
            Some(s) => Ok(Some(serde_json::from_str(&s)?)),
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: Value) -> Result<()> {
        let json = serde_json::to_string(&value)?;
        let _: () = self.client.lock().await.set(key, json).await?;
        Ok(())
    }
}
