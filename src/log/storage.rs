use std::sync::Arc;

use crate::error::Result;
use crate::log::LogEntry;
use crate::state::{get_json, set_json, KvStore};

/// The persisted log list under one storage key.
///
/// `append` is a plain read-modify-write. Two overlapping appends can both
/// read the same list and the later write wins, so callers go through
/// [`Logger`](crate::log::Logger), which runs them one at a time.
#[derive(Clone)]
pub struct LogStorage {
    store: Arc<dyn KvStore>,
    key: String,
}

impl LogStorage {
    pub fn new(store: Arc<dyn KvStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Current list; an absent key reads as empty.
    pub async fn load(&self) -> Result<Vec<LogEntry>> {
        Ok(get_json(self.store.as_ref(), &self.key).await?.unwrap_or_default())
    }

    pub async fn append(&self, entry: LogEntry) -> Result<()> {
        let mut logs = self.load().await?;
        logs.push(entry);
        set_json(self.store.as_ref(), &self.key, &logs).await
    }

    pub async fn clear(&self) -> Result<()> {
        set_json(self.store.as_ref(), &self.key, &Vec::<LogEntry>::new()).await
    }
}
