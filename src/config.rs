use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use sha2::{Digest, Sha256};

use crate::error::{HostLogError, Result};

/// Key holding the log list when no prefix namespaces it.
pub const LOGS_KEY: &str = "logs";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Memory,
    File,
    Redis,
}

impl FromStr for StorageBackend {
    type Err = HostLogError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "memory" => Ok(StorageBackend::Memory),
            "file" => Ok(StorageBackend::File),
            "redis" => Ok(StorageBackend::Redis),
            other => Err(HostLogError::Config(format!("unknown storage backend '{}'", other))),
        }
    }
}

impl std::fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackend::Memory => write!(f, "memory"),
            StorageBackend::File => write!(f, "file"),
            StorageBackend::Redis => write!(f, "redis"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub storage: StorageBackend,
    pub root: PathBuf,
    pub redis_url: Option<String>,
    pub nats_url: Option<String>,
    /// Route prefix without a trailing slash.
    pub prefix: String,
    pub refresh: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 3030,
            storage: StorageBackend::Memory,
            root: PathBuf::from("/var/lib/hostlog"),
            redis_url: None,
            nats_url: None,
            prefix: String::new(),
            refresh: Duration::from_secs(1),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let defaults = Config::default();

        let port = match non_empty("PORT") {
            Some(p) => p
                .parse()
                .map_err(|_| HostLogError::Config(format!("invalid PORT '{}'", p)))?,
            None => defaults.port,
        };
        let storage = match non_empty("HOSTLOG_STORAGE") {
            Some(s) => s.parse()?,
            None => defaults.storage,
        };
        let refresh = match non_empty("HOSTLOG_REFRESH") {
            Some(r) => humantime::parse_duration(&r).map_err(|e| {
                HostLogError::Config(format!("invalid HOSTLOG_REFRESH '{}': {}", r, e))
            })?,
            None => defaults.refresh,
        };
        let redis_url = non_empty("REDIS_URL");
        if storage == StorageBackend::Redis && redis_url.is_none() {
            return Err(HostLogError::Config("redis storage requires REDIS_URL".into()));
        }

        Ok(Self {
            port,
            storage,
            root: non_empty("HOSTLOG_ROOT").map(PathBuf::from).unwrap_or(defaults.root),
            redis_url,
            nats_url: non_empty("NATS_URL"),
            prefix: non_empty("HOSTLOG_PREFIX")
                .map(|p| p.trim_end_matches('/').to_string())
                .unwrap_or_default(),
            refresh,
        })
    }

    /// Path of the JSON file backing the `file` storage backend.
    pub fn storage_file_path(&self) -> PathBuf {
        self.root.join("state").join("storage.json")
    }

    /// Storage key of the log list, namespaced by the hashed prefix.
    pub fn logs_key(&self) -> String {
        if self.prefix.is_empty() {
            LOGS_KEY.to_string()
        } else {
            let mut hasher = Sha256::new();
            hasher.update(self.prefix.as_bytes());
            format!("{}:{}", hex::encode(hasher.finalize()), LOGS_KEY)
        }
    }

    /// Prepends the configured prefix to a route path.
    pub fn route(&self, path: &str) -> String {
        if self.prefix.is_empty() {
            path.to_string()
        } else {
            format!("{}/{}", self.prefix, path.trim_start_matches('/'))
        }
    }
}

fn non_empty(var: &str) -> Option<String> {
    env::var(var).ok().filter(|v| !v.is_empty())
}
