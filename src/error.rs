use thiserror::Error;

#[derive(Error, Debug)]
pub enum HostLogError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("NATS error: {0}")]
    Nats(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("A handler is already registered for {0}")]
    DuplicateHandler(String),

    #[error("Unknown event: {0}")]
    UnknownEvent(String),

    #[error("Logger is no longer running")]
    LoggerClosed,
}

pub type Result<T> = std::result::Result<T, HostLogError>;
