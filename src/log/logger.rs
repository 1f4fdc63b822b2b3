use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

use crate::error::{HostLogError, Result};
use crate::log::{LogEntry, LogSink, LogStorage};

enum Command {
    Record {
        entry: LogEntry,
        ack: Option<oneshot::Sender<Result<()>>>,
    },
    Read(oneshot::Sender<Result<Vec<LogEntry>>>),
    Clear(oneshot::Sender<Result<()>>),
    Flush(oneshot::Sender<()>),
}

/// Handle to the log writer task.
///
/// Every operation is queued and the writer applies them strictly in
/// submission order, so concurrent `record` calls never overwrite each
/// other and a read always observes every earlier record.
#[derive(Clone)]
pub struct Logger {
    tx: mpsc::UnboundedSender<Command>,
}

impl Logger {
    /// Starts the writer. It stops once every `Logger` clone is dropped.
    pub fn spawn(storage: LogStorage) -> (Self, JoinHandle<()>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = tokio::spawn(run_writer(storage, rx));
        (Self { tx }, handle)
    }

    /// Timestamps `message` now and queues it. Fire-and-forget.
    pub fn record(&self, message: impl AsRef<str>) {
        let entry = LogEntry::new(message.as_ref());
        if let Err(e) = self.tx.send(Command::Record { entry, ack: None }) {
            if let Command::Record { entry, .. } = e.0 {
                warn!("Logger stopped, dropping entry: {}", entry);
            }
        }
    }

    /// Like [`record`](Self::record) but waits until the entry is stored.
    pub async fn record_persisted(&self, message: impl AsRef<str>) -> Result<LogEntry> {
        let entry = LogEntry::new(message.as_ref());
        let stored = entry.clone();
        self.request(|ack| Command::Record {
            entry,
            ack: Some(ack),
        })
        .await??;
        Ok(stored)
    }

    pub async fn read(&self) -> Result<Vec<LogEntry>> {
        self.request(Command::Read).await?
    }

    pub async fn clear(&self) -> Result<()> {
        self.request(Command::Clear).await?
    }

    /// Resolves once every command queued before it has been applied.
    pub async fn flush(&self) -> Result<()> {
        self.request(Command::Flush).await
    }

    async fn request<T>(&self, command: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (ack, done) = oneshot::channel();
        self.tx
            .send(command(ack))
            .map_err(|_| HostLogError::LoggerClosed)?;
        done.await.map_err(|_| HostLogError::LoggerClosed)
    }
}

impl LogSink for Logger {
    fn record(&self, message: String) {
        Logger::record(self, message);
    }
}

async fn run_writer(storage: LogStorage, mut rx: mpsc::UnboundedReceiver<Command>) {
    debug!("Log writer started for key {}", storage.key());
    while let Some(command) = rx.recv().await {
        match command {
            Command::Record { entry, ack } => {
                let result = storage.append(entry).await;
                if let Err(e) = &result {
                    error!("Failed to store log entry: {}", e);
                }
                if let Some(ack) = ack {
                    let _ = ack.send(result);
                }
            }
            Command::Read(reply) => {
                let _ = reply.send(storage.load().await);
            }
            Command::Clear(ack) => {
                let result = storage.clear().await;
                if let Err(e) = &result {
                    error!("Failed to clear logs: {}", e);
                }
                let _ = ack.send(result);
            }
            Command::Flush(ack) => {
                let _ = ack.send(());
            }
        }
    }
    debug!("Log writer stopped");
}
