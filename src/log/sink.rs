use std::sync::Mutex;

/// Where event handlers send their formatted messages.
pub trait LogSink: Send + Sync {
    fn record(&self, message: String);
}

/// Keeps messages in memory, without timestamps.
#[derive(Debug, Default)]
pub struct MemorySink {
    messages: Mutex<Vec<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .map(|m| m.clone())
            .unwrap_or_default()
    }
}

impl LogSink for MemorySink {
    fn record(&self, message: String) {
        if let Ok(mut messages) = self.messages.lock() {
            messages.push(message);
        }
    }
}
