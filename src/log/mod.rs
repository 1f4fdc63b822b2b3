pub mod entry;
pub mod logger;
pub mod sink;
pub mod storage;

pub use entry::LogEntry;
pub use logger::Logger;
pub use sink::{LogSink, MemorySink};
pub use storage::LogStorage;
