use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

const SEPARATOR: &str = " - ";

/// One log line: `<ISO-8601 timestamp> - <message>`.
///
/// Timestamp and message are stored as a single string, matching what the
/// viewer renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogEntry(String);

impl LogEntry {
    pub fn new(message: &str) -> Self {
        Self::at(Utc::now(), message)
    }

    pub fn at(timestamp: DateTime<Utc>, message: &str) -> Self {
        Self(format!(
            "{}{}{}",
            timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
            SEPARATOR,
            message
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parses the leading timestamp; `None` if the line was not written by us.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        let (ts, _) = self.0.split_once(SEPARATOR)?;
        DateTime::parse_from_rfc3339(ts)
            .ok()
            .map(|t| t.with_timezone(&Utc))
    }

    pub fn message(&self) -> &str {
        match self.0.split_once(SEPARATOR) {
            Some((_, message)) => message,
            None => &self.0,
        }
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_entry_format() {
        let ts = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let entry = LogEntry::at(ts, "runtime.onStartup");
        assert_eq!(
            entry.as_str(),
            "2024-05-01T12:00:00.000Z - runtime.onStartup"
        );
        assert_eq!(entry.timestamp(), Some(ts));
        assert_eq!(entry.message(), "runtime.onStartup");
    }

    #[test]
    fn test_message_keeps_inner_separators() {
        let entry = LogEntry::new("tabs.onActivated - window: 1 - tab: 2");
        assert_eq!(entry.message(), "tabs.onActivated - window: 1 - tab: 2");
        assert!(entry.timestamp().is_some());
    }

    #[test]
    fn test_foreign_line_has_no_timestamp() {
        let entry: LogEntry = serde_json::from_str("\"hand written\"").unwrap();
        assert!(entry.timestamp().is_none());
        assert_eq!(entry.message(), "hand written");
    }
}
