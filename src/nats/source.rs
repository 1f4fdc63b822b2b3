use std::sync::Arc;

use serde_json::Value;
use tokio_stream::{Stream, StreamExt};
use tracing::{info, warn};

use super::EVENTS_SUBJECT_PREFIX;
use crate::error::Result;
use crate::model::HostEvent;
use crate::subscriber::Subscriber;

pub fn event_subject(name: &str) -> String {
    format!("{}.{}", EVENTS_SUBJECT_PREFIX, name)
}

/// Event name carried by a subject, if it is under the events prefix.
pub fn event_name(subject: &str) -> Option<&str> {
    subject
        .strip_prefix(EVENTS_SUBJECT_PREFIX)?
        .strip_prefix('.')
        .filter(|name| !name.is_empty())
}

/// Parses one delivery. An empty body means an event without payload.
pub fn decode_event(subject: &str, payload: &[u8]) -> Result<Option<HostEvent>> {
    let Some(name) = event_name(subject) else {
        return Ok(None);
    };
    let payload = if payload.iter().all(u8::is_ascii_whitespace) {
        Value::Null
    } else {
        serde_json::from_slice(payload)?
    };
    HostEvent::from_parts(name, payload).map(Some)
}

/// Dispatches every delivered message until the stream ends. Undecodable
/// messages are dropped with a warning.
pub async fn run_event_source<S>(mut messages: S, subscriber: Arc<Subscriber>)
where
    S: Stream<Item = async_nats::Message> + Unpin,
{
    info!("Listening for host events on {}.>", EVENTS_SUBJECT_PREFIX);
    while let Some(message) = messages.next().await {
        let subject = message.subject.as_str();
        match decode_event(subject, &message.payload) {
            Ok(Some(event)) => subscriber.dispatch(&event),
            Ok(None) => warn!("Ignoring message on unexpected subject {}", subject),
            Err(e) => warn!("Dropping event from {}: {}", subject, e),
        }
    }
    info!("Host event stream closed");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subject_round_trip() {
        let subject = event_subject("tabs.onCreated");
        assert_eq!(subject, "host.events.tabs.onCreated");
        assert_eq!(event_name(&subject), Some("tabs.onCreated"));
    }

    #[test]
    fn test_foreign_subjects_have_no_name() {
        assert_eq!(event_name("host.eventsx.tabs.onCreated"), None);
        assert_eq!(event_name("host.events."), None);
        assert_eq!(event_name("plan.session.1.log"), None);
    }

    #[test]
    fn test_decode_payload() {
        let event = decode_event("host.events.tabs.onCreated", br#"{"tab":{"id":7}}"#)
            .unwrap()
            .unwrap();
        assert_eq!(event.name(), "tabs.onCreated");

        let event = decode_event("host.events.runtime.onStartup", b"").unwrap().unwrap();
        assert_eq!(event, HostEvent::RuntimeStartup);
    }

    #[test]
    fn test_decode_rejects_bad_input() {
        assert!(
            decode_event("host.events.tabs.onCreated", b"{not json").is_err()
        );
        assert!(decode_event("host.events.tabs.onExploded", b"{}").is_err());
        assert!(decode_event("other.subject", b"{}").unwrap().is_none());
    }
}
