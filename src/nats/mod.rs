//! Host events delivered over NATS.
//!
//! Each event arrives on `host.events.<event name>` with its bare payload as
//! JSON, e.g. `host.events.tabs.onCreated` carrying `{"tab": {"id": 7}}`.

pub mod client;
pub mod source;

pub use client::NatsClient;
pub use source::{event_name, event_subject, run_event_source};

pub const EVENTS_SUBJECT_PREFIX: &str = "host.events";
