use std::time::Duration;

use async_nats::{Client, ConnectOptions};
use serde_json::Value;

use super::event_subject;
use crate::error::{HostLogError, Result};

pub struct NatsClient {
    client: Client,
    server_url: String,
}

impl NatsClient {
    pub async fn connect(server_url: &str) -> Result<Self> {
        let connect_options = ConnectOptions::new()
            .retry_on_initial_connect()
            .max_reconnects(5)
            .reconnect_delay_callback(|attempts| {
                // exponential backoff: 1000ms * 2^attempts, capped at 8000ms
                let exp = 2u64.saturating_pow(attempts as u32);
                let delay_ms = std::cmp::min(1000u64.saturating_mul(exp), 8000u64);
                Duration::from_millis(delay_ms)
            });

        let client = async_nats::connect_with_options(server_url, connect_options)
            .await
            .map_err(|e| HostLogError::Nats(e.to_string()))?;

        Ok(Self {
            client,
            server_url: server_url.to_string(),
        })
    }

    /// Subscribes to every host event subject.
    pub async fn subscribe_events(&self) -> Result<async_nats::Subscriber> {
        self.client
            .subscribe(format!("{}.>", super::EVENTS_SUBJECT_PREFIX))
            .await
            .map_err(|e| HostLogError::Nats(e.to_string()))
    }

    /// Publishes an event the way a host would.
    pub async fn publish_event(&self, name: &str, payload: &Value) -> Result<()> {
        let bytes = serde_json::to_vec(payload)?;
        self.client
            .publish(event_subject(name), bytes.into())
            .await
            .map_err(|e| HostLogError::Nats(e.to_string()))?;
        self.client
            .flush()
            .await
            .map_err(|e| HostLogError::Nats(e.to_string()))
    }

    pub fn server_info(&self) -> &str {
        &self.server_url
    }
}
