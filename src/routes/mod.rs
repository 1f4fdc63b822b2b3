pub mod events;
pub mod health;
pub mod logs;
pub mod viewer;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    routing::{get, post},
    Router,
};

use crate::config::{Config, StorageBackend};
use crate::log::Logger;
use crate::subscriber::Subscriber;

#[derive(Clone)]
pub struct AppState {
    pub logger: Logger,
    pub subscriber: Arc<Subscriber>,
    pub storage: StorageBackend,
    /// Poll interval of the viewer page.
    pub refresh: Duration,
}

pub fn router(config: &Config, state: AppState) -> Router {
    Router::new()
        .route(&config.route("/"), get(viewer::index))
        .route(&config.route("/logs"), get(logs::get_logs))
        .route(&config.route("/logs/clear"), post(logs::clear_logs))
        .route(&config.route("/events/:name"), post(events::post_event))
        .route(&config.route("/health"), get(health::health_check))
        .route(&config.route("/ready"), get(health::readiness_check))
        .with_state(state)
}
