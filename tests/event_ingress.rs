use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::json;
use tokio_test::assert_ok;
use tower::ServiceExt;

use hostlog::config::{Config, StorageBackend};
use hostlog::log::{LogStorage, Logger};
use hostlog::routes::{router, AppState};
use hostlog::state::MemoryStore;
use hostlog::subscriber::Subscriber;

fn create_test_app(config: &Config) -> (Router, Logger) {
    let storage = LogStorage::new(Arc::new(MemoryStore::new()), config.logs_key());
    let (logger, _writer) = Logger::spawn(storage);
    let subscriber = Subscriber::with_default_handlers(Arc::new(logger.clone())).unwrap();
    let app_state = AppState {
        logger: logger.clone(),
        subscriber: Arc::new(subscriber),
        storage: StorageBackend::Memory,
        refresh: Duration::from_secs(1),
    };
    (router(config, app_state), logger)
}

async fn post_event(app: &Router, uri: &str, body: &str) -> StatusCode {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.clone().oneshot(request).await.unwrap().status()
}

async fn messages(logger: &Logger) -> Vec<String> {
    let logs = assert_ok!(logger.read().await);
    logs.iter().map(|e| e.message().to_string()).collect()
}

#[tokio::test]
async fn test_events_are_logged_in_order() {
    let (app, logger) = create_test_app(&Config::default());

    let status = post_event(&app, "/events/runtime.onInstalled", r#"{"reason":"install"}"#).await;
    assert_eq!(status, StatusCode::ACCEPTED);
    let status = post_event(&app, "/events/tabs.onCreated", r#"{"tab":{"id":7}}"#).await;
    assert_eq!(status, StatusCode::ACCEPTED);
    let status = post_event(&app, "/events/runtime.onStartup", "").await;
    assert_eq!(status, StatusCode::ACCEPTED);

    assert_eq!(
        messages(&logger).await,
        vec!["runtime.onInstalled - install", "tabs.onCreated - tabId: 7", "runtime.onStartup"]
    );
}

#[tokio::test]
async fn test_message_with_embedded_text_logs_twice() {
    let (app, logger) = create_test_app(&Config::default());
    let body = json!({ "message": { "logData": "button clicked" }, "sender": { "id": "abc" } });

    let status = post_event(&app, "/events/runtime.onMessage", &body.to_string()).await;
    assert_eq!(status, StatusCode::ACCEPTED);

    let logged = messages(&logger).await;
    assert_eq!(logged.len(), 2);
    assert!(logged[0].starts_with("runtime.onMessage - "));
    assert_eq!(logged[1], "button clicked");
}

#[tokio::test]
async fn test_unknown_event_is_not_found() {
    let (app, logger) = create_test_app(&Config::default());
    let status = post_event(&app, "/events/tabs.onExploded", "{}").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(messages(&logger).await.is_empty());
}

#[tokio::test]
async fn test_unparseable_body_is_rejected() {
    let (app, logger) = create_test_app(&Config::default());
    let status = post_event(&app, "/events/tabs.onCreated", "{oops").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(messages(&logger).await.is_empty());
}

#[tokio::test]
async fn test_wrongly_typed_payload_is_logged_garbled() {
    let (app, logger) = create_test_app(&Config::default());

    let status = post_event(&app, "/events/tabs.onCreated", r#"{"tab":{"id":"seven"}}"#).await;
    assert_eq!(status, StatusCode::ACCEPTED);
    let status = post_event(&app, "/events/tabs.onActivated", r#"{"tabId":"seven"}"#).await;
    assert_eq!(status, StatusCode::ACCEPTED);
    let status = post_event(&app, "/events/runtime.onInstalled", r#""install""#).await;
    assert_eq!(status, StatusCode::ACCEPTED);

    assert_eq!(
        messages(&logger).await,
        vec![
            "tabs.onCreated - tabId: seven",
            "tabs.onActivated - window: undefined - tab: seven",
            "runtime.onInstalled - undefined"
        ]
    );
}

#[tokio::test]
async fn test_missing_fields_are_logged_as_undefined() {
    let (app, logger) = create_test_app(&Config::default());
    let status = post_event(&app, "/events/tabs.onRemoved", r#"{"tabId":3}"#).await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(
        messages(&logger).await,
        vec!["tabs.onRemoved - tabId: 3 - windowId: undefined"]
    );
}

#[tokio::test]
async fn test_prefixed_routes() {
    let config = Config {
        prefix: "/ext".into(),
        ..Config::default()
    };
    let (app, logger) = create_test_app(&config);

    assert_eq!(
        post_event(&app, "/events/runtime.onSuspend", "").await,
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        post_event(&app, "/ext/events/runtime.onSuspend", "").await,
        StatusCode::ACCEPTED
    );
    assert_eq!(messages(&logger).await, vec!["runtime.onSuspend"]);
}
