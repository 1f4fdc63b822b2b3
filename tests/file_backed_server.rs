use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use tempfile::TempDir;
use tokio::time::sleep;

use hostlog::config::{Config, StorageBackend};
use hostlog::log::{LogStorage, Logger};
use hostlog::routes::{router, AppState};
use hostlog::subscriber::Subscriber;

async fn spawn_server(config: Config) -> Logger {
    let store = hostlog::state::open(&config).await.expect("open storage");
    let (logger, _writer) = Logger::spawn(LogStorage::new(store, config.logs_key()));
    let subscriber = Subscriber::with_default_handlers(Arc::new(logger.clone())).unwrap();
    let app_state = AppState {
        logger: logger.clone(),
        subscriber: Arc::new(subscriber),
        storage: config.storage,
        refresh: config.refresh,
    };
    let app = router(&config, app_state);
    let addr = SocketAddr::from(([127, 0, 0, 1], config.port));
    tokio::spawn(async move {
        let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
        axum::serve(listener, app.into_make_service()).await.unwrap();
    });
    sleep(Duration::from_millis(500)).await;
    logger
}

#[tokio::test]
async fn test_logs_persist_in_file_store() {
    let tmp = TempDir::new().expect("create temp dir");
    let config = Config {
        port: 38190,
        storage: StorageBackend::File,
        root: tmp.path().to_path_buf(),
        ..Config::default()
    };
    let logger = spawn_server(config.clone()).await;
    let client = Client::new();
    let base_url = format!("http://127.0.0.1:{}", config.port);

    let res = client
        .post(format!("{}/events/tabs.onReplaced", base_url))
        .json(&serde_json::json!({ "addedTabId": 12, "removedTabId": 11 }))
        .send()
        .await
        .expect("Failed to send event");
    assert_eq!(res.status(), reqwest::StatusCode::ACCEPTED);

    let body: serde_json::Value = client
        .get(format!("{}/logs", base_url))
        .send()
        .await
        .expect("Failed to send /logs request")
        .json()
        .await
        .expect("Failed to parse /logs response");
    assert_eq!(body["count"], 1);
    assert!(
        body["logs"][0].as_str().unwrap().ends_with("tabs.onReplaced - 11 -> 12")
    );

    // A fresh reader of the same file sees what the server wrote
    logger.flush().await.unwrap();
    let store = hostlog::state::open(&config).await.unwrap();
    let persisted = LogStorage::new(store, config.logs_key()).load().await.unwrap();
    assert_eq!(persisted.len(), 1);
    assert_eq!(persisted[0].message(), "tabs.onReplaced - 11 -> 12");

    let body: serde_json::Value = client
        .post(format!("{}/logs/clear", base_url))
        .send()
        .await
        .expect("Failed to send clear request")
        .json()
        .await
        .expect("Failed to parse clear response");
    assert_eq!(body["status"], "empty");
    assert!(config.storage_file_path().exists());
}
