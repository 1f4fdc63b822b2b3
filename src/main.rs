use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use hostlog::config::Config;
use hostlog::log::{LogStorage, Logger};
use hostlog::nats::{run_event_source, NatsClient};
use hostlog::routes::{router, AppState};
use hostlog::subscriber::Subscriber;

#[tokio::main]
async fn main() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("LOG_LEVEL").unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init();

    if let Err(e) = run().await {
        error!("hostlog failed: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> hostlog::Result<()> {
    let config = Config::from_env()?;

    let store = hostlog::state::open(&config).await?;
    info!("Using {} storage under key {}", config.storage, config.logs_key());

    let (logger, writer) = Logger::spawn(LogStorage::new(store, config.logs_key()));
    let subscriber = Arc::new(Subscriber::with_default_handlers(Arc::new(logger.clone()))?);

    // Held until shutdown so the event subscription stays open
    let _nats_client = match &config.nats_url {
        Some(nats_url) => {
            info!("Connecting to NATS at {}", nats_url);
            match NatsClient::connect(nats_url).await {
                Ok(client) => {
                    let events = client.subscribe_events().await?;
                    tokio::spawn(run_event_source(events, subscriber.clone()));
                    info!("Connected to NATS at {}", client.server_info());
                    Some(client)
                }
                Err(e) => {
                    warn!("Failed to connect to NATS: {}", e);
                    None
                }
            }
        }
        None => {
            info!("No NATS_URL configured - accepting events over HTTP only");
            None
        }
    };

    let app_state = AppState {
        logger: logger.clone(),
        subscriber,
        storage: config.storage,
        refresh: config.refresh,
    };
    let app = router(&config, app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Drain entries queued before shutdown
    if let Err(e) = logger.flush().await {
        warn!("Failed to flush pending log entries: {}", e);
    }
    writer.abort();
    info!("Shut down");
    Ok(())
}

async fn shutdown_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = match signal(SignalKind::terminate()) {
        Ok(s) => s,
        Err(e) => {
            warn!("Cannot listen for SIGTERM: {}", e);
            let _ = tokio::signal::ctrl_c().await;
            return;
        }
    };
    tokio::select! {
        _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
        _ = tokio::signal::ctrl_c() => info!("Received SIGINT, shutting down..."),
    }
}
