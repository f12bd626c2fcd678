//! API server entry point.

use std::sync::Arc;

use api::config::Config;
use checkout::{DisabledNotificationRelay, HttpEmailRelay, NotificationRelay};
use order_store::{InMemoryOrderStore, OrderStore, PostgresOrderStore};
use tokio::signal;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Waits for a shutdown signal (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install SIGINT handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("received SIGINT, starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("received SIGTERM, starting graceful shutdown");
        }
    }
}

async fn open_order_store(config: &Config) -> Arc<dyn OrderStore> {
    match &config.database_url {
        Some(url) => {
            let store = PostgresOrderStore::connect(url)
                .await
                .expect("failed to connect to order database");
            store
                .run_migrations()
                .await
                .expect("failed to run order migrations");
            tracing::info!("using PostgreSQL order store");
            Arc::new(store)
        }
        None => {
            tracing::warn!("DATABASE_URL not set, orders are kept in memory only");
            Arc::new(InMemoryOrderStore::new())
        }
    }
}

fn notification_relay(config: &Config) -> Arc<dyn NotificationRelay> {
    match config.relay_config() {
        Some(relay_config) => {
            tracing::info!(url = %relay_config.url, "order notifications enabled");
            Arc::new(HttpEmailRelay::new(relay_config))
        }
        None => {
            tracing::warn!("ORDER_NOTIFY_URL not set, order notifications disabled");
            Arc::new(DisabledNotificationRelay)
        }
    }
}

#[tokio::main]
async fn main() {
    let config = Config::from_env();

    // 1. Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 2. Install Prometheus metrics recorder
    let prometheus_builder = metrics_exporter_prometheus::PrometheusBuilder::new();
    let metrics_handle = prometheus_builder
        .install_recorder()
        .expect("failed to install Prometheus recorder");

    // 3. Wire the order store, relay and application state
    let store = open_order_store(&config).await;
    let relay = notification_relay(&config);
    let state = api::create_state(store, relay, &config);

    // 4. Build the application
    let app = api::create_app(state, metrics_handle);

    // 5. Start server
    let addr = config.addr();
    tracing::info!(%addr, "starting API server");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind address");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");

    tracing::info!("server shut down gracefully");
}
