//! HTTP server for the storefront.
//!
//! Exposes order submission and the manual order channel, with structured
//! logging (tracing) and Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use checkout::{ManualChannel, NotificationRelay, OrderPipeline, PipelineConfig};
use metrics_exporter_prometheus::PrometheusHandle;
use order_store::OrderStore;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use config::Config;
use routes::orders::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::render))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route("/orders", post(routes::orders::submit))
        .route("/orders/manual", post(routes::manual::format))
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates the application state around the given order store and relay.
pub fn create_state(
    store: Arc<dyn OrderStore>,
    relay: Arc<dyn NotificationRelay>,
    config: &Config,
) -> Arc<AppState> {
    let pipeline = OrderPipeline::new(
        store,
        relay,
        PipelineConfig {
            notify_recipient: config.notify_recipient.clone(),
            shipping: config.shipping_policy(),
        },
    );

    Arc::new(AppState {
        pipeline,
        manual_channel: ManualChannel::new(&config.manual_order_phone),
    })
}
