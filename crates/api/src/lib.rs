//! HTTP services for the stock-reservation system.
//!
//! Two axum applications share this crate: the inventory service (item
//! CRUD plus atomic stock adjustment) and the orders service (saga-backed
//! order placement). Both carry structured logging (tracing), Prometheus
//! metrics, and permissive CORS.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use inventory::InventoryStore;
use metrics_exporter_prometheus::PrometheusHandle;
use orders::OrderStore;
use saga::InventoryGateway;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use routes::items::InventoryState;
use routes::orders::OrdersState;

/// Creates the inventory service router with all routes and shared state.
pub fn inventory_app<S: InventoryStore + 'static>(
    state: Arc<InventoryState<S>>,
    metrics_handle: PrometheusHandle,
) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route("/items", post(routes::items::create::<S>))
        .route("/items", get(routes::items::list::<S>))
        .route("/items/{id}", get(routes::items::get::<S>))
        .route("/items/{id}/adjust", post(routes::items::adjust::<S>))
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

/// Creates the orders service router with all routes and shared state.
pub fn orders_app<G, O>(
    state: Arc<OrdersState<G, O>>,
    metrics_handle: PrometheusHandle,
) -> Router
where
    G: InventoryGateway + 'static,
    O: OrderStore + Clone + 'static,
{
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route("/orders", post(routes::orders::create::<G, O>))
        .route("/orders", get(routes::orders::list::<G, O>))
        .route("/orders/{id}", get(routes::orders::get::<G, O>))
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

/// Waits for a shutdown signal (SIGINT or SIGTERM).
pub async fn shutdown_signal() {
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
