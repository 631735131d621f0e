//! Orders service entry point.

use std::sync::Arc;

use api::config::OrdersConfig;
use api::routes::orders::OrdersState;
use metrics_exporter_prometheus::PrometheusHandle;
use orders::{InMemoryOrders, OrderStore, PgOrders};
use saga::{HttpInventoryGateway, SagaOrchestrator};
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() {
    let config = OrdersConfig::from_env();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_level.clone())),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let metrics_handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .expect("failed to install Prometheus recorder");

    let gateway = HttpInventoryGateway::new(config.inventory_url.clone())
        .expect("failed to build inventory client");

    match config.database_url.clone() {
        Some(url) => {
            let pool = PgPoolOptions::new()
                .max_connections(5)
                .connect(&url)
                .await
                .expect("failed to connect to orders database");
            let store = PgOrders::new(pool);
            store
                .ensure_schema()
                .await
                .expect("failed to create orders schema");
            run(gateway, store, config, metrics_handle).await;
        }
        None => run(gateway, InMemoryOrders::new(), config, metrics_handle).await,
    }
}

async fn run<O: OrderStore + Clone + 'static>(
    gateway: HttpInventoryGateway,
    store: O,
    config: OrdersConfig,
    metrics_handle: PrometheusHandle,
) {
    let orchestrator = SagaOrchestrator::new(gateway, store.clone());
    let state = Arc::new(OrdersState {
        orchestrator,
        orders: store,
    });
    let app = api::orders_app(state, metrics_handle);

    let addr = config.addr();
    tracing::info!(%addr, inventory_url = %config.inventory_url, "starting orders service");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind address");
    axum::serve(listener, app)
        .with_graceful_shutdown(api::shutdown_signal())
        .await
        .expect("server error");

    tracing::info!("server shut down gracefully");
}
