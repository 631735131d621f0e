//! Inventory service entry point.

use std::sync::Arc;

use api::config::InventoryConfig;
use api::routes::items::InventoryState;
use common::Money;
use inventory::{InMemoryInventory, InventoryStore, PgInventory};
use metrics_exporter_prometheus::PrometheusHandle;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() {
    let config = InventoryConfig::from_env();

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

    match config.database_url.clone() {
        Some(url) => {
            let pool = PgPoolOptions::new()
                .max_connections(5)
                .connect(&url)
                .await
                .expect("failed to connect to inventory database");
            let store = PgInventory::new(pool);
            store
                .ensure_schema()
                .await
                .expect("failed to create inventory schema");
            run(store, config, metrics_handle).await;
        }
        None => run(InMemoryInventory::new(), config, metrics_handle).await,
    }
}

async fn run<S: InventoryStore + 'static>(
    store: S,
    config: InventoryConfig,
    metrics_handle: PrometheusHandle,
) {
    seed_if_empty(&store)
        .await
        .expect("failed to seed demo inventory");

    let app = api::inventory_app(Arc::new(InventoryState { store }), metrics_handle);

    let addr = config.addr();
    tracing::info!(%addr, "starting inventory service");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind address");
    axum::serve(listener, app)
        .with_graceful_shutdown(api::shutdown_signal())
        .await
        .expect("server error");

    tracing::info!("server shut down gracefully");
}

/// Seeds demo items the first time the service starts on an empty ledger.
async fn seed_if_empty<S: InventoryStore>(store: &S) -> inventory::Result<()> {
    if store.list().await?.is_empty() {
        store.create("Hoodie", 100, Money::from_cents(1999)).await?;
        store.create("T-Shirt", 50, Money::from_cents(750)).await?;
        tracing::info!("seeded demo inventory");
    }
    Ok(())
}
