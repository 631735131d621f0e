//! PostgreSQL integration tests for the order store.
//!
//! These tests need Docker and are ignored by default. Run with:
//!
//! ```bash
//! cargo test -p orders --test postgres_integration -- --ignored --test-threads=1
//! ```

use std::sync::Arc;

use common::{ItemId, Money, OrderId};
use orders::{OrderError, OrderLine, OrderStore, PgOrders};
use testcontainers::{ContainerAsync, runners::AsyncRunner};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;

/// Shared container info - container stays alive for all tests
struct ContainerInfo {
    #[allow(dead_code)] // Container must stay alive for tests
    container: ContainerAsync<Postgres>,
    connection_string: String,
}

static CONTAINER: OnceCell<Arc<ContainerInfo>> = OnceCell::const_new();

async fn get_container_info() -> Arc<ContainerInfo> {
    CONTAINER
        .get_or_init(|| async {
            let container = Postgres::default().start().await.unwrap();

            let host = container.get_host().await.unwrap();
            let port = container.get_host_port_ipv4(5432).await.unwrap();

            let connection_string =
                format!("postgres://postgres:postgres@{}:{}/postgres", host, port);

            Arc::new(ContainerInfo {
                container,
                connection_string,
            })
        })
        .await
        .clone()
}

/// Get a fresh store with its own pool and cleared tables
async fn get_test_store() -> PgOrders {
    let info = get_container_info().await;

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&info.connection_string)
        .await
        .unwrap();

    let store = PgOrders::new(pool);
    store.ensure_schema().await.unwrap();

    sqlx::query("TRUNCATE TABLE orders, order_lines RESTART IDENTITY")
        .execute(store.pool())
        .await
        .unwrap();

    store
}

fn line(item_id: i64, quantity: u32, price_cents: i64) -> OrderLine {
    OrderLine {
        item_id: ItemId::new(item_id),
        name: format!("item-{item_id}"),
        quantity,
        price: Money::from_cents(price_cents),
    }
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn create_persists_order_with_all_lines() {
    let store = get_test_store().await;

    let order = store
        .create(
            vec![line(1, 3, 200), line(1, 4, 200)],
            Money::from_cents(1400),
        )
        .await
        .unwrap();

    assert_eq!(order.id, OrderId::new(1));

    let fetched = store.get(order.id).await.unwrap();
    assert_eq!(fetched.lines.len(), 2);
    assert_eq!(fetched.total, Money::from_cents(1400));
    // Lines come back in commit order.
    assert_eq!(fetched.lines[0].quantity, 3);
    assert_eq!(fetched.lines[1].quantity, 4);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn get_unknown_id_is_not_found() {
    let store = get_test_store().await;

    let err = store.get(OrderId::new(42)).await.unwrap_err();
    assert!(matches!(err, OrderError::NotFound(_)));
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn list_is_id_descending() {
    let store = get_test_store().await;

    for _ in 0..3 {
        store.create(vec![], Money::zero()).await.unwrap();
    }

    let orders = store.list().await.unwrap();
    let ids: Vec<i64> = orders.iter().map(|o| o.id.as_i64()).collect();
    assert_eq!(ids, vec![3, 2, 1]);
}
