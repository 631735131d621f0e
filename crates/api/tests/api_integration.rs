//! Integration tests for the inventory and orders services.

use std::sync::{Arc, OnceLock};

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{ItemId, Money};
use inventory::{InMemoryInventory, InventoryStore};
use metrics_exporter_prometheus::PrometheusHandle;
use orders::InMemoryOrders;
use saga::{InProcessGateway, SagaOrchestrator};
use tower::ServiceExt;

use api::routes::items::InventoryState;
use api::routes::orders::OrdersState;

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

fn get_metrics_handle() -> PrometheusHandle {
    METRICS_HANDLE
        .get_or_init(|| {
            let builder = metrics_exporter_prometheus::PrometheusBuilder::new();
            builder
                .install_recorder()
                .expect("failed to install Prometheus recorder")
        })
        .clone()
}

fn inventory_setup() -> (axum::Router, InMemoryInventory) {
    let store = InMemoryInventory::new();
    let app = api::inventory_app(
        Arc::new(InventoryState {
            store: store.clone(),
        }),
        get_metrics_handle(),
    );
    (app, store)
}

fn orders_setup() -> (
    axum::Router,
    InMemoryInventory,
    InProcessGateway<InMemoryInventory>,
) {
    let store = InMemoryInventory::new();
    let gateway = InProcessGateway::new(store.clone());
    let orders = InMemoryOrders::new();
    let orchestrator = SagaOrchestrator::new(gateway.clone(), orders.clone());
    let app = api::orders_app(
        Arc::new(OrdersState {
            orchestrator,
            orders,
        }),
        get_metrics_handle(),
    );
    (app, store, gateway)
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

// -- Inventory service --

#[tokio::test]
async fn test_health_check() {
    let (app, _) = inventory_setup();

    let response = app.oneshot(get_request("/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn test_create_and_get_item() {
    let (app, _) = inventory_setup();

    let response = app
        .clone()
        .oneshot(post_json(
            "/items",
            serde_json::json!({"name": "Hoodie", "quantity": 100, "price": 1999}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let created = json_body(response).await;
    assert_eq!(created["id"], 1);
    assert_eq!(created["quantity"], 100);

    let response = app.oneshot(get_request("/items/1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["name"], "Hoodie");
    assert_eq!(json["price"], 1999);
}

#[tokio::test]
async fn test_get_unknown_item_is_404() {
    let (app, _) = inventory_setup();

    let response = app.oneshot(get_request("/items/42")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = json_body(response).await;
    assert!(json["error"].as_str().is_some());
}

#[tokio::test]
async fn test_create_item_rejects_negative_quantity() {
    let (app, _) = inventory_setup();

    let response = app
        .oneshot(post_json(
            "/items",
            serde_json::json!({"name": "Hoodie", "quantity": -1, "price": 1999}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_items() {
    let (app, store) = inventory_setup();
    store.create("Hoodie", 100, Money::from_cents(1999)).await.unwrap();
    store.create("T-Shirt", 50, Money::from_cents(750)).await.unwrap();

    let response = app.oneshot(get_request("/items")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_adjust_item_stock() {
    let (app, store) = inventory_setup();
    store.create("Hoodie", 10, Money::from_cents(1999)).await.unwrap();

    let response = app
        .clone()
        .oneshot(post_json("/items/1/adjust", serde_json::json!({"delta": -4})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["quantity"], 6);
    assert_eq!(store.get(ItemId::new(1)).await.unwrap().quantity, 6);
}

#[tokio::test]
async fn test_adjust_past_zero_is_400_and_leaves_stock() {
    let (app, store) = inventory_setup();
    store.create("Hoodie", 3, Money::from_cents(1999)).await.unwrap();

    let response = app
        .oneshot(post_json("/items/1/adjust", serde_json::json!({"delta": -5})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = json_body(response).await;
    assert!(json["error"].as_str().unwrap().contains("would go negative"));
    assert_eq!(store.get(ItemId::new(1)).await.unwrap().quantity, 3);
}

#[tokio::test]
async fn test_adjust_unknown_item_is_400() {
    let (app, _) = inventory_setup();

    let response = app
        .oneshot(post_json("/items/42/adjust", serde_json::json!({"delta": -1})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let (app, _) = inventory_setup();

    let response = app.oneshot(get_request("/metrics")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

// -- Orders service --

#[tokio::test]
async fn test_place_order() {
    let (app, store, _) = orders_setup();
    store.create("Hoodie", 10, Money::from_cents(200)).await.unwrap();

    let response = app
        .clone()
        .oneshot(post_json(
            "/orders",
            serde_json::json!({"items": [{"id": 1, "quantity": 3}, {"id": 1, "quantity": 4}]}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = json_body(response).await;
    assert_eq!(json["id"], 1);
    assert_eq!(json["total"], 1400);
    assert_eq!(json["items"].as_array().unwrap().len(), 2);
    assert_eq!(json["items"][0]["name"], "Hoodie");
    assert_eq!(store.get(ItemId::new(1)).await.unwrap().quantity, 3);

    let response = app.oneshot(get_request("/orders/1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["total"], 1400);
}

#[tokio::test]
async fn test_insufficient_stock_is_400_and_restores_inventory() {
    let (app, store, _) = orders_setup();
    store.create("Hoodie", 2, Money::from_cents(200)).await.unwrap();

    let response = app
        .clone()
        .oneshot(post_json(
            "/orders",
            serde_json::json!({"items": [{"id": 1, "quantity": 1}, {"id": 1, "quantity": 5}]}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = json_body(response).await;
    assert!(json["error"].as_str().is_some());
    assert_eq!(store.get(ItemId::new(1)).await.unwrap().quantity, 2);

    // No order was written.
    let response = app.oneshot(get_request("/orders")).await.unwrap();
    let json = json_body(response).await;
    assert_eq!(json.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_unknown_item_in_order_is_400() {
    let (app, _, _) = orders_setup();

    let response = app
        .oneshot(post_json(
            "/orders",
            serde_json::json!({"items": [{"id": 42, "quantity": 1}]}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_inventory_outage_is_502() {
    let (app, store, gateway) = orders_setup();
    store.create("Hoodie", 10, Money::from_cents(200)).await.unwrap();
    gateway.set_fail_on_fetch(true);

    let response = app
        .oneshot(post_json(
            "/orders",
            serde_json::json!({"items": [{"id": 1, "quantity": 1}]}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn test_order_of_unknown_id_is_404() {
    let (app, _, _) = orders_setup();

    let response = app.oneshot(get_request("/orders/9")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_orders_list_most_recent_first() {
    let (app, store, _) = orders_setup();
    store.create("Hoodie", 100, Money::from_cents(200)).await.unwrap();

    for quantity in 1..=3 {
        let response = app
            .clone()
            .oneshot(post_json(
                "/orders",
                serde_json::json!({"items": [{"id": 1, "quantity": quantity}]}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = app.oneshot(get_request("/orders")).await.unwrap();
    let json = json_body(response).await;
    let ids: Vec<i64> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|o| o["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![3, 2, 1]);
}

#[tokio::test]
async fn test_empty_order_is_accepted() {
    let (app, _, _) = orders_setup();

    let response = app
        .oneshot(post_json("/orders", serde_json::json!({"items": []})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = json_body(response).await;
    assert_eq!(json["total"], 0);
}
