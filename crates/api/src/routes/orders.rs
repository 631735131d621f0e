//! Order placement and listing endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use common::{ItemId, Money, OrderId};
use orders::{Order, OrderError, OrderStore};
use saga::{InventoryGateway, LineRequest, SagaOrchestrator};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Shared state for the orders service handlers.
pub struct OrdersState<G: InventoryGateway, O: OrderStore> {
    pub orchestrator: SagaOrchestrator<G, O>,
    pub orders: O,
}

// -- Request types --

#[derive(Deserialize)]
pub struct CreateOrderRequest {
    pub items: Vec<LineRequest>,
}

// -- Response types --

#[derive(Serialize)]
pub struct OrderResponse {
    pub id: OrderId,
    pub items: Vec<OrderLineResponse>,
    pub total: Money,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize)]
pub struct OrderLineResponse {
    pub item_id: ItemId,
    pub name: String,
    pub quantity: u32,
    pub price: Money,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        Self {
            id: order.id,
            items: order
                .lines
                .into_iter()
                .map(|line| OrderLineResponse {
                    item_id: line.item_id,
                    name: line.name,
                    quantity: line.quantity,
                    price: line.price,
                })
                .collect(),
            total: order.total,
            created_at: order.created_at,
        }
    }
}

// -- Handlers --

/// POST /orders — place an order through the reservation saga.
#[tracing::instrument(skip(state, req))]
pub async fn create<G, O>(
    State(state): State<Arc<OrdersState<G, O>>>,
    Json(req): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<OrderResponse>), ApiError>
where
    G: InventoryGateway + 'static,
    O: OrderStore + Clone + 'static,
{
    let order = state.orchestrator.place_order(req.items).await?;
    Ok((StatusCode::CREATED, Json(order.into())))
}

/// GET /orders — list orders, most recent first.
pub async fn list<G, O>(
    State(state): State<Arc<OrdersState<G, O>>>,
) -> Result<Json<Vec<OrderResponse>>, ApiError>
where
    G: InventoryGateway + 'static,
    O: OrderStore + Clone + 'static,
{
    let orders = state.orders.list().await.map_err(internal)?;
    Ok(Json(orders.into_iter().map(OrderResponse::from).collect()))
}

/// GET /orders/{id} — fetch a single order.
pub async fn get<G, O>(
    State(state): State<Arc<OrdersState<G, O>>>,
    Path(id): Path<i64>,
) -> Result<Json<OrderResponse>, ApiError>
where
    G: InventoryGateway + 'static,
    O: OrderStore + Clone + 'static,
{
    let order = state
        .orders
        .get(OrderId::new(id))
        .await
        .map_err(|err| match err {
            OrderError::NotFound(_) => ApiError::NotFound(err.to_string()),
            other => internal(other),
        })?;
    Ok(Json(order.into()))
}

fn internal(err: OrderError) -> ApiError {
    ApiError::Internal(err.to_string())
}
