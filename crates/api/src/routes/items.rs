//! Inventory item endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use common::{ItemId, Money};
use inventory::{InventoryError, InventoryStore, Item};
use serde::Deserialize;

use crate::error::ApiError;

/// Shared state for the inventory service handlers.
pub struct InventoryState<S: InventoryStore> {
    pub store: S,
}

// -- Request types --

#[derive(Deserialize)]
pub struct CreateItemRequest {
    pub name: String,
    pub quantity: i64,
    /// Price per unit in cents.
    pub price: Money,
}

#[derive(Deserialize)]
pub struct AdjustRequest {
    pub delta: i64,
}

// -- Handlers --

/// POST /items — create a new item.
#[tracing::instrument(skip(state, req))]
pub async fn create<S: InventoryStore + 'static>(
    State(state): State<Arc<InventoryState<S>>>,
    Json(req): Json<CreateItemRequest>,
) -> Result<(StatusCode, Json<Item>), ApiError> {
    if req.name.trim().is_empty() {
        return Err(ApiError::BadRequest("name must not be empty".to_string()));
    }
    if req.quantity < 0 {
        return Err(ApiError::BadRequest(
            "quantity must not be negative".to_string(),
        ));
    }
    if req.price.is_negative() {
        return Err(ApiError::BadRequest(
            "price must not be negative".to_string(),
        ));
    }

    let item = state
        .store
        .create(&req.name, req.quantity, req.price)
        .await
        .map_err(internal)?;

    Ok((StatusCode::CREATED, Json(item)))
}

/// GET /items — list all items.
pub async fn list<S: InventoryStore + 'static>(
    State(state): State<Arc<InventoryState<S>>>,
) -> Result<Json<Vec<Item>>, ApiError> {
    let items = state.store.list().await.map_err(internal)?;
    Ok(Json(items))
}

/// GET /items/{id} — fetch a single item.
pub async fn get<S: InventoryStore + 'static>(
    State(state): State<Arc<InventoryState<S>>>,
    Path(id): Path<i64>,
) -> Result<Json<Item>, ApiError> {
    let item = state
        .store
        .get(ItemId::new(id))
        .await
        .map_err(|err| match err {
            InventoryError::NotFound(_) => ApiError::NotFound(err.to_string()),
            other => internal(other),
        })?;
    Ok(Json(item))
}

/// POST /items/{id}/adjust — atomically adjust stock by a signed delta.
///
/// Unknown ids and insufficient stock both map to 400; only `GET` 404s.
#[tracing::instrument(skip(state, req))]
pub async fn adjust<S: InventoryStore + 'static>(
    State(state): State<Arc<InventoryState<S>>>,
    Path(id): Path<i64>,
    Json(req): Json<AdjustRequest>,
) -> Result<Json<Item>, ApiError> {
    let item = state
        .store
        .adjust(ItemId::new(id), req.delta)
        .await
        .map_err(|err| match err {
            InventoryError::NotFound(_) | InventoryError::InsufficientStock { .. } => {
                ApiError::BadRequest(err.to_string())
            }
            other => internal(other),
        })?;
    Ok(Json(item))
}

fn internal(err: InventoryError) -> ApiError {
    ApiError::Internal(err.to_string())
}
