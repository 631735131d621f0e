//! Inventory error types.

use common::ItemId;
use thiserror::Error;

/// Errors that can occur during inventory operations.
///
/// `NotFound` and `InsufficientStock` are kept distinct so callers can
/// branch on them, even where the HTTP surface collapses both to one
/// status code.
#[derive(Debug, Error)]
pub enum InventoryError {
    /// No item exists with the given ID.
    #[error("item {0} not found")]
    NotFound(ItemId),

    /// The adjustment would drive the quantity negative.
    #[error("adjusting item {id} by {delta} would go negative (quantity {available})")]
    InsufficientStock {
        id: ItemId,
        available: i64,
        delta: i64,
    },

    /// Database error from the PostgreSQL store.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Convenience type alias for inventory results.
pub type Result<T> = std::result::Result<T, InventoryError>;
