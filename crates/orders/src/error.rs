//! Order ledger error types.

use common::OrderId;
use thiserror::Error;

/// Errors that can occur during order ledger operations.
#[derive(Debug, Error)]
pub enum OrderError {
    /// No order exists with the given ID.
    #[error("order {0} not found")]
    NotFound(OrderId),

    /// Database error from the PostgreSQL store.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Convenience type alias for order ledger results.
pub type Result<T> = std::result::Result<T, OrderError>;
