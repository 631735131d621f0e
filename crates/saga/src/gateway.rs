//! Inventory gateway trait and its error type.

use async_trait::async_trait;
use common::ItemId;
use inventory::Item;
use thiserror::Error;

/// Error from a gateway call to the inventory ledger.
///
/// `NotFound` and `Rejected` are both business rejections from the
/// saga's point of view; `Unavailable` is a transport failure. The HTTP
/// adjust endpoint collapses unknown-id and insufficient-stock into one
/// 400, so an HTTP gateway reports both as `Rejected` there, while
/// fetches keep `NotFound` distinct via the 404.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The inventory service could not be reached, or the call timed out.
    #[error("inventory unreachable: {0}")]
    Unavailable(String),

    /// The inventory service does not know this item.
    #[error("item {0} not found in inventory")]
    NotFound(ItemId),

    /// The inventory service refused the adjustment.
    #[error("{0}")]
    Rejected(String),
}

/// Remote surface of the inventory ledger as the orchestrator sees it.
#[async_trait]
pub trait InventoryGateway: Send + Sync {
    /// Fetches an item, capturing the name and price snapshot for the
    /// order line.
    async fn fetch_item(&self, id: ItemId) -> Result<Item, GatewayError>;

    /// Applies a conditional quantity adjustment. Negative deltas
    /// reserve stock; positive deltas release it during compensation.
    async fn adjust(&self, id: ItemId, delta: i64) -> Result<Item, GatewayError>;
}
