//! The order store trait.

use async_trait::async_trait;
use common::{Money, OrderId};

use crate::Result;
use crate::order::{Order, OrderLine};

/// Append-only store for committed orders.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Writes an order atomically: the order record and all its lines
    /// persist together or not at all. Assigns the ID and timestamp.
    async fn create(&self, lines: Vec<OrderLine>, total: Money) -> Result<Order>;

    /// Fetches an order by ID.
    async fn get(&self, id: OrderId) -> Result<Order>;

    /// Returns all orders, id-descending (most recent first).
    async fn list(&self) -> Result<Vec<Order>>;
}
