//! The inventory store trait.

use async_trait::async_trait;
use common::{ItemId, Money};

use crate::Result;
use crate::item::Item;

/// Authoritative store for inventory items.
///
/// Implementations must make [`adjust`](InventoryStore::adjust) atomic
/// relative to any concurrent adjust on the same item: the non-negative
/// check and the mutation happen in one step, never check-then-set
/// across two. Ordering across different items is unspecified.
#[async_trait]
pub trait InventoryStore: Send + Sync {
    /// Creates an item with a sequentially assigned ID.
    async fn create(&self, name: &str, quantity: i64, price: Money) -> Result<Item>;

    /// Fetches an item by ID.
    async fn get(&self, id: ItemId) -> Result<Item>;

    /// Applies `delta` to the item's quantity iff `quantity + delta >= 0`,
    /// returning the updated item.
    ///
    /// Fails with [`InventoryError::NotFound`](crate::InventoryError::NotFound)
    /// for unknown IDs and
    /// [`InventoryError::InsufficientStock`](crate::InventoryError::InsufficientStock)
    /// when the adjustment would go negative.
    async fn adjust(&self, id: ItemId, delta: i64) -> Result<Item>;

    /// Returns all items, in no particular order.
    async fn list(&self) -> Result<Vec<Item>>;
}
