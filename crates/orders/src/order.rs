//! The order and order line models.

use chrono::{DateTime, Utc};
use common::{ItemId, Money, OrderId};
use serde::{Deserialize, Serialize};

/// One line of a committed order.
///
/// `name` and `price` are snapshots captured at reservation time; they
/// may diverge from the inventory item's current state later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    /// The inventory item this line reserved.
    pub item_id: ItemId,

    /// Item name at reservation time.
    pub name: String,

    /// Units reserved.
    pub quantity: u32,

    /// Price per unit at reservation time, in cents.
    pub price: Money,
}

impl OrderLine {
    /// Returns the total price for this line (quantity * price).
    pub fn total_price(&self) -> Money {
        self.price.multiply(self.quantity)
    }
}

/// A committed order. Immutable once written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Sequentially assigned identifier.
    pub id: OrderId,

    /// Lines in the order they were reserved. Duplicate item IDs are
    /// kept as independent lines.
    pub lines: Vec<OrderLine>,

    /// Sum of `quantity * price` over the lines, in cents.
    pub total: Money,

    /// When the ledger committed the order.
    pub created_at: DateTime<Utc>,
}
