//! The inventory item model.

use common::{ItemId, Money};
use serde::{Deserialize, Serialize};

/// A product tracked by the inventory ledger.
///
/// `quantity` is never observably negative; it is mutated only through
/// the store's atomic adjust operation. `price` is per unit, in cents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Sequentially assigned, immutable identifier.
    pub id: ItemId,

    /// Human-readable product name.
    pub name: String,

    /// Units currently on hand.
    pub quantity: i64,

    /// Price per unit in cents.
    pub price: Money,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_serialization_uses_flat_fields() {
        let item = Item {
            id: ItemId::new(1),
            name: "Hoodie".to_string(),
            quantity: 100,
            price: Money::from_cents(1999),
        };

        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"id": 1, "name": "Hoodie", "quantity": 100, "price": 1999})
        );

        let back: Item = serde_json::from_value(json).unwrap();
        assert_eq!(back, item);
    }
}
