//! In-memory inventory store with per-item locking.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use common::{ItemId, Money};
use tokio::sync::{Mutex, RwLock};

use crate::error::{InventoryError, Result};
use crate::item::Item;
use crate::store::InventoryStore;

/// In-memory inventory store.
///
/// The map lock only guards the table structure (create/list); each item
/// sits behind its own mutex, so adjusts on different items do not
/// serialize against each other. The non-negative check and the mutation
/// happen under the same row lock.
#[derive(Clone)]
pub struct InMemoryInventory {
    items: Arc<RwLock<HashMap<ItemId, Arc<Mutex<Item>>>>>,
    next_id: Arc<AtomicI64>,
}

impl InMemoryInventory {
    /// Creates a new empty in-memory inventory.
    pub fn new() -> Self {
        Self {
            items: Arc::new(RwLock::new(HashMap::new())),
            next_id: Arc::new(AtomicI64::new(1)),
        }
    }

    /// Returns the number of items in the store.
    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    /// Returns true if the store holds no items.
    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }

    async fn row(&self, id: ItemId) -> Result<Arc<Mutex<Item>>> {
        self.items
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(InventoryError::NotFound(id))
    }
}

impl Default for InMemoryInventory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl InventoryStore for InMemoryInventory {
    async fn create(&self, name: &str, quantity: i64, price: Money) -> Result<Item> {
        let id = ItemId::new(self.next_id.fetch_add(1, Ordering::Relaxed));
        let item = Item {
            id,
            name: name.to_string(),
            quantity,
            price,
        };
        self.items
            .write()
            .await
            .insert(id, Arc::new(Mutex::new(item.clone())));
        Ok(item)
    }

    async fn get(&self, id: ItemId) -> Result<Item> {
        let row = self.row(id).await?;
        let item = row.lock().await;
        Ok(item.clone())
    }

    async fn adjust(&self, id: ItemId, delta: i64) -> Result<Item> {
        let row = self.row(id).await?;
        let mut item = row.lock().await;
        if item.quantity + delta < 0 {
            return Err(InventoryError::InsufficientStock {
                id,
                available: item.quantity,
                delta,
            });
        }
        item.quantity += delta;
        Ok(item.clone())
    }

    async fn list(&self) -> Result<Vec<Item>> {
        let map = self.items.read().await;
        let mut items = Vec::with_capacity(map.len());
        for row in map.values() {
            items.push(row.lock().await.clone());
        }
        items.sort_by_key(|item| item.id);
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_assigns_sequential_ids() {
        let store = InMemoryInventory::new();

        let a = store.create("Hoodie", 100, Money::from_cents(1999)).await.unwrap();
        let b = store.create("T-Shirt", 50, Money::from_cents(750)).await.unwrap();

        assert_eq!(a.id, ItemId::new(1));
        assert_eq!(b.id, ItemId::new(2));
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn get_returns_created_item() {
        let store = InMemoryInventory::new();
        let created = store.create("Hoodie", 100, Money::from_cents(1999)).await.unwrap();

        let fetched = store.get(created.id).await.unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn get_unknown_id_is_not_found() {
        let store = InMemoryInventory::new();
        let err = store.get(ItemId::new(99)).await.unwrap_err();
        assert!(matches!(err, InventoryError::NotFound(id) if id == ItemId::new(99)));
    }

    #[tokio::test]
    async fn adjust_roundtrip_restores_quantity() {
        let store = InMemoryInventory::new();
        let item = store.create("Hoodie", 10, Money::from_cents(200)).await.unwrap();

        let down = store.adjust(item.id, -4).await.unwrap();
        assert_eq!(down.quantity, 6);

        let up = store.adjust(item.id, 4).await.unwrap();
        assert_eq!(up.quantity, 10);
    }

    #[tokio::test]
    async fn adjust_rejects_going_negative() {
        let store = InMemoryInventory::new();
        let item = store.create("Hoodie", 2, Money::from_cents(200)).await.unwrap();

        let err = store.adjust(item.id, -3).await.unwrap_err();
        assert!(matches!(
            err,
            InventoryError::InsufficientStock {
                available: 2,
                delta: -3,
                ..
            }
        ));

        // Quantity unchanged after the rejection.
        assert_eq!(store.get(item.id).await.unwrap().quantity, 2);
    }

    #[tokio::test]
    async fn adjust_unknown_id_is_not_found() {
        let store = InMemoryInventory::new();
        let err = store.adjust(ItemId::new(1), -1).await.unwrap_err();
        assert!(matches!(err, InventoryError::NotFound(_)));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_adjusts_never_go_negative() {
        let store = InMemoryInventory::new();
        let item = store.create("Hoodie", 10, Money::from_cents(200)).await.unwrap();

        let mut handles = Vec::new();
        for _ in 0..25 {
            let store = store.clone();
            let id = item.id;
            handles.push(tokio::spawn(async move { store.adjust(id, -1).await }));
        }

        let mut succeeded = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(updated) => {
                    assert!(updated.quantity >= 0);
                    succeeded += 1;
                }
                Err(err) => assert!(matches!(err, InventoryError::InsufficientStock { .. })),
            }
        }

        // Exactly the available stock was handed out.
        assert_eq!(succeeded, 10);
        assert_eq!(store.get(item.id).await.unwrap().quantity, 0);
    }

    #[tokio::test]
    async fn list_returns_all_items_id_ascending() {
        let store = InMemoryInventory::new();
        store.create("Hoodie", 100, Money::from_cents(1999)).await.unwrap();
        store.create("T-Shirt", 50, Money::from_cents(750)).await.unwrap();

        let items = store.list().await.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].name, "Hoodie");
        assert_eq!(items[1].name, "T-Shirt");
    }
}
