//! In-memory order store.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use common::{Money, OrderId};
use tokio::sync::RwLock;

use crate::error::{OrderError, Result};
use crate::order::{Order, OrderLine};
use crate::store::OrderStore;

/// In-memory order store.
///
/// Non-durable, but still honors the id-descending list contract.
#[derive(Clone)]
pub struct InMemoryOrders {
    orders: Arc<RwLock<HashMap<OrderId, Order>>>,
    next_id: Arc<AtomicI64>,
}

impl InMemoryOrders {
    /// Creates a new empty in-memory order store.
    pub fn new() -> Self {
        Self {
            orders: Arc::new(RwLock::new(HashMap::new())),
            next_id: Arc::new(AtomicI64::new(1)),
        }
    }

    /// Returns the number of committed orders.
    pub async fn len(&self) -> usize {
        self.orders.read().await.len()
    }

    /// Returns true if no orders have been committed.
    pub async fn is_empty(&self) -> bool {
        self.orders.read().await.is_empty()
    }
}

impl Default for InMemoryOrders {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OrderStore for InMemoryOrders {
    async fn create(&self, lines: Vec<OrderLine>, total: Money) -> Result<Order> {
        let id = OrderId::new(self.next_id.fetch_add(1, Ordering::Relaxed));
        let order = Order {
            id,
            lines,
            total,
            created_at: Utc::now(),
        };
        self.orders.write().await.insert(id, order.clone());
        Ok(order)
    }

    async fn get(&self, id: OrderId) -> Result<Order> {
        self.orders
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(OrderError::NotFound(id))
    }

    async fn list(&self) -> Result<Vec<Order>> {
        let mut orders: Vec<Order> = self.orders.read().await.values().cloned().collect();
        orders.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(orders)
    }
}
