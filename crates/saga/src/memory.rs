//! In-process inventory gateway for tests and single-process setups.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use common::ItemId;
use inventory::{InventoryError, InventoryStore, Item};
use tokio::sync::Mutex;

use crate::gateway::{GatewayError, InventoryGateway};

/// Gateway that calls an [`InventoryStore`] directly, with knobs to
/// inject transport failures and latency and a log of every adjust call
/// received, so tests can assert compensation order.
#[derive(Clone)]
pub struct InProcessGateway<S> {
    store: S,
    fail_fetch: Arc<AtomicBool>,
    fail_release: Arc<AtomicBool>,
    adjusts_before_failure: Arc<Mutex<Option<usize>>>,
    delay: Arc<Mutex<Option<Duration>>>,
    log: Arc<Mutex<Vec<(ItemId, i64)>>>,
}

impl<S> InProcessGateway<S> {
    /// Wraps an inventory store.
    pub fn new(store: S) -> Self {
        Self {
            store,
            fail_fetch: Arc::new(AtomicBool::new(false)),
            fail_release: Arc::new(AtomicBool::new(false)),
            adjusts_before_failure: Arc::new(Mutex::new(None)),
            delay: Arc::new(Mutex::new(None)),
            log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Makes every fetch fail as if the service were unreachable.
    pub fn set_fail_on_fetch(&self, fail: bool) {
        self.fail_fetch.store(fail, Ordering::Relaxed);
    }

    /// Makes every release (positive-delta adjust) fail as if the
    /// service were unreachable.
    pub fn set_fail_on_release(&self, fail: bool) {
        self.fail_release.store(fail, Ordering::Relaxed);
    }

    /// Lets `n` reservation adjusts succeed, then fails the next one as
    /// a transport error.
    pub async fn fail_adjust_after(&self, n: usize) {
        *self.adjusts_before_failure.lock().await = Some(n);
    }

    /// Delays every gateway call, for deadline tests.
    pub async fn set_delay(&self, delay: Duration) {
        *self.delay.lock().await = Some(delay);
    }

    /// Returns every adjust call received, in arrival order.
    pub async fn adjustments(&self) -> Vec<(ItemId, i64)> {
        self.log.lock().await.clone()
    }

    async fn simulate_latency(&self) {
        if let Some(delay) = *self.delay.lock().await {
            tokio::time::sleep(delay).await;
        }
    }
}

fn map_store_error(err: InventoryError) -> GatewayError {
    match err {
        InventoryError::NotFound(id) => GatewayError::NotFound(id),
        InventoryError::InsufficientStock { .. } => GatewayError::Rejected(err.to_string()),
        InventoryError::Database(e) => GatewayError::Unavailable(e.to_string()),
    }
}

#[async_trait]
impl<S: InventoryStore> InventoryGateway for InProcessGateway<S> {
    async fn fetch_item(&self, id: ItemId) -> Result<Item, GatewayError> {
        self.simulate_latency().await;
        if self.fail_fetch.load(Ordering::Relaxed) {
            return Err(GatewayError::Unavailable("injected fetch failure".into()));
        }
        self.store.get(id).await.map_err(map_store_error)
    }

    async fn adjust(&self, id: ItemId, delta: i64) -> Result<Item, GatewayError> {
        self.simulate_latency().await;
        self.log.lock().await.push((id, delta));

        if delta < 0 {
            let mut remaining = self.adjusts_before_failure.lock().await;
            if let Some(n) = remaining.as_mut() {
                if *n == 0 {
                    return Err(GatewayError::Unavailable("injected adjust failure".into()));
                }
                *n -= 1;
            }
        } else if self.fail_release.load(Ordering::Relaxed) {
            return Err(GatewayError::Unavailable("injected release failure".into()));
        }

        self.store.adjust(id, delta).await.map_err(map_store_error)
    }
}
