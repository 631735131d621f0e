//! Saga orchestrator for order creation.

use std::future::Future;
use std::time::Duration;

use common::{ItemId, Money};
use orders::{Order, OrderLine, OrderStore};
use serde::{Deserialize, Serialize};
use tokio::time::{Instant, timeout_at};

use crate::error::SagaError;
use crate::gateway::{GatewayError, InventoryGateway};
use crate::state::SagaState;

/// Overall deadline for one saga execution, covering both the forward
/// reservation phase and any compensation calls.
const DEFAULT_DEADLINE: Duration = Duration::from_secs(8);

/// One requested order line. Duplicate item IDs are allowed and are
/// reserved independently, never merged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineRequest {
    /// The inventory item to reserve.
    #[serde(rename = "id")]
    pub item_id: ItemId,

    /// Units to reserve.
    pub quantity: u32,
}

/// A successfully committed reservation, remembered for rollback.
struct Reservation {
    item_id: ItemId,
    quantity: u32,
}

/// Drives the order-creation saga: a strictly sequential chain of
/// fetch-then-adjust calls against the inventory ledger, with
/// reverse-order compensation on the first failure and a single atomic
/// order write as the commit point.
pub struct SagaOrchestrator<G, O> {
    gateway: G,
    orders: O,
    deadline: Duration,
}

impl<G, O> SagaOrchestrator<G, O>
where
    G: InventoryGateway,
    O: OrderStore,
{
    /// Creates an orchestrator with the default deadline.
    pub fn new(gateway: G, orders: O) -> Self {
        Self {
            gateway,
            orders,
            deadline: DEFAULT_DEADLINE,
        }
    }

    /// Overrides the saga deadline.
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    /// Executes one order-creation saga.
    ///
    /// Lines are reserved in request order; on the first failure the
    /// already-committed reservations are released most-recent-first and
    /// the original error is returned. An empty request commits an order
    /// with zero lines and zero total.
    #[tracing::instrument(skip(self, lines), fields(lines = lines.len()))]
    pub async fn place_order(&self, lines: Vec<LineRequest>) -> Result<Order, SagaError> {
        metrics::counter!("saga_executions_total").increment(1);
        let started = std::time::Instant::now();
        let deadline = Instant::now() + self.deadline;

        let mut state = SagaState::Pending;
        tracing::debug!(%state, "saga started");

        let mut committed: Vec<Reservation> = Vec::new();
        let mut order_lines: Vec<OrderLine> = Vec::with_capacity(lines.len());
        let mut total = Money::zero();

        for (index, line) in lines.iter().enumerate() {
            state = SagaState::Reserving(index);
            tracing::debug!(%state, item = %line.item_id, quantity = line.quantity, "reserving line");

            let item = match self.reserve_line(deadline, line).await {
                Ok(item) => item,
                Err(err) => {
                    state = SagaState::Compensating(index);
                    tracing::warn!(%state, error = %err, "reservation failed, unwinding");

                    self.compensate(&committed, deadline).await;

                    state = SagaState::Failed;
                    tracing::warn!(%state, reserved = committed.len(), "saga failed");
                    metrics::counter!("saga_failed").increment(1);
                    metrics::histogram!("saga_duration_seconds")
                        .record(started.elapsed().as_secs_f64());
                    return Err(classify(err));
                }
            };

            committed.push(Reservation {
                item_id: line.item_id,
                quantity: line.quantity,
            });
            total += item.price.multiply(line.quantity);
            order_lines.push(OrderLine {
                item_id: line.item_id,
                name: item.name,
                quantity: line.quantity,
                price: item.price,
            });
        }

        // The single commit point. If this write fails the inventory is
        // already decremented and there is no order record; that gap is
        // accepted here and surfaced as a persistence failure.
        let order = match self.orders.create(order_lines, total).await {
            Ok(order) => order,
            Err(err) => {
                tracing::error!(error = %err, reserved = committed.len(),
                    "order write failed after all reservations succeeded");
                metrics::counter!("saga_failed").increment(1);
                metrics::histogram!("saga_duration_seconds")
                    .record(started.elapsed().as_secs_f64());
                return Err(SagaError::Persistence(err.to_string()));
            }
        };

        state = SagaState::Committed;
        tracing::info!(%state, order_id = %order.id, total = %order.total, "saga committed");
        metrics::counter!("saga_committed").increment(1);
        metrics::histogram!("saga_duration_seconds").record(started.elapsed().as_secs_f64());

        Ok(order)
    }

    /// Fetches the item snapshot, then reserves the quantity. A line
    /// that fails here never committed, so it is never compensated.
    async fn reserve_line(
        &self,
        deadline: Instant,
        line: &LineRequest,
    ) -> Result<inventory::Item, GatewayError> {
        let item = self
            .call(deadline, self.gateway.fetch_item(line.item_id))
            .await?;

        self.call(
            deadline,
            self.gateway.adjust(line.item_id, -(line.quantity as i64)),
        )
        .await?;

        Ok(item)
    }

    /// Releases committed reservations most-recent-first. Failures are
    /// logged and swallowed; compensation is best-effort and the caller
    /// only sees the original triggering error.
    async fn compensate(&self, committed: &[Reservation], deadline: Instant) {
        for reservation in committed.iter().rev() {
            let delta = reservation.quantity as i64;
            match self
                .call(deadline, self.gateway.adjust(reservation.item_id, delta))
                .await
            {
                Ok(_) => {
                    tracing::debug!(item = %reservation.item_id, delta, "released reservation");
                }
                Err(err) => {
                    metrics::counter!("compensation_failures_total").increment(1);
                    tracing::warn!(item = %reservation.item_id, delta, error = %err,
                        "compensation failed, continuing");
                }
            }
        }
    }

    /// Runs one gateway call under the shared saga deadline.
    async fn call<T>(
        &self,
        deadline: Instant,
        fut: impl Future<Output = Result<T, GatewayError>> + Send,
    ) -> Result<T, GatewayError> {
        match timeout_at(deadline, fut).await {
            Ok(result) => result,
            Err(_) => Err(GatewayError::Unavailable("saga deadline elapsed".into())),
        }
    }
}

fn classify(err: GatewayError) -> SagaError {
    match err {
        GatewayError::Unavailable(msg) => SagaError::Upstream(msg),
        GatewayError::NotFound(id) => {
            SagaError::Rejected(format!("item {id} not found in inventory"))
        }
        GatewayError::Rejected(msg) => SagaError::Rejected(msg),
    }
}
