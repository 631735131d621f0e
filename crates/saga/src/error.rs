//! Saga error taxonomy.

use thiserror::Error;

/// How a failed saga presents to its caller.
///
/// Compensation failures are never surfaced here; the caller only ever
/// observes the classification of the original triggering error.
#[derive(Debug, Error)]
pub enum SagaError {
    /// Transport failure reaching the inventory ledger, or the saga
    /// deadline elapsed mid-flight. Gateway-class at the HTTP boundary.
    #[error("inventory unreachable: {0}")]
    Upstream(String),

    /// Business rejection: insufficient stock or unknown item.
    /// Client-class at the HTTP boundary.
    #[error("reservation rejected: {0}")]
    Rejected(String),

    /// The order write failed after every reservation succeeded.
    /// Inventory is already decremented with no order record; there is
    /// no recovery path in this design.
    #[error("order write failed after reservation: {0}")]
    Persistence(String),
}
