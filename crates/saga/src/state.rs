//! Saga state machine.

use serde::{Deserialize, Serialize};

/// The state of one saga execution.
///
/// State transitions:
/// ```text
/// Pending ──► Reserving(i) ──┬──► Committed
///                            └──► Compensating(i) ──► Failed
/// ```
///
/// The index is the zero-based line being reserved, or the line whose
/// failure triggered compensation. State lives only for the duration of
/// the handling request; there is no durable saga log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SagaState {
    /// No line has been attempted yet.
    #[default]
    Pending,

    /// Reserving line `i` against the inventory ledger.
    Reserving(usize),

    /// Line `i` failed; unwinding earlier reservations in reverse.
    Compensating(usize),

    /// Every line reserved and the order written (terminal).
    Committed,

    /// Compensation finished after a failure (terminal).
    Failed,
}

impl SagaState {
    /// Returns true if this is a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, SagaState::Committed | SagaState::Failed)
    }

    /// Returns true while forward reservation is still possible.
    pub fn is_reserving(&self) -> bool {
        matches!(self, SagaState::Pending | SagaState::Reserving(_))
    }
}

impl std::fmt::Display for SagaState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SagaState::Pending => write!(f, "Pending"),
            SagaState::Reserving(i) => write!(f, "Reserving({i})"),
            SagaState::Compensating(i) => write!(f, "Compensating({i})"),
            SagaState::Committed => write!(f, "Committed"),
            SagaState::Failed => write!(f, "Failed"),
        }
    }
}
