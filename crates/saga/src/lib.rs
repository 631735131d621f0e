//! Order-creation saga: sequential remote reservation with compensating
//! rollback.
//!
//! The orchestrator walks the requested lines in order, reserving each
//! one against the inventory ledger through an atomic conditional
//! adjustment. On the first failure it unwinds the already-committed
//! reservations in strict reverse order and surfaces the original
//! error. Only when every line has reserved does it write the order —
//! the single commit point.

pub mod error;
pub mod gateway;
pub mod http;
pub mod memory;
pub mod orchestrator;
pub mod state;

pub use error::SagaError;
pub use gateway::{GatewayError, InventoryGateway};
pub use http::HttpInventoryGateway;
pub use memory::InProcessGateway;
pub use orchestrator::{LineRequest, SagaOrchestrator};
pub use state::SagaState;
