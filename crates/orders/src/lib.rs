//! Order ledger: an append-only store of committed orders.
//!
//! An order is written exactly once, atomically with all of its lines,
//! and never updated or deleted afterwards. Listing is id-descending
//! (most recent first).

pub mod error;
pub mod memory;
pub mod order;
pub mod postgres;
pub mod store;

pub use error::{OrderError, Result};
pub use memory::InMemoryOrders;
pub use order::{Order, OrderLine};
pub use postgres::PgOrders;
pub use store::OrderStore;
