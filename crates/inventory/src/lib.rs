//! Inventory ledger: the authoritative per-item stock store.
//!
//! The only mutation is [`InventoryStore::adjust`], a conditional
//! adjustment that applies a delta iff the resulting quantity stays
//! non-negative, atomically per item. Two implementations are provided:
//! an in-memory store with per-item locking and a PostgreSQL store whose
//! adjustment is a single guarded `UPDATE` statement.

pub mod error;
pub mod item;
pub mod memory;
pub mod postgres;
pub mod store;

pub use error::{InventoryError, Result};
pub use item::Item;
pub use memory::InMemoryInventory;
pub use postgres::PgInventory;
pub use store::InventoryStore;
