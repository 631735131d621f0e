//! PostgreSQL-backed inventory store.

use async_trait::async_trait;
use common::{ItemId, Money};
use sqlx::{PgPool, Row, postgres::PgRow};

use crate::error::{InventoryError, Result};
use crate::item::Item;
use crate::store::InventoryStore;

/// PostgreSQL inventory store.
///
/// The adjust operation is a single guarded `UPDATE ... WHERE
/// quantity + delta >= 0 RETURNING`, so the non-negative invariant is
/// enforced by the database inside the same statement as the mutation.
#[derive(Clone)]
pub struct PgInventory {
    pool: PgPool,
}

impl PgInventory {
    /// Creates a new PostgreSQL inventory store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Creates the items table if it does not exist.
    pub async fn ensure_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS items (
                id BIGSERIAL PRIMARY KEY,
                name TEXT NOT NULL,
                quantity BIGINT NOT NULL,
                price_cents BIGINT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    fn row_to_item(row: PgRow) -> Result<Item> {
        Ok(Item {
            id: ItemId::new(row.try_get("id")?),
            name: row.try_get("name")?,
            quantity: row.try_get("quantity")?,
            price: Money::from_cents(row.try_get("price_cents")?),
        })
    }
}

#[async_trait]
impl InventoryStore for PgInventory {
    async fn create(&self, name: &str, quantity: i64, price: Money) -> Result<Item> {
        let row = sqlx::query(
            r#"
            INSERT INTO items (name, quantity, price_cents)
            VALUES ($1, $2, $3)
            RETURNING id, name, quantity, price_cents
            "#,
        )
        .bind(name)
        .bind(quantity)
        .bind(price.cents())
        .fetch_one(&self.pool)
        .await?;

        Self::row_to_item(row)
    }

    async fn get(&self, id: ItemId) -> Result<Item> {
        let row = sqlx::query(
            "SELECT id, name, quantity, price_cents FROM items WHERE id = $1",
        )
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await?
        .ok_or(InventoryError::NotFound(id))?;

        Self::row_to_item(row)
    }

    async fn adjust(&self, id: ItemId, delta: i64) -> Result<Item> {
        let row = sqlx::query(
            r#"
            UPDATE items SET quantity = quantity + $1
            WHERE id = $2 AND quantity + $1 >= 0
            RETURNING id, name, quantity, price_cents
            "#,
        )
        .bind(delta)
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Self::row_to_item(row),
            None => {
                // The guarded update matched nothing; look the row up once
                // more only to classify the rejection.
                let available: Option<i64> =
                    sqlx::query_scalar("SELECT quantity FROM items WHERE id = $1")
                        .bind(id.as_i64())
                        .fetch_optional(&self.pool)
                        .await?;

                match available {
                    Some(available) => Err(InventoryError::InsufficientStock {
                        id,
                        available,
                        delta,
                    }),
                    None => Err(InventoryError::NotFound(id)),
                }
            }
        }
    }

    async fn list(&self) -> Result<Vec<Item>> {
        let rows = sqlx::query("SELECT id, name, quantity, price_cents FROM items ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Self::row_to_item).collect()
    }
}
