//! PostgreSQL-backed order store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::{ItemId, Money, OrderId};
use sqlx::{PgPool, Row, postgres::PgRow};

use crate::error::Result;
use crate::error::OrderError;
use crate::order::{Order, OrderLine};
use crate::store::OrderStore;

/// PostgreSQL order store.
///
/// The order row and its line rows are inserted in one transaction, so
/// a committed order is always complete.
#[derive(Clone)]
pub struct PgOrders {
    pool: PgPool,
}

impl PgOrders {
    /// Creates a new PostgreSQL order store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Creates the orders tables if they do not exist.
    pub async fn ensure_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS orders (
                id BIGSERIAL PRIMARY KEY,
                total_cents BIGINT NOT NULL,
                created_at TIMESTAMPTZ NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS order_lines (
                id BIGSERIAL PRIMARY KEY,
                order_id BIGINT NOT NULL REFERENCES orders(id) ON DELETE CASCADE,
                item_id BIGINT NOT NULL,
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

    fn row_to_line(row: PgRow) -> Result<OrderLine> {
        let quantity: i64 = row.try_get("quantity")?;
        Ok(OrderLine {
            item_id: ItemId::new(row.try_get("item_id")?),
            name: row.try_get("name")?,
            quantity: quantity as u32,
            price: Money::from_cents(row.try_get("price_cents")?),
        })
    }

    async fn lines_for(&self, order_id: OrderId) -> Result<Vec<OrderLine>> {
        let rows = sqlx::query(
            r#"
            SELECT item_id, name, quantity, price_cents
            FROM order_lines
            WHERE order_id = $1
            ORDER BY id ASC
            "#,
        )
        .bind(order_id.as_i64())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_line).collect()
    }
}

#[async_trait]
impl OrderStore for PgOrders {
    async fn create(&self, lines: Vec<OrderLine>, total: Money) -> Result<Order> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query(
            r#"
            INSERT INTO orders (total_cents, created_at)
            VALUES ($1, now())
            RETURNING id, created_at
            "#,
        )
        .bind(total.cents())
        .fetch_one(&mut *tx)
        .await?;

        let id = OrderId::new(row.try_get("id")?);
        let created_at: DateTime<Utc> = row.try_get("created_at")?;

        for line in &lines {
            sqlx::query(
                r#"
                INSERT INTO order_lines (order_id, item_id, name, quantity, price_cents)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(id.as_i64())
            .bind(line.item_id.as_i64())
            .bind(&line.name)
            .bind(line.quantity as i64)
            .bind(line.price.cents())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(Order {
            id,
            lines,
            total,
            created_at,
        })
    }

    async fn get(&self, id: OrderId) -> Result<Order> {
        let row = sqlx::query("SELECT id, total_cents, created_at FROM orders WHERE id = $1")
            .bind(id.as_i64())
            .fetch_optional(&self.pool)
            .await?
            .ok_or(OrderError::NotFound(id))?;

        Ok(Order {
            id,
            lines: self.lines_for(id).await?,
            total: Money::from_cents(row.try_get("total_cents")?),
            created_at: row.try_get("created_at")?,
        })
    }

    async fn list(&self) -> Result<Vec<Order>> {
        let rows =
            sqlx::query("SELECT id, total_cents, created_at FROM orders ORDER BY id DESC")
                .fetch_all(&self.pool)
                .await?;

        let mut orders = Vec::with_capacity(rows.len());
        for row in rows {
            let id = OrderId::new(row.try_get("id")?);
            orders.push(Order {
                id,
                lines: self.lines_for(id).await?,
                total: Money::from_cents(row.try_get("total_cents")?),
                created_at: row.try_get("created_at")?,
            });
        }
        Ok(orders)
    }
}
