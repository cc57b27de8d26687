use super::SeedStore;
use crate::{
    error::SeedResult,
    order::{OrderRecord, OrderStatus, PaymentMethod},
    types::{CustomerId, OrderId},
};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rusqlite::{params, Row};

const ORDER_COLUMNS: &str =
    "order_id, customer_id, order_date, total, status, shipping_address, payment_method, created_at";

impl ToSql for OrderStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for OrderStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

impl ToSql for PaymentMethod {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for PaymentMethod {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

impl SeedStore {
    // ── Order ─────────────────────────────────────────────────────

    /// Insert a batch in one transaction. Returns rows written.
    pub fn insert_orders(&self, run_id: &str, batch: &[OrderRecord]) -> SeedResult<usize> {
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO orders (
                    order_id, run_id, customer_id, order_date, total, status,
                    shipping_address, payment_method, created_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            )?;
            for o in batch {
                stmt.execute(params![
                    o.order_id,
                    run_id,
                    o.customer_id,
                    o.order_date,
                    o.total,
                    o.status,
                    &o.shipping_address,
                    o.payment_method,
                    o.created_at
                ])?;
            }
        }
        tx.commit()?;
        Ok(batch.len())
    }

    pub fn order_count(&self) -> SeedResult<usize> {
        let n: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM orders", [], |row| row.get(0))?;
        Ok(n as usize)
    }

    pub fn order_ids(&self) -> SeedResult<Vec<OrderId>> {
        let mut stmt = self.conn.prepare("SELECT order_id FROM orders")?;
        let rows = stmt.query_map([], |row| row.get::<_, i64>(0))?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub fn orders(&self) -> SeedResult<Vec<OrderRecord>> {
        let sql = format!("SELECT {ORDER_COLUMNS} FROM orders ORDER BY created_at, order_id");
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], order_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub fn orders_for_customer(&self, customer_id: CustomerId) -> SeedResult<Vec<OrderRecord>> {
        let sql = format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE customer_id = ?1 ORDER BY created_at DESC"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params![customer_id], order_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}

fn order_from_row(row: &Row<'_>) -> rusqlite::Result<OrderRecord> {
    Ok(OrderRecord {
        order_id: row.get(0)?,
        customer_id: row.get(1)?,
        order_date: row.get(2)?,
        total: row.get(3)?,
        status: row.get(4)?,
        shipping_address: row.get(5)?,
        payment_method: row.get(6)?,
        created_at: row.get(7)?,
    })
}
