use super::SeedStore;
use crate::{customer::CustomerRecord, error::SeedResult, types::CustomerId};
use rusqlite::{params, OptionalExtension, Row};

const CUSTOMER_COLUMNS: &str = "customer_id, name, email, phone, address, city, country";

impl SeedStore {
    // ── Customer ──────────────────────────────────────────────────

    /// Insert a batch in one transaction. Returns rows written.
    pub fn insert_customers(&self, run_id: &str, batch: &[CustomerRecord]) -> SeedResult<usize> {
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO customers (
                    customer_id, run_id, name, email, phone, address, city, country
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            )?;
            for c in batch {
                stmt.execute(params![
                    c.customer_id,
                    run_id,
                    &c.name,
                    &c.email,
                    &c.phone,
                    &c.address,
                    &c.city,
                    &c.country
                ])?;
            }
        }
        tx.commit()?;
        Ok(batch.len())
    }

    pub fn customer_count(&self) -> SeedResult<usize> {
        let n: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM customers", [], |row| row.get(0))?;
        Ok(n as usize)
    }

    pub fn customer_ids(&self) -> SeedResult<Vec<CustomerId>> {
        let mut stmt = self.conn.prepare("SELECT customer_id FROM customers")?;
        let rows = stmt.query_map([], |row| row.get::<_, i64>(0))?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub fn customer_emails(&self) -> SeedResult<Vec<String>> {
        let mut stmt = self.conn.prepare("SELECT email FROM customers")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub fn customer(&self, customer_id: CustomerId) -> SeedResult<Option<CustomerRecord>> {
        let sql = format!("SELECT {CUSTOMER_COLUMNS} FROM customers WHERE customer_id = ?1");
        let record = self
            .conn
            .query_row(&sql, params![customer_id], customer_from_row)
            .optional()?;
        Ok(record)
    }

    pub fn customers(&self) -> SeedResult<Vec<CustomerRecord>> {
        let sql = format!("SELECT {CUSTOMER_COLUMNS} FROM customers ORDER BY customer_id");
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], customer_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}

fn customer_from_row(row: &Row<'_>) -> rusqlite::Result<CustomerRecord> {
    Ok(CustomerRecord {
        customer_id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        phone: row.get(3)?,
        address: row.get(4)?,
        city: row.get(5)?,
        country: row.get(6)?,
    })
}
