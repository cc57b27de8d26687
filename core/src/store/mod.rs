//! SQLite persistence layer.
//!
//! RULE: Only the store talks to the database.
//! The engine and the runner call store methods; they never execute SQL directly.

mod customer;
mod order;
mod report;

pub use report::{CustomerSummary, RecentActivity, RECENT_ACTIVITY_LIMIT};

use crate::error::SeedResult;
use chrono::NaiveDateTime;
use rusqlite::{params, Connection};

pub struct SeedStore {
    conn: Connection,
}

impl SeedStore {
    pub fn open(path: &str) -> SeedResult<Self> {
        let conn = Connection::open_with_flags(
            path,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
                | rusqlite::OpenFlags::SQLITE_OPEN_URI,
        )?;
        // WAL mode only for real files (shared-memory and :memory: ignore it).
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> SeedResult<Self> {
        let conn = Connection::open(":memory:")?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> SeedResult<()> {
        self.conn
            .execute_batch(include_str!("../../../migrations/001_schema.sql"))?;
        Ok(())
    }

    /// Drop every table and rebuild the schema from scratch.
    pub fn recreate(&self) -> SeedResult<()> {
        self.conn.execute_batch(
            "DROP TABLE IF EXISTS orders;
             DROP TABLE IF EXISTS customers;
             DROP TABLE IF EXISTS seed_run;",
        )?;
        log::info!("store: dropped orders, customers and seed_run");
        self.migrate()
    }

    /// Remove all generated rows, orders first. Returns (customers, orders) deleted.
    pub fn delete_all(&self) -> SeedResult<(usize, usize)> {
        let tx = self.conn.unchecked_transaction()?;
        let orders = tx.execute("DELETE FROM orders", [])?;
        let customers = tx.execute("DELETE FROM customers", [])?;
        tx.execute("DELETE FROM seed_run", [])?;
        tx.commit()?;
        Ok((customers, orders))
    }

    // ── Run ────────────────────────────────────────────────────

    pub fn insert_run(
        &self,
        run_id: &str,
        seed: u64,
        version: &str,
        started_at: NaiveDateTime,
    ) -> SeedResult<()> {
        self.conn.execute(
            "INSERT INTO seed_run (run_id, seed, version, started_at) VALUES (?1, ?2, ?3, ?4)",
            params![run_id, seed as i64, version, started_at],
        )?;
        Ok(())
    }

    pub fn run_count(&self) -> SeedResult<usize> {
        let n: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM seed_run", [], |row| row.get(0))?;
        Ok(n as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn started() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 1)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap()
    }

    #[test]
    fn migrate_is_repeatable() {
        let store = SeedStore::in_memory().unwrap();
        store.migrate().unwrap();
        store.migrate().unwrap();
        assert_eq!(store.run_count().unwrap(), 0);
    }

    #[test]
    fn recreate_clears_runs() {
        let store = SeedStore::in_memory().unwrap();
        store.migrate().unwrap();
        store.insert_run("r1", 42, "0.1.0", started()).unwrap();
        assert_eq!(store.run_count().unwrap(), 1);
        store.recreate().unwrap();
        assert_eq!(store.run_count().unwrap(), 0);
    }
}
