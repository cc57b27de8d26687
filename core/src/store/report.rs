use super::SeedStore;
use crate::{error::SeedResult, types::CustomerId};
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{params, OptionalExtension, Row};
use serde::Serialize;

/// Default page size for recent activity.
pub const RECENT_ACTIVITY_LIMIT: usize = 20;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RecentActivity {
    pub name: String,
    pub order_date: NaiveDate,
    pub total: f64,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CustomerSummary {
    pub customer_id: CustomerId,
    pub name: String,
    pub email: String,
    pub total_orders: i64,
    pub total_spent: f64,
    pub avg_order_value: f64,
    pub last_order_date: Option<NaiveDate>,
}

const SUMMARY_SELECT: &str = "SELECT c.customer_id, c.name, c.email,
        COUNT(o.order_id),
        COALESCE(SUM(o.total), 0.0),
        COALESCE(AVG(o.total), 0.0),
        MAX(o.order_date)
     FROM customers c
     LEFT JOIN orders o ON c.customer_id = o.customer_id";

impl SeedStore {
    // ── Reports ───────────────────────────────────────────────────

    /// A customer's newest orders created at or after `since`.
    pub fn recent_activity(
        &self,
        customer_id: CustomerId,
        since: NaiveDateTime,
        limit: usize,
    ) -> SeedResult<Vec<RecentActivity>> {
        let mut stmt = self.conn.prepare(
            "SELECT c.name, o.order_date, o.total, o.created_at
             FROM customers c
             INNER JOIN orders o ON c.customer_id = o.customer_id
             WHERE o.created_at >= ?1 AND c.customer_id = ?2
             ORDER BY o.created_at DESC
             LIMIT ?3",
        )?;
        let rows = stmt.query_map(params![since, customer_id, limit as i64], |row| {
            Ok(RecentActivity {
                name: row.get(0)?,
                order_date: row.get(1)?,
                total: row.get(2)?,
                created_at: row.get(3)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Order totals for one customer; `None` if the customer doesn't exist.
    pub fn customer_summary(&self, customer_id: CustomerId) -> SeedResult<Option<CustomerSummary>> {
        let sql = format!(
            "{SUMMARY_SELECT}
             WHERE c.customer_id = ?1
             GROUP BY c.customer_id, c.name, c.email"
        );
        let summary = self
            .conn
            .query_row(&sql, params![customer_id], summary_from_row)
            .optional()?;
        Ok(summary)
    }

    /// Customers ranked by total spend, highest first.
    pub fn top_customers(&self, limit: usize) -> SeedResult<Vec<CustomerSummary>> {
        let sql = format!(
            "{SUMMARY_SELECT}
             GROUP BY c.customer_id, c.name, c.email
             ORDER BY 5 DESC, c.customer_id
             LIMIT ?1"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params![limit as i64], summary_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}

fn summary_from_row(row: &Row<'_>) -> rusqlite::Result<CustomerSummary> {
    Ok(CustomerSummary {
        customer_id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        total_orders: row.get(3)?,
        total_spent: row.get(4)?,
        avg_order_value: row.get(5)?,
        last_order_date: row.get(6)?,
    })
}
