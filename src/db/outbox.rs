//! Durable queue of records waiting for remote delivery.
//!
//! Items are delivered in insertion order. A record is identified by its
//! `(kind, record_id)` pair; enqueuing the same record again refreshes its
//! payload instead of adding a second row.

use crate::db::db::Db;
use anyhow::Result;
use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension, Row};

/// Kind of a completed fast waiting to be uploaded.
pub const FAST_COMPLETED: &str = "fast_completed";

#[derive(Debug, Clone, PartialEq)]
pub struct OutboxItem {
    pub id: i64,
    pub kind: String,
    pub record_id: String,
    pub payload: String,
    pub attempts: u32,
    pub last_error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_attempt_at: Option<DateTime<Utc>>,
}

impl OutboxItem {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let created_at: i64 = row.get(6)?;
        let last_attempt_at: Option<i64> = row.get(7)?;
        Ok(Self {
            id: row.get(0)?,
            kind: row.get(1)?,
            record_id: row.get(2)?,
            payload: row.get(3)?,
            attempts: row.get(4)?,
            last_error: row.get(5)?,
            created_at: DateTime::<Utc>::from_timestamp_millis(created_at).unwrap_or_default(),
            last_attempt_at: last_attempt_at.and_then(DateTime::<Utc>::from_timestamp_millis),
        })
    }
}

const SELECT_ITEMS: &str = "SELECT id, kind, record_id, payload, attempts, last_error, created_at, last_attempt_at FROM sync_outbox";

pub struct Outbox {
    db: Db,
}

impl Outbox {
    pub fn new() -> Result<Self> {
        Ok(Self { db: Db::new()? })
    }

    pub fn with_db(db: Db) -> Self {
        Self { db }
    }

    /// Queues a record, or refreshes the payload of one already queued.
    ///
    /// Returns the row id. A refreshed record keeps its place in the queue
    /// and its attempt count.
    pub fn enqueue(&mut self, kind: &str, record_id: &str, payload: &str) -> Result<i64> {
        self.db.conn.execute(
            "INSERT INTO sync_outbox (kind, record_id, payload, created_at)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(kind, record_id) DO UPDATE SET payload = excluded.payload",
            params![kind, record_id, payload, Utc::now().timestamp_millis()],
        )?;
        let id = self.db.conn.query_row(
            "SELECT id FROM sync_outbox WHERE kind = ?1 AND record_id = ?2",
            params![kind, record_id],
            |row| row.get(0),
        )?;
        Ok(id)
    }

    /// Oldest items first, at most `limit` of them.
    pub fn pending(&self, limit: usize) -> Result<Vec<OutboxItem>> {
        let mut stmt = self.db.conn.prepare(&format!("{} ORDER BY id LIMIT ?1", SELECT_ITEMS))?;
        let items = stmt
            .query_map(params![limit as i64], OutboxItem::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(items)
    }

    pub fn get(&self, id: i64) -> Result<Option<OutboxItem>> {
        let item = self
            .db
            .conn
            .query_row(&format!("{} WHERE id = ?1", SELECT_ITEMS), params![id], OutboxItem::from_row)
            .optional()?;
        Ok(item)
    }

    /// Removes a delivered item.
    pub fn mark_delivered(&mut self, id: i64) -> Result<()> {
        self.db.conn.execute("DELETE FROM sync_outbox WHERE id = ?1", params![id])?;
        Ok(())
    }

    /// Records a failed delivery attempt; the item stays queued.
    pub fn mark_failed(&mut self, id: i64, error: &str) -> Result<()> {
        self.db.conn.execute(
            "UPDATE sync_outbox SET attempts = attempts + 1, last_error = ?2, last_attempt_at = ?3 WHERE id = ?1",
            params![id, error, Utc::now().timestamp_millis()],
        )?;
        Ok(())
    }

    pub fn count(&self) -> Result<usize> {
        let count: i64 = self.db.conn.query_row("SELECT COUNT(*) FROM sync_outbox", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    pub fn clear(&mut self) -> Result<usize> {
        let removed = self.db.conn.execute("DELETE FROM sync_outbox", [])?;
        Ok(removed)
    }
}
