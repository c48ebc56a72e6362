//! Database schema migration management.
//!
//! Every connection opened through [`crate::db::db::Db`] runs the pending
//! migrations before it is handed out, so callers can assume the latest
//! schema.
//!
//! ## Features
//!
//! - **Version Tracking**: Applied migrations are recorded in a `migrations` table
//! - **Automatic Application**: Pending migrations run when the database is opened
//! - **Transaction Safety**: All pending migrations are applied in one transaction
//!
//! ## Usage
//!
//! ```rust
//! use fastline::db::migrations::MigrationManager;
//! use rusqlite::Connection;
//!
//! let mut conn = Connection::open_in_memory()?;
//! let manager = MigrationManager::new();
//! manager.run_migrations(&mut conn)?;
//! assert!(manager.is_migration_applied(&conn, 1)?);
//! # Ok::<(), anyhow::Error>(())
//! ```

use crate::libs::messages::Message;
use crate::{msg_debug, msg_error};
use anyhow::Result;
use rusqlite::{params, Connection, Transaction};

/// SQL schema for the migrations tracking table.
const MIGRATIONS_TABLE: &str = "
CREATE TABLE IF NOT EXISTS migrations (
    id INTEGER PRIMARY KEY,
    version INTEGER NOT NULL UNIQUE,
    name TEXT NOT NULL,
    applied_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
)";

/// A single schema change.
#[derive(Debug, Clone)]
struct Migration {
    /// Unique version number for ordering and tracking
    version: u32,
    /// Human-readable name describing the migration's purpose
    name: &'static str,
    /// Applies the schema change inside the migration transaction
    up: fn(&Transaction) -> Result<()>,
}

/// Registry of all migrations, applied in version order.
///
/// ## Migration Lifecycle
///
/// 1. **Registration**: [`MigrationManager::new`] registers every known migration
/// 2. **Version Check**: the highest version in the `migrations` table is read
/// 3. **Application**: migrations above that version run in one transaction
/// 4. **Recording**: each applied migration gets a row in `migrations`
///
/// ## Version Rules
///
/// - Versions are unique and increase by one per release that changes the schema
/// - A migration is never edited once released; fixes come as a new version
/// - There are no down migrations
pub struct MigrationManager {
    migrations: Vec<Migration>,
}

impl MigrationManager {
    /// Creates a manager with every known migration registered.
    pub fn new() -> Self {
        let mut manager = Self { migrations: Vec::new() };
        manager.register_migrations();
        manager
    }

    /// Registers all database migrations in chronological order.
    ///
    /// Migrations are forward-only: a released migration is never edited,
    /// schema changes always come as a new version.
    fn register_migrations(&mut self) {
        // Version 1: queue of records waiting for remote delivery
        self.add_migration(1, "create_sync_outbox", |tx| {
            tx.execute(
                "CREATE TABLE IF NOT EXISTS sync_outbox (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    kind TEXT NOT NULL,
                    record_id TEXT NOT NULL,
                    payload TEXT NOT NULL,
                    attempts INTEGER NOT NULL DEFAULT 0,
                    last_error TEXT,
                    created_at INTEGER NOT NULL,
                    UNIQUE (kind, record_id)
                )",
                [],
            )?;
            Ok(())
        });

        // Version 2: remember when delivery was last tried
        self.add_migration(2, "add_outbox_last_attempt", |tx| {
            tx.execute("ALTER TABLE sync_outbox ADD COLUMN last_attempt_at INTEGER", [])?;
            tx.execute("CREATE INDEX IF NOT EXISTS idx_sync_outbox_created_at ON sync_outbox(created_at)", [])?;
            Ok(())
        });
    }

    /// Adds a migration to the registry. Versions must be registered in order.
    fn add_migration(&mut self, version: u32, name: &'static str, up: fn(&Transaction) -> Result<()>) {
        self.migrations.push(Migration { version, name, up });
    }

    /// Executes all pending migrations in version order.
    ///
    /// The pending set is applied in a single transaction: if any migration
    /// fails, none of them are recorded and the schema is left untouched.
    ///
    /// # Arguments
    ///
    /// * `conn` - Connection to migrate; mutable because a transaction is opened on it
    ///
    /// # Errors
    ///
    /// Returns the first error raised by a migration or by the bookkeeping
    /// queries. The failing migration is also reported with `msg_error!`.
    pub fn run_migrations(&self, conn: &mut Connection) -> Result<()> {
        conn.execute(MIGRATIONS_TABLE, [])?;

        let current_version = self.get_current_version(conn)?;
        let pending: Vec<&Migration> = self.migrations.iter().filter(|m| m.version > current_version).collect();

        if pending.is_empty() {
            msg_debug!("Database is up to date");
            return Ok(());
        }

        msg_debug!(Message::MigrationsFound(pending.len()));

        let tx = conn.transaction()?;
        for migration in pending {
            msg_debug!(Message::RunningMigration(migration.version, migration.name.to_string()));

            match (migration.up)(&tx) {
                Ok(()) => {
                    tx.execute(
                        "INSERT INTO migrations (version, name) VALUES (?1, ?2)",
                        params![migration.version, migration.name],
                    )?;
                }
                Err(e) => {
                    msg_error!(Message::MigrationFailed(migration.version, e.to_string()));
                    return Err(e);
                }
            }
        }
        tx.commit()?;
        msg_debug!(Message::DatabaseMigrated(self.latest_version()));

        Ok(())
    }

    /// Highest applied version, or 0 on a fresh database.
    ///
    /// Expects the `migrations` table to exist, which [`run_migrations`](Self::run_migrations)
    /// guarantees.
    pub fn get_current_version(&self, conn: &Connection) -> Result<u32> {
        let version: Option<u32> = conn.query_row("SELECT MAX(version) FROM migrations", [], |row| row.get(0))?;
        Ok(version.unwrap_or(0))
    }

    /// Version the schema reaches once every registered migration has run.
    pub fn latest_version(&self) -> u32 {
        self.migrations.iter().map(|m| m.version).max().unwrap_or(0)
    }

    /// Whether the migration with `version` is recorded as applied.
    pub fn is_migration_applied(&self, conn: &Connection, version: u32) -> Result<bool> {
        let count: i32 = conn.query_row("SELECT COUNT(*) FROM migrations WHERE version = ?1", params![version], |row| row.get(0))?;
        Ok(count > 0)
    }
}

impl Default for MigrationManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrations_apply_once() {
        let mut conn = Connection::open_in_memory().unwrap();
        let manager = MigrationManager::new();

        manager.run_migrations(&mut conn).unwrap();
        assert_eq!(manager.get_current_version(&conn).unwrap(), manager.latest_version());

        manager.run_migrations(&mut conn).unwrap();
        let applied: i32 = conn.query_row("SELECT COUNT(*) FROM migrations", [], |row| row.get(0)).unwrap();
        assert_eq!(applied as u32, manager.latest_version());
        assert!(manager.is_migration_applied(&conn, 2).unwrap());
    }
}
