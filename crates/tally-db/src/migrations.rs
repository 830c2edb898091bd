//! # Database Migrations
//!
//! The full accounting schema ships inside the binary: every `.sql` file
//! under `migrations/sqlite/` is embedded at compile time via
//! `sqlx::migrate!`, and [`Database::new`](crate::Database::new) applies
//! whatever is still pending on every connect. sqlx tracks applied
//! migrations in its `_sqlx_migrations` bookkeeping table, so reconnecting
//! to an up-to-date ledger database is a no-op.
//!
//! ## Evolving the Schema
//!
//! Add a new `NNN_description.sql` with the next sequence number (e.g.
//! `002_recurring_invoices.sql`). Applied files are checksummed — editing
//! one in place makes existing databases fail validation, so schema
//! changes always go in a fresh file.

use sqlx::SqlitePool;
use tracing::info;

use crate::error::DbResult;

// Paths in migrate! are relative to this crate's Cargo.toml.
static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations/sqlite");

/// Applies any embedded migrations not yet recorded in this database.
///
/// Safe to call on every startup; each pending migration runs in its own
/// transaction, in filename order.
pub async fn run_migrations(pool: &SqlitePool) -> DbResult<()> {
    info!("Checking for pending migrations");

    MIGRATOR.run(pool).await?;

    info!("All migrations applied successfully");
    Ok(())
}

/// Reports `(embedded, applied)` migration counts for health checks.
pub async fn migration_status(pool: &SqlitePool) -> DbResult<(usize, usize)> {
    let total = MIGRATOR.migrations.len();

    let applied: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations")
        .fetch_one(pool)
        .await
        .unwrap_or(0);

    Ok((total, applied as usize))
}
