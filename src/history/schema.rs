// SQLite schema for the bucket store.
//
// A `schema_version` table tracks applied migrations so the layout can
// evolve; bucket payloads themselves are JSON envelopes with their own
// format version.

use anyhow::{Context, Result};
use rusqlite::Connection;

/// Create all tables if they don't exist yet.
///
/// This is idempotent and safe to call on every startup.
pub fn create_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- One row per hourly bucket; payload is the serialized topic list
        CREATE TABLE IF NOT EXISTS topic_buckets (
            bucket_key TEXT PRIMARY KEY,       -- YYYY-MM-DD_HH
            payload TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        INSERT OR IGNORE INTO schema_version (version) VALUES (1);
        ",
    )
    .context("Failed to create bucket tables")?;
    Ok(())
}
