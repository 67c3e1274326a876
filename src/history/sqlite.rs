// SqliteBucketStore: rusqlite backend implementing the BucketStore trait.
//
// The Connection lives behind a std Mutex: the engine is synchronous and
// each operation is a single statement, so the lock is held only briefly.
// A single-statement upsert makes every write atomic.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use anyhow::{anyhow, Context, Result};
use rusqlite::{params, Connection, OptionalExtension};

use super::schema;
use super::traits::BucketStore;

pub struct SqliteBucketStore {
    conn: Mutex<Connection>,
}

impl SqliteBucketStore {
    /// Open (or create) the database at `db_path` and run migrations.
    pub fn open(db_path: &str) -> Result<Self> {
        if let Some(parent) = Path::new(db_path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create directory for database: {}", db_path)
                })?;
            }
        }

        let conn = Connection::open(db_path)
            .with_context(|| format!("Failed to open database at {}", db_path))?;

        // WAL lets a status query read while an analysis run writes
        conn.pragma_update(None, "journal_mode", "WAL")?;

        Self::new(conn)
    }

    /// Wrap an already-opened Connection, creating tables if needed.
    pub fn new(conn: Connection) -> Result<Self> {
        schema::create_tables(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| anyhow!("bucket database lock poisoned"))
    }
}

impl BucketStore for SqliteBucketStore {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn get(&self, key: &str) -> Result<Option<String>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT payload FROM topic_buckets WHERE bucket_key = ?1")?;
        let payload = stmt
            .query_row(params![key], |row| row.get(0))
            .optional()?;
        Ok(payload)
    }

    fn put(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO topic_buckets (bucket_key, payload, updated_at)
             VALUES (?1, ?2, datetime('now'))
             ON CONFLICT(bucket_key) DO UPDATE SET
                payload = ?2,
                updated_at = datetime('now')",
            params![key, value],
        )?;
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<bool> {
        let conn = self.lock()?;
        let removed = conn.execute(
            "DELETE FROM topic_buckets WHERE bucket_key = ?1",
            params![key],
        )?;
        Ok(removed > 0)
    }

    fn keys(&self) -> Result<Vec<String>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT bucket_key FROM topic_buckets ORDER BY bucket_key")?;
        let keys = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> SqliteBucketStore {
        SqliteBucketStore::new(Connection::open_in_memory().unwrap()).unwrap()
    }

    #[test]
    fn upsert_replaces_payload() {
        let s = store();
        s.put("2024-05-01_10", "[1]").unwrap();
        s.put("2024-05-01_10", "[2]").unwrap();
        assert_eq!(s.get("2024-05-01_10").unwrap().as_deref(), Some("[2]"));
        assert_eq!(s.keys().unwrap().len(), 1);
    }

    #[test]
    fn missing_key_is_none() {
        assert_eq!(store().get("2024-05-01_10").unwrap(), None);
    }

    #[test]
    fn delete_and_keys() {
        let s = store();
        s.put("2024-05-01_11", "[]").unwrap();
        s.put("2024-05-01_09", "[]").unwrap();
        assert_eq!(s.keys().unwrap(), vec!["2024-05-01_09", "2024-05-01_11"]);
        assert!(s.delete("2024-05-01_09").unwrap());
        assert!(!s.delete("2024-05-01_09").unwrap());
        assert_eq!(s.keys().unwrap(), vec!["2024-05-01_11"]);
    }
}
