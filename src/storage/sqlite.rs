/// SQLite implementation of the key-value storage interface
///
/// Blobs live in a single kv_entries table. This mirrors what the device
/// key-value stores this app targets actually are under the hood: a SQLite
/// table of string pairs.

use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, PoisonError};
use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};

use crate::storage::{KeyValueStorage, StorageError};

/// SQLite-based storage implementation
///
/// The connection sits behind a mutex so the storage handle can be shared
/// across the stores and their background writers. Every operation is a
/// single short statement; nothing holds the lock across an await.
pub struct SqliteStorage {
    conn: Mutex<Connection>,
}

impl SqliteStorage {
    /// Open (or create) the database file and ensure the schema exists
    pub fn open(db_path: PathBuf) -> Result<Self, StorageError> {
        let conn = Connection::open(&db_path)
            .map_err(|e| StorageError::Connection(format!("Failed to open database: {}", e)))?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS kv_entries (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )",
            [],
        )?;

        tracing::info!("SQLite key-value storage initialized at: {:?}", db_path);

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Lock the connection, recovering the guard if a previous holder panicked
    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl KeyValueStorage for SqliteStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let conn = self.conn();
        let mut stmt = conn.prepare("SELECT value FROM kv_entries WHERE key = ?1")?;
        let value = stmt
            .query_row(params![key], |row| row.get::<_, String>(0))
            .optional()?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let conn = self.conn();
        conn.execute(
            "INSERT OR REPLACE INTO kv_entries (key, value, updated_at) VALUES (?1, ?2, ?3)",
            params![key, value, Utc::now().to_rfc3339()],
        )?;
        tracing::debug!("Stored {} bytes under key: {}", value.len(), key);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let conn = self.conn();
        conn.execute("DELETE FROM kv_entries WHERE key = ?1", params![key])?;
        tracing::debug!("Removed key: {}", key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_set_get_remove_round_trip() {
        let dir = tempdir().unwrap();
        let storage = SqliteStorage::open(dir.path().join("kv.db")).unwrap();

        assert_eq!(storage.get("habits").await.unwrap(), None);

        storage.set("habits", "[]").await.unwrap();
        assert_eq!(storage.get("habits").await.unwrap().as_deref(), Some("[]"));

        storage.set("habits", "[1]").await.unwrap(); // Overwrites
        assert_eq!(storage.get("habits").await.unwrap().as_deref(), Some("[1]"));

        storage.remove("habits").await.unwrap();
        assert_eq!(storage.get("habits").await.unwrap(), None);

        // Removing an absent key is not an error
        storage.remove("habits").await.unwrap();
    }

    #[tokio::test]
    async fn test_values_survive_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("kv.db");

        {
            let storage = SqliteStorage::open(path.clone()).unwrap();
            storage.set("habits_version", "1.0").await.unwrap();
        }

        let storage = SqliteStorage::open(path).unwrap();
        assert_eq!(
            storage.get("habits_version").await.unwrap().as_deref(),
            Some("1.0")
        );
    }
}
