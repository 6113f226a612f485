//! SQLite-based persistence.
//!
//! A single `kv` table holds:
//! - Per-set weight, reps and completion values
//! - The serialized active session used by the CLI

use std::path::Path;

use rusqlite::{params, Connection};
use tracing::warn;

use super::{data_dir, SetStore};
use crate::error::{DatabaseError, Result};

/// SQLite database for set storage.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database at `~/.config/liftlog/liftlog.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self> {
        Self::open_at(&data_dir()?.join("liftlog.db"))
    }

    /// Open (or create) a database file at an explicit path.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    ///
    /// # Errors
    /// Returns an error if SQLite cannot allocate the database.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), rusqlite::Error> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )?;
        Ok(())
    }

    /// Get a value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>, rusqlite::Error> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Set a value in the kv store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), rusqlite::Error> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    /// Remove a key. Returns whether a row was deleted.
    pub fn kv_delete(&self, key: &str) -> Result<bool, rusqlite::Error> {
        let n = self.conn.execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(n > 0)
    }
}

impl SetStore for Database {
    fn get_raw(&self, key: &str) -> Option<String> {
        match self.kv_get(key) {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "kv read failed; treating as absent");
                None
            }
        }
    }

    fn put_raw(&mut self, key: &str, value: &str) -> Result<()> {
        self.kv_set(key, value)?;
        Ok(())
    }
}
