//! SQLite-backed slot store.
//!
//! Runtime defaults follow the rest of the crate's SQLite usage:
//! - `journal_mode = WAL` so a reader never blocks on the writer
//! - `busy_timeout = 5s` to ride out a second process holding the lock

use rusqlite::{Connection, OptionalExtension, params};
use std::path::Path;
use std::time::Duration;

use super::{Storage, StoreError, StoreOp};

/// Busy timeout used for slot-store connections.
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const CREATE_KV: &str = "CREATE TABLE IF NOT EXISTS kv (
    key   TEXT PRIMARY KEY NOT NULL,
    value TEXT NOT NULL
)";

/// Slots stored as rows of a single `kv` table.
#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) the database at `path` and ensure the `kv` table.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory cannot be created or the
    /// database cannot be opened or configured.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| StoreError::io(StoreOp::Open, parent, e))?;
        }

        let conn = Connection::open(path).map_err(|e| StoreError::sqlite(StoreOp::Open, e))?;
        configure_connection(&conn).map_err(|e| StoreError::sqlite(StoreOp::Open, e))?;
        Self::with_connection(conn)
    }

    /// Open a private in-memory database.
    ///
    /// # Errors
    ///
    /// Returns an error if SQLite cannot allocate the database.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn =
            Connection::open_in_memory().map_err(|e| StoreError::sqlite(StoreOp::Open, e))?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute(CREATE_KV, [])
            .map_err(|e| StoreError::sqlite(StoreOp::Open, e))?;
        Ok(Self { conn })
    }

    /// All slot keys, sorted.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn keys(&self) -> Result<Vec<String>, StoreError> {
        let read = || -> rusqlite::Result<Vec<String>> {
            let mut stmt = self.conn.prepare("SELECT key FROM kv ORDER BY key")?;
            let rows = stmt.query_map([], |row| row.get(0))?;
            let keys = rows.collect::<rusqlite::Result<Vec<String>>>();
            keys
        };
        read().map_err(|e| StoreError::sqlite(StoreOp::Read, e))
    }
}

fn configure_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.pragma_update(None, "synchronous", "NORMAL")?;
    let _journal_mode: String =
        conn.query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))?;
    conn.busy_timeout(DEFAULT_BUSY_TIMEOUT)?;
    Ok(())
}

impl Storage for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.conn
            .query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()
            .map_err(|e| StoreError::sqlite(StoreOp::Read, e))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.conn
            .execute(
                "INSERT INTO kv (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                params![key, value],
            )
            .map(|_| ())
            .map_err(|e| StoreError::sqlite(StoreOp::Write, e))
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.conn
            .execute("DELETE FROM kv WHERE key = ?1", [key])
            .map(|_| ())
            .map_err(|e| StoreError::sqlite(StoreOp::Remove, e))
    }
}
