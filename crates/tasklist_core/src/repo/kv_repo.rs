//! Key-value storage contract and adapters.
//!
//! # Responsibility
//! - Define the get/set-by-key contract the task list persists through.
//! - Provide an SQLite-backed adapter and an in-memory adapter.
//!
//! # Invariants
//! - `write` is a full overwrite of the value stored under `key`.
//! - `read` returns the last successfully written value, or `None`.
//! - Adapters are `Send + Sync` so writes can run off the caller thread.

use crate::db::{open_db, open_db_in_memory, DbError};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

pub type KvResult<T> = Result<T, KvError>;

/// Error raised by key-value adapters.
#[derive(Debug)]
pub enum KvError {
    Db(DbError),
    /// A previous holder of the adapter lock panicked.
    LockPoisoned,
    /// Backend refused or could not complete the operation.
    Unavailable(String),
}

impl Display for KvError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::LockPoisoned => write!(f, "key-value store lock poisoned"),
            Self::Unavailable(message) => write!(f, "key-value store unavailable: {message}"),
        }
    }
}

impl Error for KvError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::LockPoisoned => None,
            Self::Unavailable(_) => None,
        }
    }
}

impl From<DbError> for KvError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for KvError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// String-blob storage keyed by name.
pub trait KeyValueStore: Send + Sync {
    fn read(&self, key: &str) -> KvResult<Option<String>>;
    fn write(&self, key: &str, value: &str) -> KvResult<()>;
}

/// SQLite-backed key-value store over the `kv_entries` table.
pub struct SqliteKeyValueStore {
    conn: Mutex<Connection>,
}

impl SqliteKeyValueStore {
    /// Opens (or creates) the database file and applies migrations.
    pub fn open(path: impl AsRef<Path>) -> KvResult<Self> {
        Ok(Self::from_connection(open_db(path)?))
    }

    pub fn open_in_memory() -> KvResult<Self> {
        Ok(Self::from_connection(open_db_in_memory()?))
    }

    /// Wraps an already-migrated connection.
    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    fn conn(&self) -> KvResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| KvError::LockPoisoned)
    }
}

impl KeyValueStore for SqliteKeyValueStore {
    fn read(&self, key: &str) -> KvResult<Option<String>> {
        let conn = self.conn()?;
        let value = conn
            .query_row(
                "SELECT value FROM kv_entries WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn write(&self, key: &str, value: &str) -> KvResult<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO kv_entries (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![key, value],
        )?;
        Ok(())
    }
}

/// Process-local key-value store. Contents vanish with the value.
#[derive(Default)]
pub struct InMemoryKeyValueStore {
    entries: Mutex<HashMap<String, String>>,
}

impl InMemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-seeded with one entry.
    pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        let store = Self::default();
        if let Ok(mut entries) = store.entries.lock() {
            entries.insert(key.into(), value.into());
        }
        store
    }
}

impl KeyValueStore for InMemoryKeyValueStore {
    fn read(&self, key: &str) -> KvResult<Option<String>> {
        let entries = self.entries.lock().map_err(|_| KvError::LockPoisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> KvResult<()> {
        let mut entries = self.entries.lock().map_err(|_| KvError::LockPoisoned)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for std::sync::Arc<T> {
    fn read(&self, key: &str) -> KvResult<Option<String>> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: &str) -> KvResult<()> {
        (**self).write(key, value)
    }
}
