//! Key/value state repository contracts and implementations.
//!
//! # Responsibility
//! - Provide `get`/`set`/`remove` over string values keyed by name.
//! - Offer a SQLite-backed implementation for real persistence and an
//!   in-memory one for tests and throwaway sessions.
//!
//! # Invariants
//! - `set` overwrites any prior value for the key.
//! - Values round-trip byte-for-byte.

use crate::db::DbError;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Well-known key under which the serialized document is stored.
pub const STATE_KEY: &str = "data";

pub type RepoResult<T> = Result<T, RepoError>;

/// Storage transport error. Opaque to the store; passed through unchanged.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted state: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for persisted start page state.
pub trait StateRepository {
    fn get(&self, key: &str) -> RepoResult<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> RepoResult<()>;
    fn remove(&mut self, key: &str) -> RepoResult<()>;
}

impl<R: StateRepository + ?Sized> StateRepository for &mut R {
    fn get(&self, key: &str) -> RepoResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> RepoResult<()> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> RepoResult<()> {
        (**self).remove(key)
    }
}

/// SQLite-backed state repository over the `kv_state` table.
pub struct SqliteStateRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteStateRepository<'conn> {
    /// Wraps a connection returned by `crate::db::open_db*`.
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl StateRepository for SqliteStateRepository<'_> {
    fn get(&self, key: &str) -> RepoResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_state WHERE key = ?1;",
                [key],
                |row| row.get_ref(0).map(|value| value.as_str().map(str::to_owned)),
            )
            .optional()?;

        match value {
            None => Ok(None),
            Some(Ok(text)) => Ok(Some(text)),
            Some(Err(_)) => Err(RepoError::InvalidData(format!(
                "kv_state.value for `{key}` is not text"
            ))),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO kv_state (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> RepoResult<()> {
        self.conn
            .execute("DELETE FROM kv_state WHERE key = ?1;", [key])?;
        Ok(())
    }
}

/// Process-local state repository.
#[derive(Debug, Clone, Default)]
pub struct MemoryStateRepository {
    values: BTreeMap<String, String>,
}

impl MemoryStateRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository pre-seeded with the document string under
    /// [`STATE_KEY`].
    pub fn with_state(value: impl Into<String>) -> Self {
        let mut values = BTreeMap::new();
        values.insert(STATE_KEY.to_string(), value.into());
        Self { values }
    }
}

impl StateRepository for MemoryStateRepository {
    fn get(&self, key: &str) -> RepoResult<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> RepoResult<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> RepoResult<()> {
        self.values.remove(key);
        Ok(())
    }
}
