use super::{with_connection, Database};
use crate::error::PersistenceError;
use rusqlite::{params, OptionalExtension};
use std::sync::{Arc, Mutex};

/// String key-value storage backed by the `kv_store` table.
///
/// Cloning is cheap and every clone shares the same connection.
#[derive(Clone)]
pub struct KeyValueStore {
    db: Arc<Mutex<Database>>,
}

impl KeyValueStore {
    pub fn new(db: Arc<Mutex<Database>>) -> Self {
        Self { db }
    }

    pub fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        with_connection(&self.db, "read key-value entry", |conn| {
            conn.query_row(
                "SELECT value FROM kv_store WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
        })
    }

    pub fn set(&self, key: &str, value: &str) -> Result<(), PersistenceError> {
        with_connection(&self.db, "write key-value entry", |conn| {
            conn.execute(
                "INSERT INTO kv_store (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                params![key, value],
            )
            .map(|_| ())
        })
    }

    /// Returns true if a value was removed.
    pub fn remove(&self, key: &str) -> Result<bool, PersistenceError> {
        with_connection(&self.db, "remove key-value entry", |conn| {
            conn.execute("DELETE FROM kv_store WHERE key = ?1", params![key])
                .map(|changed| changed > 0)
        })
    }

    #[cfg(test)]
    pub(crate) fn database(&self) -> &Arc<Mutex<Database>> {
        &self.db
    }
}
