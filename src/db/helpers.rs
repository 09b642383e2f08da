// src/db/helpers.rs

use crate::db::Database;
use crate::error::PersistenceError;
use rusqlite::Connection;
use std::sync::{Arc, Mutex};

/// Execute a database operation with proper lock handling and error logging.
///
/// # Example
/// ```ignore
/// with_connection(&db, "read progress", |conn| {
///     conn.query_row("SELECT value FROM kv_store WHERE key = ?1", ["dataVersion"], |row| {
///         row.get(0)
///     })
/// })
/// ```
pub fn with_connection<F, T>(
    db: &Arc<Mutex<Database>>,
    operation: &str,
    f: F,
) -> Result<T, PersistenceError>
where
    F: FnOnce(&Connection) -> rusqlite::Result<T>,
{
    let db = db.lock().map_err(|e| {
        log::error!("Failed to acquire database lock to {operation}: {e}");
        PersistenceError::LockPoisoned
    })?;

    f(db.connection()).map_err(|e| {
        log::error!("Failed to {operation}: {e}");
        PersistenceError::from(e)
    })
}
