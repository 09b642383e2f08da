pub mod helpers;
pub mod kv_store;
pub mod migrations;
pub mod schema;
pub use helpers::with_connection;
pub use kv_store::KeyValueStore;

use rusqlite::{Connection, Result};
use std::path::Path;

pub struct Database {
    conn: Connection,
}

impl Database {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        Ok(Self { conn })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}
