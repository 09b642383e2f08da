use rusqlite::{Connection, Result};
use super::schema::SCHEMA;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)?;
    Ok(())
}
