//! SQLite schema for the coding tracker

use rusqlite::{Connection, Result};

/// Name of the single session table
pub const TABLE: &str = "codingTracker";

pub(crate) const INSERT_SESSION: &str =
    "INSERT INTO codingTracker (startTime, endTime, duration) VALUES (?1, ?2, ?3)";

/// Initialize the database with the session table. Safe to call repeatedly.
pub fn init_db(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS codingTracker (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            startTime TEXT NOT NULL,
            endTime TEXT NOT NULL,
            duration TEXT NOT NULL DEFAULT '0.00'
        )",
        [],
    )?;

    Ok(())
}

/// Number of rows currently in the session table
pub fn row_count(conn: &Connection) -> Result<i64> {
    conn.query_row("SELECT COUNT(*) FROM codingTracker", [], |row| row.get(0))
}
