//! Database module for the coding tracker
//!
//! Provides SQLite storage for coding sessions. No connection is held between
//! calls: every operation opens the file, runs, and drops the connection.

pub mod schema;
pub mod seed;

use crate::error::Result;
use rusqlite::Connection;
use std::path::{Path, PathBuf};

/// Handle to the SQLite file backing the tracker
#[derive(Debug, Clone)]
pub struct Database {
    path: PathBuf,
}

impl Database {
    /// Point at a database file, creating its parent directory if needed.
    /// The file itself is created by SQLite on first connection.
    pub fn new(db_path: PathBuf) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        Ok(Database { path: db_path })
    }

    fn connect(&self) -> Result<Connection> {
        let conn = Connection::open(&self.path)?;
        Ok(conn)
    }

    /// Run `f` on a connection opened for this call only.
    ///
    /// The connection is dropped when `f` returns, on success and on error.
    pub fn with_conn<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> rusqlite::Result<T>,
    {
        let conn = self.connect()?;
        let value = f(&conn)?;
        Ok(value)
    }

    /// Get the database file path
    pub fn path(&self) -> &Path {
        &self.path
    }
}
