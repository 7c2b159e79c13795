//! Error types for the coding tracker

use rusqlite::ErrorCode;
use thiserror::Error;

/// Core error type
#[derive(Error, Debug)]
pub enum CoreError {
    /// The database file could not be opened, read or written
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(rusqlite::Error),

    /// A statement was rejected by a table constraint
    #[error("Constraint violation: {0}")]
    ConstraintViolation(rusqlite::Error),

    /// Any other database error
    #[error("Database error: {0}")]
    Database(rusqlite::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Not found error
    #[error("{0} not found: {1}")]
    NotFound(&'static str, String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type alias for Core operations
pub type Result<T> = std::result::Result<T, CoreError>;

impl From<rusqlite::Error> for CoreError {
    fn from(e: rusqlite::Error) -> Self {
        let code = match &e {
            rusqlite::Error::SqliteFailure(err, _) => Some(err.code),
            _ => None,
        };

        match code {
            Some(ErrorCode::ConstraintViolation) => CoreError::ConstraintViolation(e),
            Some(
                ErrorCode::CannotOpen
                | ErrorCode::DatabaseBusy
                | ErrorCode::DatabaseLocked
                | ErrorCode::ReadOnly
                | ErrorCode::SystemIoFailure
                | ErrorCode::DiskFull
                | ErrorCode::NotADatabase
                | ErrorCode::DatabaseCorrupt
                | ErrorCode::PermissionDenied,
            ) => CoreError::StorageUnavailable(e),
            _ => CoreError::Database(e),
        }
    }
}

impl CoreError {
    /// True when the error means the store itself could not be reached,
    /// as opposed to a problem with a single statement or record.
    pub fn is_storage_unavailable(&self) -> bool {
        matches!(self, CoreError::StorageUnavailable(_) | CoreError::Io(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_constraint_violation_is_classified() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute("CREATE TABLE t (v TEXT NOT NULL)", []).unwrap();
        let err = conn
            .execute("INSERT INTO t (v) VALUES (NULL)", [])
            .unwrap_err();

        assert!(matches!(
            CoreError::from(err),
            CoreError::ConstraintViolation(_)
        ));
    }

    #[test]
    fn test_bad_sql_is_plain_database_error() {
        let conn = Connection::open_in_memory().unwrap();
        let err = conn.execute("SELECT * FROM missing_table", []).unwrap_err();

        let core = CoreError::from(err);
        assert!(matches!(core, CoreError::Database(_)));
        assert!(!core.is_storage_unavailable());
    }

    #[test]
    fn test_not_found_message() {
        let err = CoreError::NotFound("Coding session", "42".to_string());
        assert_eq!(err.to_string(), "Coding session not found: 42");
    }
}
