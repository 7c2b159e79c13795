//! SessionStore — sole gateway to the persisted session table.
//!
//! Every operation opens its own connection through [`Database::with_conn`],
//! runs one parameterized statement, and releases the connection before
//! returning. Failures are logged where they happen and returned to the caller,
//! so "no matching data" (`Ok(None)`, `Ok(0)`, an empty list) stays distinct
//! from "the operation failed".

use crate::config::SeedConfig;
use crate::db::schema::{self, INSERT_SESSION};
use crate::db::{seed, Database};
use crate::error::Result;
use crate::models::{format_timestamp, parse_timestamp, Filter, Session, Stats};
use rusqlite::{params, Row};

const SELECT_SESSIONS: &str = "SELECT id, startTime, endTime, duration FROM codingTracker";

const SUM_DURATION: &str = "SELECT printf('%.2f', COALESCE(SUM(duration), 0)), COUNT(*) FROM codingTracker";

const RANGE_CLAUSE: &str =
    " WHERE DATETIME(startTime) >= DATETIME(?1) AND DATETIME(endTime) <= DATETIME(?2)";

/// Data-access object over the coding session table
#[derive(Debug, Clone)]
pub struct SessionStore {
    db: Database,
}

impl SessionStore {
    /// Create the session table if needed and, when it is empty and seeding is
    /// enabled, fill it with synthetic sessions.
    pub fn new(db: Database, seed_config: &SeedConfig) -> Result<Self> {
        let seeded = db
            .with_conn(|conn| {
                schema::init_db(conn)?;

                if !seed_config.enabled || schema::row_count(conn)? > 0 {
                    return Ok(0);
                }
                seed::seed_sessions(conn, &mut rand::thread_rng(), seed_config.sessions)
            })
            .inspect_err(|e| tracing::error!("Unable to create coding tracker database. {}", e))?;

        if seeded > 0 {
            tracing::info!(
                "Seeded {} with {} demonstration sessions",
                db.path().display(),
                seeded
            );
        }

        Ok(SessionStore { db })
    }

    /// Get the underlying database handle
    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Insert a session. Returns the number of rows inserted.
    pub fn insert(&self, session: &Session) -> Result<usize> {
        self.insert_row(session).map(|(rows, _)| rows)
    }

    /// Insert a session and return the id SQLite assigned to it
    pub fn insert_returning_id(&self, session: &Session) -> Result<i64> {
        self.insert_row(session).map(|(_, id)| id)
    }

    fn insert_row(&self, session: &Session) -> Result<(usize, i64)> {
        let (rows, id) = self
            .db
            .with_conn(|conn| {
                let rows = conn.execute(
                    INSERT_SESSION,
                    params![session.start_text(), session.end_text(), session.duration],
                )?;
                Ok((rows, conn.last_insert_rowid()))
            })
            .inspect_err(|e| tracing::error!("Unable to insert into database. {}", e))?;

        tracing::info!("{} row(s) inserted.", rows);
        Ok((rows, id))
    }

    /// Fetch a session by id. `Ok(None)` when no row has that id.
    pub fn get_by_id(&self, id: i64) -> Result<Option<Session>> {
        self.db
            .with_conn(|conn| {
                let sql = format!("{} WHERE id = ?1", SELECT_SESSIONS);
                match conn.query_row(&sql, params![id], session_from_row) {
                    Ok(session) => Ok(Some(session)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e),
                }
            })
            .inspect_err(|e| {
                tracing::error!(
                    "Unable to retrieve coding session record with ID: {}. {}",
                    id,
                    e
                )
            })
    }

    /// List sessions in storage order, narrowed to the filter's range when it has one
    pub fn list(&self, filter: Option<&Filter>) -> Result<Vec<Session>> {
        let bounds = match filter {
            Some(filter) => filter.bounds()?,
            None => None,
        };

        self.db
            .with_conn(|conn| match bounds {
                Some((start, end)) => {
                    let sql = format!("{}{} ORDER BY id", SELECT_SESSIONS, RANGE_CLAUSE);
                    let mut stmt = conn.prepare(&sql)?;
                    let rows = stmt.query_map(
                        params![format_timestamp(&start), format_timestamp(&end)],
                        session_from_row,
                    )?;
                    rows.collect::<rusqlite::Result<Vec<_>>>()
                }
                None => {
                    let sql = format!("{} ORDER BY id", SELECT_SESSIONS);
                    let mut stmt = conn.prepare(&sql)?;
                    let rows = stmt.query_map([], session_from_row)?;
                    rows.collect::<rusqlite::Result<Vec<_>>>()
                }
            })
            .inspect_err(|e| tracing::error!("Unable to retrieve all coding session records. {}", e))
    }

    /// Total hours and record count over all sessions, or over the filter's range
    pub fn sum_duration(&self, filter: &Filter) -> Result<Stats> {
        let bounds = filter.bounds()?;

        self.db
            .with_conn(|conn| match bounds {
                Some((start, end)) => conn.query_row(
                    &format!("{}{}", SUM_DURATION, RANGE_CLAUSE),
                    params![format_timestamp(&start), format_timestamp(&end)],
                    stats_from_row,
                ),
                None => conn.query_row(SUM_DURATION, [], stats_from_row),
            })
            .inspect_err(|e| tracing::error!("Unable to sum coding session durations. {}", e))
    }

    /// Overwrite start, end and duration of the row with `session.id`.
    /// Returns the number of rows updated, 0 when the id does not exist.
    pub fn update(&self, session: &Session) -> Result<usize> {
        let updated = self
            .db
            .with_conn(|conn| {
                conn.execute(
                    "UPDATE codingTracker SET startTime = ?1, endTime = ?2, duration = ?3 WHERE id = ?4",
                    params![
                        session.start_text(),
                        session.end_text(),
                        session.duration,
                        session.id
                    ],
                )
            })
            .inspect_err(|e| {
                tracing::error!(
                    "Unable to update coding session record with ID: {}. {}",
                    session.id,
                    e
                )
            })?;

        tracing::info!("{} row(s) updated.", updated);
        Ok(updated)
    }

    /// Delete a session. Returns the number of rows deleted, 0 when the id does not exist.
    pub fn delete(&self, id: i64) -> Result<usize> {
        let deleted = self
            .db
            .with_conn(|conn| conn.execute("DELETE FROM codingTracker WHERE id = ?1", params![id]))
            .inspect_err(|e| {
                tracing::error!("Unable to delete coding session record with ID: {}. {}", id, e)
            })?;

        tracing::info!("{} row(s) deleted.", deleted);
        Ok(deleted)
    }

    /// Total number of sessions
    pub fn count(&self) -> Result<i64> {
        self.db
            .with_conn(schema::row_count)
            .inspect_err(|e| tracing::error!("Unable to count coding session records. {}", e))
    }
}

fn session_from_row(row: &Row<'_>) -> rusqlite::Result<Session> {
    Ok(Session {
        id: row.get(0)?,
        start_time: timestamp_column(row, 1)?,
        end_time: timestamp_column(row, 2)?,
        duration: row.get(3)?,
    })
}

fn stats_from_row(row: &Row<'_>) -> rusqlite::Result<Stats> {
    Ok(Stats {
        total_hours: row.get(0)?,
        record_count: row.get(1)?,
    })
}

fn timestamp_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<chrono::NaiveDateTime> {
    let text: String = row.get(idx)?;
    parse_timestamp(&text).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}
