//! Command dispatch and console rendering for the `coding-tracker` binary

use crate::error::{CoreError, Result};
use crate::models::{parse_timestamp, Filter, Session, Stats};
use crate::store::SessionStore;
use chrono::NaiveDateTime;
use clap::Subcommand;
use std::io::Write;

/// One subcommand per store operation
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Record a coding session
    Add {
        /// Start time (YYYY-MM-DD HH:MM[:SS])
        #[arg(long)]
        start: String,
        /// End time (YYYY-MM-DD HH:MM[:SS])
        #[arg(long)]
        end: String,
    },
    /// Show a single session
    Get { id: i64 },
    /// List sessions, optionally within a date range
    List {
        #[command(flatten)]
        range: RangeArgs,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Total hours and number of sessions, optionally within a date range
    Stats {
        #[command(flatten)]
        range: RangeArgs,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Change the start and/or end of a session
    Update {
        id: i64,
        #[arg(long)]
        start: Option<String>,
        #[arg(long)]
        end: Option<String>,
    },
    /// Delete a session
    Delete { id: i64 },
    /// Number of recorded sessions
    Count,
}

/// Date range shared by `list` and `stats`
#[derive(clap::Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct RangeArgs {
    /// Only sessions starting at or after this time
    #[arg(long, requires = "to")]
    pub from: Option<String>,
    /// Only sessions ending at or before this time
    #[arg(long, requires = "from")]
    pub to: Option<String>,
}

impl RangeArgs {
    pub fn to_filter(&self) -> Result<Filter> {
        Ok(Filter {
            start: self.from.as_deref().map(parse_timestamp).transpose()?,
            end: self.to.as_deref().map(parse_timestamp).transpose()?,
        })
    }
}

/// Run `command` against `store`, writing human-readable output to `out`
pub fn run<W: Write>(store: &SessionStore, command: Command, out: &mut W) -> Result<()> {
    match command {
        Command::Add { start, end } => {
            let session = checked_session(0, parse_timestamp(&start)?, parse_timestamp(&end)?)?;
            let id = store.insert_returning_id(&session)?;
            writeln!(out, "Added session {} ({} hours)", id, session.duration)?;
        }
        Command::Get { id } => {
            let session = require(store, id)?;
            render_sessions(out, std::slice::from_ref(&session))?;
        }
        Command::List { range, json } => {
            let sessions = store.list(Some(&range.to_filter()?))?;
            if json {
                writeln!(out, "{}", serde_json::to_string_pretty(&sessions)?)?;
            } else if sessions.is_empty() {
                writeln!(out, "No coding sessions found.")?;
            } else {
                render_sessions(out, &sessions)?;
            }
        }
        Command::Stats { range, json } => {
            let stats = store.sum_duration(&range.to_filter()?)?;
            if json {
                writeln!(out, "{}", serde_json::to_string_pretty(&stats)?)?;
            } else {
                render_stats(out, &stats)?;
            }
        }
        Command::Update { id, start, end } => {
            let existing = require(store, id)?;
            let start = match start {
                Some(s) => parse_timestamp(&s)?,
                None => existing.start_time,
            };
            let end = match end {
                Some(s) => parse_timestamp(&s)?,
                None => existing.end_time,
            };
            let updated = store.update(&checked_session(id, start, end)?)?;
            writeln!(out, "{} row(s) updated.", updated)?;
        }
        Command::Delete { id } => {
            let deleted = store.delete(id)?;
            writeln!(out, "{} row(s) deleted.", deleted)?;
        }
        Command::Count => {
            writeln!(out, "{}", store.count()?)?;
        }
    }

    Ok(())
}

fn require(store: &SessionStore, id: i64) -> Result<Session> {
    store
        .get_by_id(id)?
        .ok_or_else(|| CoreError::NotFound("Coding session", id.to_string()))
}

fn checked_session(id: i64, start: NaiveDateTime, end: NaiveDateTime) -> Result<Session> {
    if end < start {
        return Err(CoreError::Validation(format!(
            "end time {} is before start time {}",
            end, start
        )));
    }
    Ok(Session::with_id(id, start, end))
}

fn render_sessions<W: Write>(out: &mut W, sessions: &[Session]) -> Result<()> {
    writeln!(
        out,
        "{:>5}  {:<19}  {:<19}  {:>8}",
        "ID", "Start", "End", "Hours"
    )?;
    for session in sessions {
        writeln!(
            out,
            "{:>5}  {:<19}  {:<19}  {:>8}",
            session.id,
            session.start_text(),
            session.end_text(),
            session.duration
        )?;
    }
    Ok(())
}

fn render_stats<W: Write>(out: &mut W, stats: &Stats) -> Result<()> {
    writeln!(out, "Total hours: {}", stats.total_hours)?;
    writeln!(out, "Sessions:    {}", stats.record_count)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SeedConfig;
    use crate::db::Database;
    use tempfile::TempDir;

    fn store() -> (TempDir, SessionStore) {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(dir.path().join("cli.db")).unwrap();
        let store = SessionStore::new(db, &SeedConfig::disabled()).unwrap();
        (dir, store)
    }

    fn run_to_string(store: &SessionStore, command: Command) -> Result<String> {
        let mut out = Vec::new();
        run(store, command, &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    fn add(store: &SessionStore, start: &str, end: &str) -> String {
        run_to_string(
            store,
            Command::Add {
                start: start.to_string(),
                end: end.to_string(),
            },
        )
        .unwrap()
    }

    #[test]
    fn test_add_and_stats() {
        let (_dir, store) = store();
        let output = add(&store, "2024-01-01 09:00", "2024-01-01 11:00");
        assert!(output.contains("2.00 hours"));

        let output = run_to_string(
            &store,
            Command::Stats {
                range: RangeArgs {
                    from: Some("2024-01-01".to_string()),
                    to: Some("2024-01-02".to_string()),
                },
                json: false,
            },
        )
        .unwrap();
        assert!(output.contains("Total hours: 2.00"));
        assert!(output.contains("Sessions:    1"));
    }

    #[test]
    fn test_add_rejects_end_before_start() {
        let (_dir, store) = store();
        let result = run_to_string(
            &store,
            Command::Add {
                start: "2024-01-01 11:00".to_string(),
                end: "2024-01-01 09:00".to_string(),
            },
        );
        assert!(matches!(result, Err(CoreError::Validation(_))));
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn test_update_keeps_missing_fields() {
        let (_dir, store) = store();
        add(&store, "2024-01-01 09:00", "2024-01-01 10:00");
        let id = store.list(None).unwrap()[0].id;

        run_to_string(
            &store,
            Command::Update {
                id,
                start: None,
                end: Some("2024-01-01 12:00".to_string()),
            },
        )
        .unwrap();

        let session = store.get_by_id(id).unwrap().unwrap();
        assert_eq!(session.start_text(), "2024-01-01 09:00:00");
        assert_eq!(session.duration, "3.00");
    }

    #[test]
    fn test_missing_ids_are_not_found() {
        let (_dir, store) = store();
        for command in [
            Command::Get { id: 7 },
            Command::Update {
                id: 7,
                start: None,
                end: None,
            },
        ] {
            assert!(matches!(
                run_to_string(&store, command),
                Err(CoreError::NotFound(_, _))
            ));
        }
    }

    #[test]
    fn test_delete_missing_id_reports_zero_rows() {
        let (_dir, store) = store();
        let output = run_to_string(&store, Command::Delete { id: 9 }).unwrap();
        assert_eq!(output.trim(), "0 row(s) deleted.");
    }

    #[test]
    fn test_delete_existing_id_reports_one_row() {
        let (_dir, store) = store();
        add(&store, "2024-01-01 09:00", "2024-01-01 10:00");
        let id = store.list(None).unwrap()[0].id;

        let output = run_to_string(&store, Command::Delete { id }).unwrap();
        assert_eq!(output.trim(), "1 row(s) deleted.");
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn test_list_json() {
        let (_dir, store) = store();
        add(&store, "2024-01-01 09:00", "2024-01-01 10:00");

        let output = run_to_string(
            &store,
            Command::List {
                range: RangeArgs::default(),
                json: true,
            },
        )
        .unwrap();
        let sessions: Vec<Session> = serde_json::from_str(&output).unwrap();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].duration, "1.00");
    }

    #[test]
    fn test_list_empty_and_count() {
        let (_dir, store) = store();
        let output = run_to_string(
            &store,
            Command::List {
                range: RangeArgs::default(),
                json: false,
            },
        )
        .unwrap();
        assert!(output.contains("No coding sessions found."));
        assert_eq!(run_to_string(&store, Command::Count).unwrap().trim(), "0");
    }

    #[test]
    fn test_bad_timestamp_is_validation_error() {
        let (_dir, store) = store();
        let range = RangeArgs {
            from: Some("last week".to_string()),
            to: Some("2024-01-01".to_string()),
        };
        assert!(matches!(range.to_filter(), Err(CoreError::Validation(_))));
        assert!(matches!(
            run_to_string(&store, Command::List { range, json: false }),
            Err(CoreError::Validation(_))
        ));
    }
}
