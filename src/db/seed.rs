//! Demonstration data for an empty database
//!
//! Sessions are generated walking forward in time from a point in the past,
//! so every generated session ends after it starts and none overlap.

use super::schema::INSERT_SESSION;
use crate::models::Session;
use chrono::{Duration, Local, NaiveDateTime, Timelike};
use rand::Rng;
use rusqlite::{params, Connection};

/// How far back the first generated session may start
const SEED_WINDOW_DAYS: i64 = 60;

/// Largest gap between the end of one session and the start of the next
const MAX_GAP_MINUTES: i64 = 3 * 24 * 60;

const MIN_SESSION_MINUTES: i64 = 15;
const MAX_SESSION_MINUTES: i64 = 6 * 60;

/// Random minute-aligned timestamp in `[not_before, not_before + window)`
pub fn random_timestamp<R: Rng + ?Sized>(
    rng: &mut R,
    not_before: NaiveDateTime,
    window: Duration,
) -> NaiveDateTime {
    let base = truncate_to_minute(not_before);
    let minutes = window.num_minutes().max(1);
    base + Duration::minutes(rng.gen_range(0..minutes))
}

/// Random timestamp strictly later than `start`, between 15 minutes and 6 hours after it
pub fn random_timestamp_after<R: Rng + ?Sized>(rng: &mut R, start: NaiveDateTime) -> NaiveDateTime {
    start + Duration::minutes(rng.gen_range(MIN_SESSION_MINUTES..=MAX_SESSION_MINUTES))
}

/// Generate `count` non-overlapping sessions that end before `now`
pub fn generate_sessions<R: Rng + ?Sized>(
    rng: &mut R,
    count: usize,
    now: NaiveDateTime,
) -> Vec<Session> {
    let mut cursor = now - Duration::days(SEED_WINDOW_DAYS);
    let mut sessions = Vec::with_capacity(count);

    for _ in 0..count {
        let start = random_timestamp(rng, cursor, Duration::minutes(MAX_GAP_MINUTES));
        let end = random_timestamp_after(rng, start);
        sessions.push(Session::new(start, end));
        cursor = end;
    }

    sessions
}

/// Insert `count` generated sessions in one transaction.
/// Returns the number of rows written.
pub fn seed_sessions<R: Rng + ?Sized>(
    conn: &Connection,
    rng: &mut R,
    count: usize,
) -> rusqlite::Result<usize> {
    let sessions = generate_sessions(rng, count, Local::now().naive_local());

    let tx = conn.unchecked_transaction()?;
    let mut inserted = 0;
    {
        let mut stmt = tx.prepare(INSERT_SESSION)?;
        for session in &sessions {
            inserted += stmt.execute(params![
                session.start_text(),
                session.end_text(),
                session.duration
            ])?;
        }
    }
    tx.commit()?;

    tracing::debug!("Seeded {} coding sessions", inserted);
    Ok(inserted)
}

fn truncate_to_minute(ts: NaiveDateTime) -> NaiveDateTime {
    ts.with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(ts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::schema::{init_db, row_count};
    use crate::models::parse_timestamp;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_random_timestamp_after_is_later() {
        let mut rng = StdRng::seed_from_u64(7);
        let start = parse_timestamp("2024-01-01 09:00").unwrap();

        for _ in 0..100 {
            let end = random_timestamp_after(&mut rng, start);
            assert!(end > start);
            assert!(end - start <= Duration::minutes(MAX_SESSION_MINUTES));
        }
    }

    #[test]
    fn test_random_timestamp_stays_in_window() {
        let mut rng = StdRng::seed_from_u64(11);
        let base = parse_timestamp("2024-01-01 09:00:42").unwrap();

        for _ in 0..100 {
            let ts = random_timestamp(&mut rng, base, Duration::hours(2));
            assert_eq!(ts.second(), 0);
            assert!(ts >= truncate_to_minute(base));
            assert!(ts < base + Duration::hours(2));
        }
    }

    #[test]
    fn test_generated_sessions_do_not_overlap() {
        let mut rng = StdRng::seed_from_u64(42);
        let now = parse_timestamp("2024-06-01 12:00").unwrap();
        let sessions = generate_sessions(&mut rng, 15, now);

        assert_eq!(sessions.len(), 15);
        for session in &sessions {
            assert!(session.end_time > session.start_time);
            assert!(session.end_time < now);
            assert_ne!(session.duration, "0.00");
        }
        for pair in sessions.windows(2) {
            assert!(pair[1].start_time >= pair[0].end_time);
        }
    }

    #[test]
    fn test_seed_sessions_writes_rows() {
        let conn = Connection::open_in_memory().unwrap();
        init_db(&conn).unwrap();
        let mut rng = StdRng::seed_from_u64(3);

        assert_eq!(seed_sessions(&conn, &mut rng, 15).unwrap(), 15);
        assert_eq!(row_count(&conn).unwrap(), 15);
    }
}
