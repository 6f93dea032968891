//! Connection bootstrap for the events database.
//!
//! # Invariants
//! - Returned connections are migrated and carry a verified `events` table.
//! - Every open attempt emits exactly one terminal `db_open` log line.

use super::migrations::{apply_migrations, verify_events_schema};
use super::{DbError, DbResult, DbTarget};
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens (or creates) the events database file and migrates it.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    open_target(DbTarget::File(path.as_ref().to_path_buf()))
}

/// Opens a private in-memory events database and migrates it.
///
/// The database disappears when the connection is dropped.
pub fn open_db_in_memory() -> DbResult<Connection> {
    open_target(DbTarget::Memory)
}

fn open_target(target: DbTarget) -> DbResult<Connection> {
    let started_at = Instant::now();
    let mode = target.mode();
    info!("event=db_open module=db status=start mode={mode} target={target}");

    let connected = match &target {
        DbTarget::File(path) => Connection::open(path),
        DbTarget::Memory => Connection::open_in_memory(),
    };
    let result = connected
        .and_then(|conn| conn.busy_timeout(BUSY_TIMEOUT).map(|()| conn))
        .map_err(|source| DbError::Open {
            target: target.clone(),
            source,
        })
        .and_then(|mut conn| {
            apply_migrations(&mut conn)?;
            verify_events_schema(&conn)?;
            Ok(conn)
        });

    match &result {
        Ok(_) => info!(
            "event=db_open module=db status=ok mode={mode} duration_ms={}",
            started_at.elapsed().as_millis()
        ),
        Err(err) => error!(
            "event=db_open module=db status=error mode={mode} duration_ms={} error={err}",
            started_at.elapsed().as_millis()
        ),
    }
    result
}
