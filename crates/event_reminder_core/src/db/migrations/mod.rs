//! Schema evolution for the `events` table.
//!
//! # Invariants
//! - Steps are ordered by strictly increasing `version`.
//! - All pending steps apply inside one transaction, then
//!   `PRAGMA user_version` records the last one.
//! - After migrating, `events` must expose `EVENTS_COLUMNS` exactly as typed.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;
use std::collections::HashMap;

/// One schema step for the events database.
#[derive(Debug, Clone, Copy)]
struct SchemaStep {
    version: u32,
    sql: &'static str,
}

const SCHEMA_STEPS: &[SchemaStep] = &[SchemaStep {
    version: 1,
    sql: include_str!("0001_events.sql"),
}];

/// Column name and declared SQLite type of every `events` column the
/// repository reads or binds.
pub const EVENTS_COLUMNS: &[(&str, &str)] = &[
    ("id", "INTEGER"),
    ("name", "TEXT"),
    ("occurs_at", "INTEGER"),
    ("description", "TEXT"),
    ("notified", "INTEGER"),
];

/// Returns the newest schema version this build understands.
pub fn latest_version() -> u32 {
    SCHEMA_STEPS.last().map_or(0, |step| step.version)
}

/// Reads `PRAGMA user_version` from the connection.
pub fn schema_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get::<_, u32>(0))?)
}

/// Runs every schema step newer than the recorded version.
///
/// # Errors
/// - `UnsupportedSchemaVersion` when the file was written by a newer build.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let recorded = schema_version(conn)?;
    let latest = latest_version();
    if recorded > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: recorded,
            latest_supported: latest,
        });
    }

    let pending = SCHEMA_STEPS
        .iter()
        .filter(|step| step.version > recorded)
        .collect::<Vec<_>>();
    let Some(last) = pending.last() else {
        return Ok(());
    };

    let tx = conn.transaction()?;
    for step in &pending {
        tx.execute_batch(step.sql)?;
    }
    tx.pragma_update(None, "user_version", last.version)?;
    tx.commit()?;
    info!(
        "event=db_migrate module=db status=ok from_version={recorded} to_version={}",
        last.version
    );
    Ok(())
}

/// Confirms `events` declares every column in `EVENTS_COLUMNS`.
///
/// Catches databases stamped with a current `user_version` whose table was
/// created by something else, e.g. an older text-timestamp layout.
pub fn verify_events_schema(conn: &Connection) -> DbResult<()> {
    let mut stmt = conn.prepare("SELECT name, type FROM pragma_table_info('events');")?;
    let declared = stmt
        .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?
        .collect::<Result<HashMap<_, _>, _>>()?;

    for &(column, expected_type) in EVENTS_COLUMNS {
        match declared.get(column) {
            Some(found) if found.eq_ignore_ascii_case(expected_type) => {}
            found => {
                return Err(DbError::EventsSchemaMismatch {
                    column,
                    expected_type,
                    found_type: found.cloned(),
                });
            }
        }
    }
    Ok(())
}
