use event_reminder_core::db::migrations::{
    latest_version, schema_version, verify_events_schema, EVENTS_COLUMNS,
};
use event_reminder_core::db::{open_db, open_db_in_memory, DbError, DbTarget};
use event_reminder_core::{EventStore, StoreError};
use rusqlite::Connection;

fn declared_type(conn: &Connection, column: &str) -> Option<String> {
    conn.query_row(
        "SELECT type FROM pragma_table_info('events') WHERE name = ?1;",
        [column],
        |row| row.get(0),
    )
    .ok()
}

#[test]
fn fresh_database_gets_every_events_column() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn).unwrap(), latest_version());
    for &(column, expected) in EVENTS_COLUMNS {
        assert_eq!(declared_type(&conn, column).as_deref(), Some(expected));
    }
    verify_events_schema(&conn).unwrap();
}

#[test]
fn events_written_before_reopen_are_kept() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("events.db");

    let conn = open_db(&path).unwrap();
    conn.execute(
        "INSERT INTO events (name, occurs_at, description) VALUES ('kept', 0, '');",
        [],
    )
    .unwrap();
    drop(conn);

    let reopened = open_db(&path).unwrap();
    let count: i64 = reopened
        .query_row("SELECT COUNT(*) FROM events;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 1);
    assert_eq!(schema_version(&reopened).unwrap(), latest_version());
}

#[test]
fn database_from_newer_build_is_refused_by_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");
    let raw = Connection::open(&path).unwrap();
    raw.pragma_update(None, "user_version", latest_version() + 1)
        .unwrap();
    drop(raw);

    match EventStore::open(&path).err().unwrap() {
        StoreError::Storage(err) => assert!(err.to_string().contains("newer than supported")),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn text_timestamp_table_stamped_current_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("legacy.db");
    let raw = Connection::open(&path).unwrap();
    raw.execute_batch(
        "CREATE TABLE events (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            occurs_at TEXT NOT NULL,
            description TEXT NOT NULL,
            notified INTEGER NOT NULL DEFAULT 0
        );",
    )
    .unwrap();
    raw.pragma_update(None, "user_version", latest_version())
        .unwrap();
    drop(raw);

    match open_db(&path).unwrap_err() {
        DbError::EventsSchemaMismatch {
            column,
            expected_type,
            found_type,
        } => {
            assert_eq!(column, "occurs_at");
            assert_eq!(expected_type, "INTEGER");
            assert_eq!(found_type.as_deref(), Some("TEXT"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn missing_events_table_is_reported_by_first_column() {
    let conn = Connection::open_in_memory().unwrap();

    match verify_events_schema(&conn).unwrap_err() {
        DbError::EventsSchemaMismatch {
            column, found_type, ..
        } => {
            assert_eq!(column, "id");
            assert_eq!(found_type, None);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn unopenable_path_names_the_file_target() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("no-such-dir").join("events.db");

    match open_db(&path).unwrap_err() {
        DbError::Open { target, .. } => assert_eq!(target, DbTarget::File(path)),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn notified_flag_outside_zero_and_one_is_refused() {
    let conn = open_db_in_memory().unwrap();
    let result = conn.execute(
        "INSERT INTO events (name, occurs_at, description, notified)
         VALUES ('x', 0, '', 2);",
        [],
    );
    assert!(result.is_err());
}
