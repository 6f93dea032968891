//! Event repository contract and SQLite implementation.
//!
//! # Invariants
//! - `occurs_at` is bound and compared as integer epoch seconds.
//! - Read paths reject malformed rows instead of masking them.

use crate::db::DbError;
use crate::model::event::{
    from_epoch_seconds, to_epoch_seconds, Event, EventId, NewEvent, NotificationState,
};
use chrono::NaiveDateTime;
use rusqlite::{params, Connection, Params, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const EVENT_SELECT_SQL: &str = "SELECT
    id,
    name,
    occurs_at,
    description,
    notified
FROM events";

pub type RepoResult<T> = Result<T, RepoError>;

/// Persistence-level failure for event reads and writes.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    NotFound(EventId),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "event not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted event data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::NotFound(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Data-access contract for persisted events.
pub trait EventRepository {
    fn insert_event(&self, event: &NewEvent) -> RepoResult<EventId>;
    fn get_event(&self, id: EventId) -> RepoResult<Option<Event>>;
    fn list_events(&self) -> RepoResult<Vec<Event>>;
    /// Pending events with `occurs_at` in `[start, end)`.
    fn list_pending_between(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> RepoResult<Vec<Event>>;
    /// Events with `occurs_at < instant`, any notification state.
    fn list_before(&self, instant: NaiveDateTime) -> RepoResult<Vec<Event>>;
    fn mark_notified(&self, id: EventId) -> RepoResult<()>;
    fn delete_event(&self, id: EventId) -> RepoResult<()>;
    fn count_events(&self) -> RepoResult<usize>;
}

/// SQLite-backed event repository borrowing a migrated connection.
pub struct SqliteEventRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteEventRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn query_events<P: Params>(&self, filter_sql: &str, params: P) -> RepoResult<Vec<Event>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{EVENT_SELECT_SQL} {filter_sql} ORDER BY id ASC;"))?;
        let mut rows = stmt.query(params)?;
        let mut events = Vec::new();
        while let Some(row) = rows.next()? {
            events.push(parse_event_row(row)?);
        }
        Ok(events)
    }
}

impl EventRepository for SqliteEventRepository<'_> {
    fn insert_event(&self, event: &NewEvent) -> RepoResult<EventId> {
        self.conn.execute(
            "INSERT INTO events (name, occurs_at, description, notified)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                event.name.as_str(),
                to_epoch_seconds(event.occurs_at),
                event.description.as_str(),
                NotificationState::Pending.to_db(),
            ],
        )?;
        Ok(EventId(self.conn.last_insert_rowid()))
    }

    fn get_event(&self, id: EventId) -> RepoResult<Option<Event>> {
        Ok(self
            .query_events("WHERE id = ?1", [id.get()])?
            .into_iter()
            .next())
    }

    fn list_events(&self) -> RepoResult<Vec<Event>> {
        self.query_events("", params![])
    }

    fn list_pending_between(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> RepoResult<Vec<Event>> {
        self.query_events(
            "WHERE notified = ?1 AND occurs_at >= ?2 AND occurs_at < ?3",
            params![
                NotificationState::Pending.to_db(),
                to_epoch_seconds(start),
                to_epoch_seconds(end),
            ],
        )
    }

    fn list_before(&self, instant: NaiveDateTime) -> RepoResult<Vec<Event>> {
        self.query_events("WHERE occurs_at < ?1", [to_epoch_seconds(instant)])
    }

    fn mark_notified(&self, id: EventId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE events SET notified = ?1 WHERE id = ?2;",
            params![NotificationState::Notified.to_db(), id.get()],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }

    fn delete_event(&self, id: EventId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM events WHERE id = ?1;", [id.get()])?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }

    fn count_events(&self) -> RepoResult<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM events;", [], |row| row.get(0))?;
        usize::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative event count `{count}`")))
    }
}

fn parse_event_row(row: &Row<'_>) -> RepoResult<Event> {
    let id = EventId(row.get("id")?);

    let occurs_at_seconds: i64 = row.get("occurs_at")?;
    let occurs_at = from_epoch_seconds(occurs_at_seconds).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "out-of-range timestamp `{occurs_at_seconds}` in events.occurs_at for id {id}"
        ))
    })?;

    let notified: i64 = row.get("notified")?;
    let state = NotificationState::from_db(notified).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid notified value `{notified}` in events.notified for id {id}"
        ))
    })?;

    Ok(Event {
        id,
        name: row.get("name")?,
        occurs_at,
        description: row.get("description")?,
        state,
    })
}
