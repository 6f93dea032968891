//! Caller-owned event store handle.
//!
//! # Responsibility
//! - Own the SQLite connection and the clock used for validation.
//! - Expose create / delete / windowed reads / notified flip.
//! - Release the connection deterministically through `close()`.
//!
//! # Invariants
//! - An event is never persisted with `occurs_at` earlier than `now()`.
//! - Each operation is one SQL statement, so it is all-or-nothing.
//! - One in-flight caller per handle; no internal locking.

use crate::clock::{truncate_to_seconds, Clock, SystemClock};
use crate::db::{open_db, open_db_in_memory, DbError};
use crate::model::event::{Event, EventId, NewEvent};
use crate::repo::event_repo::{EventRepository, RepoError, SqliteEventRepository};
use chrono::NaiveDateTime;
use log::{error, info, warn};
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

pub type StoreResult<T> = Result<T, StoreError>;

/// Outcome taxonomy for store operations.
#[derive(Debug)]
pub enum StoreError {
    /// Creation rejected because the event time lies before `now`.
    PastDateRejected {
        occurs_at: NaiveDateTime,
        now: NaiveDateTime,
    },
    /// No event with this id exists.
    NotFound(EventId),
    /// Persistence unavailable or corrupt; fatal for the current call.
    Storage(RepoError),
}

impl StoreError {
    /// `true` for caller-recoverable validation outcomes.
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::PastDateRejected { .. } | Self::NotFound(_))
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PastDateRejected { occurs_at, now } => write!(
                f,
                "cannot schedule event at {occurs_at}: it is before current time {now}"
            ),
            Self::NotFound(id) => write!(f, "event not found: {id}"),
            Self::Storage(err) => write!(f, "storage failure: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for StoreError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::NotFound(id),
            other => Self::Storage(other),
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Storage(RepoError::Db(value))
    }
}

/// Persistent collection of events.
pub struct EventStore {
    conn: Connection,
    clock: Box<dyn Clock>,
}

impl EventStore {
    /// Opens a file-backed store using the host's local clock.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        Self::open_with_clock(path, Box::new(SystemClock))
    }

    pub fn open_with_clock(path: impl AsRef<Path>, clock: Box<dyn Clock>) -> StoreResult<Self> {
        Ok(Self {
            conn: open_db(path)?,
            clock,
        })
    }

    /// Opens a throwaway in-memory store.
    pub fn open_in_memory_with_clock(clock: Box<dyn Clock>) -> StoreResult<Self> {
        Ok(Self {
            conn: open_db_in_memory()?,
            clock,
        })
    }

    /// Current instant according to this store's clock.
    pub fn now(&self) -> NaiveDateTime {
        self.clock.now()
    }

    fn repo(&self) -> SqliteEventRepository<'_> {
        SqliteEventRepository::new(&self.conn)
    }

    /// Persists a new pending event and returns its assigned id.
    ///
    /// # Errors
    /// - `PastDateRejected` when `occurs_at` is strictly before `now()`;
    ///   nothing is written.
    pub fn create(
        &self,
        name: impl Into<String>,
        occurs_at: NaiveDateTime,
        description: impl Into<String>,
    ) -> StoreResult<EventId> {
        let event = NewEvent::new(name, truncate_to_seconds(occurs_at), description);
        let now = self.now();
        if event.occurs_at < now {
            warn!(
                "event=event_create module=store status=rejected reason=past_date occurs_at={} now={now}",
                event.occurs_at
            );
            return Err(StoreError::PastDateRejected {
                occurs_at: event.occurs_at,
                now,
            });
        }

        match self.repo().insert_event(&event) {
            Ok(id) => {
                info!("event=event_create module=store status=ok id={id}");
                Ok(id)
            }
            Err(err) => {
                error!("event=event_create module=store status=error error={err}");
                Err(err.into())
            }
        }
    }

    /// Removes the event permanently.
    ///
    /// # Errors
    /// - `NotFound` when no such id exists; the store is unchanged.
    pub fn delete_by_id(&self, id: EventId) -> StoreResult<()> {
        let result = self.repo().delete_event(id).map_err(StoreError::from);
        match &result {
            Ok(()) => info!("event=event_delete module=store status=ok id={id}"),
            Err(StoreError::NotFound(_)) => {
                warn!("event=event_delete module=store status=rejected reason=not_found id={id}")
            }
            Err(err) => error!("event=event_delete module=store status=error id={id} error={err}"),
        }
        result
    }

    pub fn get(&self, id: EventId) -> StoreResult<Option<Event>> {
        Ok(self.repo().get_event(id)?)
    }

    pub fn list_all(&self) -> StoreResult<Vec<Event>> {
        Ok(self.repo().list_events()?)
    }

    pub fn count(&self) -> StoreResult<usize> {
        Ok(self.repo().count_events()?)
    }

    /// Pending events with `occurs_at` in `[window_start, window_end)`, by id.
    pub fn query_pending(
        &self,
        window_start: NaiveDateTime,
        window_end: NaiveDateTime,
    ) -> StoreResult<Vec<Event>> {
        Ok(self.repo().list_pending_between(window_start, window_end)?)
    }

    /// Events strictly before `instant`, notified or not, by id.
    pub fn query_before(&self, instant: NaiveDateTime) -> StoreResult<Vec<Event>> {
        Ok(self.repo().list_before(instant)?)
    }

    /// Sets the event's state to notified. Repeating it is a no-op.
    ///
    /// # Errors
    /// - `NotFound` when no such id exists.
    pub fn mark_notified(&self, id: EventId) -> StoreResult<()> {
        Ok(self.repo().mark_notified(id)?)
    }

    /// Releases the connection. The handle is consumed either way.
    pub fn close(self) -> StoreResult<()> {
        match self.conn.close() {
            Ok(()) => {
                info!("event=store_close module=store status=ok");
                Ok(())
            }
            Err((_conn, err)) => {
                error!("event=store_close module=store status=error error={err}");
                Err(DbError::Sqlite(err).into())
            }
        }
    }
}
