//! Event record and its one-way notification state.
//!
//! # Responsibility
//! - Define the named record returned by every store read.
//! - Make the `Pending -> Notified` transition explicit and checkable.
//!
//! # Invariants
//! - `id` is assigned by the store exactly once and never reused.
//! - `NotificationState` only moves forward; it never reverts.
//! - `occurs_at` carries whole-second precision and is persisted as epoch
//!   seconds of the local wall-clock reading, so SQL compares it numerically.

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Display format for `occurs_at` (second precision).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
/// Reminder display format (seconds dropped).
pub const MINUTE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Store-assigned integer identity of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(pub i64);

impl EventId {
    pub fn get(self) -> i64 {
        self.0
    }
}

impl Display for EventId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Whether the reminder for an event has already been produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationState {
    /// Reminder not yet produced; eligible for the due window.
    #[default]
    Pending,
    /// Terminal state.
    Notified,
}

impl NotificationState {
    /// Applies the single allowed forward transition.
    ///
    /// # Errors
    /// - `AlreadyNotified` when the state is already terminal.
    pub fn mark_notified(self) -> Result<Self, AlreadyNotified> {
        match self {
            Self::Pending => Ok(Self::Notified),
            Self::Notified => Err(AlreadyNotified),
        }
    }

    pub fn is_notified(self) -> bool {
        matches!(self, Self::Notified)
    }

    pub(crate) fn to_db(self) -> i64 {
        match self {
            Self::Pending => 0,
            Self::Notified => 1,
        }
    }

    pub(crate) fn from_db(value: i64) -> Option<Self> {
        match value {
            0 => Some(Self::Pending),
            1 => Some(Self::Notified),
            _ => None,
        }
    }
}

/// Rejected attempt to notify an event twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlreadyNotified;

impl Display for AlreadyNotified {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "event has already been notified")
    }
}

impl Error for AlreadyNotified {}

/// A persisted scheduled event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    /// Non-empty by convention; not enforced.
    pub name: String,
    /// Local wall-clock time, second precision.
    pub occurs_at: NaiveDateTime,
    pub description: String,
    pub state: NotificationState,
}

impl Event {
    pub fn is_notified(&self) -> bool {
        self.state.is_notified()
    }

    /// `occurs_at` rendered with seconds, as stored.
    pub fn occurs_at_display(&self) -> String {
        format_timestamp(self.occurs_at)
    }
}

/// Creation input; the store assigns `id` and the initial state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEvent {
    pub name: String,
    pub occurs_at: NaiveDateTime,
    pub description: String,
}

impl NewEvent {
    pub fn new(
        name: impl Into<String>,
        occurs_at: NaiveDateTime,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            occurs_at,
            description: description.into(),
        }
    }
}

pub fn format_timestamp(instant: NaiveDateTime) -> String {
    instant.format(TIMESTAMP_FORMAT).to_string()
}

/// Encodes a wall-clock reading as the integer stored in `events.occurs_at`.
pub fn to_epoch_seconds(instant: NaiveDateTime) -> i64 {
    instant.and_utc().timestamp()
}

/// Decodes `events.occurs_at`; `None` outside chrono's representable range.
pub fn from_epoch_seconds(seconds: i64) -> Option<NaiveDateTime> {
    DateTime::from_timestamp(seconds, 0).map(|instant| instant.naive_utc())
}
