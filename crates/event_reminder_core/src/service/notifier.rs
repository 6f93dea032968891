//! Reminder production and the notified state flip.
//!
//! # Invariants
//! - Each due event yields exactly one reminder per run.
//! - An event is marked notified right after its reminder is built and
//!   before the next event is processed.
//! - A failed mark aborts the batch; later events stay pending.

use crate::model::event::{Event, EventId, MINUTE_FORMAT};
use crate::service::due_resolver::{resolve_due_events, DueEvents};
use crate::store::{EventStore, StoreError};
use chrono::NaiveDateTime;
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

pub type NotifyResult<T> = Result<T, NotifyError>;

#[derive(Debug)]
pub enum NotifyError {
    /// The due-event query itself failed.
    Resolve(StoreError),
    /// Persisting the notified flag failed; `delivered` reminders were
    /// already marked before the failure.
    Mark {
        event_id: EventId,
        delivered: Vec<Reminder>,
        source: StoreError,
    },
    /// The store surfaced an already-notified event as due.
    InconsistentState(EventId),
}

impl Display for NotifyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Resolve(err) => write!(f, "failed to resolve due events: {err}"),
            Self::Mark {
                event_id, source, ..
            } => write!(f, "failed to mark event {event_id} notified: {source}"),
            Self::InconsistentState(id) => {
                write!(f, "event {id} was returned as due but is already notified")
            }
        }
    }
}

impl Error for NotifyError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Resolve(err) => Some(err),
            Self::Mark { source, .. } => Some(source),
            Self::InconsistentState(_) => None,
        }
    }
}

/// A formatted reminder for one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reminder {
    pub event_id: EventId,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationOutcome {
    NoEventsToday,
    Sent(Vec<Reminder>),
}

impl NotificationOutcome {
    pub fn reminders(&self) -> &[Reminder] {
        match self {
            Self::NoEventsToday => &[],
            Self::Sent(reminders) => reminders,
        }
    }
}

/// Renders the reminder text; seconds are dropped from the time.
pub fn format_reminder(event: &Event) -> String {
    format!(
        "Reminder: event \"{}\" starts at {}. {}",
        event.name,
        event.occurs_at.format(MINUTE_FORMAT),
        event.description
    )
}

/// Sends reminders for events due at the store's current time.
pub fn send_notifications(store: &EventStore) -> NotifyResult<NotificationOutcome> {
    send_notifications_at(store, store.now())
}

/// Sends reminders for events due at `now`.
pub fn send_notifications_at(
    store: &EventStore,
    now: NaiveDateTime,
) -> NotifyResult<NotificationOutcome> {
    let started_at = Instant::now();
    let events = match resolve_due_events(store, now).map_err(NotifyError::Resolve)? {
        DueEvents::NoEventsToday => return Ok(NotificationOutcome::NoEventsToday),
        DueEvents::Due(events) => events,
    };

    let mut delivered = Vec::with_capacity(events.len());
    for event in events {
        event
            .state
            .mark_notified()
            .map_err(|_| NotifyError::InconsistentState(event.id))?;
        let message = format_reminder(&event);
        if let Err(source) = store.mark_notified(event.id) {
            error!(
                "event=notify module=service status=error id={} sent={} error={source}",
                event.id,
                delivered.len()
            );
            return Err(NotifyError::Mark {
                event_id: event.id,
                delivered,
                source,
            });
        }
        info!("event=reminder module=service id={} message={message}", event.id);
        delivered.push(Reminder {
            event_id: event.id,
            message,
        });
    }

    info!(
        "event=notify module=service status=ok sent={} duration_ms={}",
        delivered.len(),
        started_at.elapsed().as_millis()
    );
    Ok(NotificationOutcome::Sent(delivered))
}
