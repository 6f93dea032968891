//! Due-event resolution for the current calendar day.

use crate::clock::due_window;
use crate::model::event::Event;
use crate::store::{EventStore, StoreResult};
use chrono::NaiveDateTime;
use log::{debug, info};

/// Result of a due check. An empty day is informational, never an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DueEvents {
    NoEventsToday,
    /// Non-empty, in store order (ascending id).
    Due(Vec<Event>),
}

impl DueEvents {
    pub fn into_events(self) -> Vec<Event> {
        match self {
            Self::NoEventsToday => Vec::new(),
            Self::Due(events) => events,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::NoEventsToday => 0,
            Self::Due(events) => events.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::NoEventsToday)
    }
}

/// Pending events in `[now, end of today)`.
pub fn resolve_due_events(store: &EventStore, now: NaiveDateTime) -> StoreResult<DueEvents> {
    let (window_start, window_end) = due_window(now);
    debug!(
        "event=due_resolve module=service status=start window_start={window_start} window_end={window_end}"
    );

    let events = store.query_pending(window_start, window_end)?;
    if events.is_empty() {
        info!("event=due_resolve module=service status=ok due=0 outcome=no_events_today");
        return Ok(DueEvents::NoEventsToday);
    }

    info!(
        "event=due_resolve module=service status=ok due={}",
        events.len()
    );
    Ok(DueEvents::Due(events))
}
