//! Export of past events as a header-plus-rows table.
//!
//! # Invariants
//! - `now` is read once per export.
//! - Columns are always `ID, Name, Occurs At, Description`, in that order.
//! - Rows follow store order (ascending id); timestamps keep seconds.

use crate::model::event::Event;
use crate::sink::{SinkError, TableCell, TabularSink};
use crate::store::{EventStore, StoreError};
use chrono::NaiveDateTime;
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

pub const EXPORT_HEADER: [&str; 4] = ["ID", "Name", "Occurs At", "Description"];

pub type ExportResult<T> = Result<T, ExportError>;

#[derive(Debug)]
pub enum ExportError {
    Store(StoreError),
    /// The tabular sink could not be written; prior output is untouched.
    Sink(SinkError),
}

impl Display for ExportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "failed to read past events: {err}"),
            Self::Sink(err) => write!(f, "failed to write export: {err}"),
        }
    }
}

impl Error for ExportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::Sink(err) => Some(err),
        }
    }
}

impl From<StoreError> for ExportError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<SinkError> for ExportError {
    fn from(value: SinkError) -> Self {
        Self::Sink(value)
    }
}

/// Builds the export row for one event.
pub fn export_row(event: &Event) -> Vec<TableCell> {
    vec![
        TableCell::Integer(event.id.get()),
        TableCell::Text(event.name.clone()),
        TableCell::Text(event.occurs_at_display()),
        TableCell::Text(event.description.clone()),
    ]
}

/// Exports every event before the store's current time.
///
/// Returns the number of data rows written.
pub fn export_past_events(store: &EventStore, sink: &mut dyn TabularSink) -> ExportResult<usize> {
    export_past_events_at(store, store.now(), sink)
}

pub fn export_past_events_at(
    store: &EventStore,
    now: NaiveDateTime,
    sink: &mut dyn TabularSink,
) -> ExportResult<usize> {
    let started_at = Instant::now();
    info!("event=export module=service status=start before={now}");

    let rows = store
        .query_before(now)?
        .iter()
        .map(export_row)
        .collect::<Vec<_>>();

    if let Err(err) = sink.write_table(&EXPORT_HEADER, &rows) {
        error!(
            "event=export module=service status=error rows={} error={err}",
            rows.len()
        );
        return Err(err.into());
    }

    info!(
        "event=export module=service status=ok rows={} duration_ms={}",
        rows.len(),
        started_at.elapsed().as_millis()
    );
    Ok(rows.len())
}
