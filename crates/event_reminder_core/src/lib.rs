//! Core of the event reminder library.
//!
//! Persists scheduled events, resolves which pending events are due today,
//! marks them notified exactly once, and exports past events to xlsx.

pub mod clock;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod sink;
pub mod store;

pub use clock::{due_window, Clock, FixedClock, SystemClock};
pub use config::{ConfigError, LoggingConfig, ReminderConfig};
pub use logging::{default_log_level, init_from_config, init_logging, logging_status};
pub use model::event::{AlreadyNotified, Event, EventId, NewEvent, NotificationState};
pub use repo::event_repo::{EventRepository, RepoError, RepoResult, SqliteEventRepository};
pub use service::due_resolver::{resolve_due_events, DueEvents};
pub use service::exporter::{
    export_past_events, export_past_events_at, ExportError, ExportResult, EXPORT_HEADER,
};
pub use service::notifier::{
    format_reminder, send_notifications, send_notifications_at, NotificationOutcome, NotifyError,
    NotifyResult, Reminder,
};
pub use service::reminder_service::ReminderService;
pub use sink::{SinkError, SinkResult, TableCell, TabularSink, XlsxFileSink};
pub use store::{EventStore, StoreError, StoreResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
