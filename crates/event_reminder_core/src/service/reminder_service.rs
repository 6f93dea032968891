//! Config-driven facade over the store, notifier and exporter.
//!
//! # Responsibility
//! - Give library callers one owned handle for the whole lifecycle.
//! - Bind the fixed export destination from configuration.

use crate::clock::Clock;
use crate::config::ReminderConfig;
use crate::model::event::{Event, EventId};
use crate::service::due_resolver::{resolve_due_events, DueEvents};
use crate::service::exporter::{export_past_events, ExportResult};
use crate::service::notifier::{send_notifications, NotificationOutcome, NotifyResult};
use crate::sink::XlsxFileSink;
use crate::store::{EventStore, StoreResult};
use chrono::NaiveDateTime;
use std::path::{Path, PathBuf};

/// Owns an `EventStore` plus the xlsx export destination.
pub struct ReminderService {
    store: EventStore,
    export_path: PathBuf,
}

impl ReminderService {
    pub fn new(store: EventStore, export_path: impl Into<PathBuf>) -> Self {
        Self {
            store,
            export_path: export_path.into(),
        }
    }

    /// Opens the configured database with the system clock.
    pub fn from_config(config: &ReminderConfig) -> StoreResult<Self> {
        let store = EventStore::open(&config.database_path)?;
        Ok(Self::new(store, config.export_path.clone()))
    }

    pub fn from_config_with_clock(
        config: &ReminderConfig,
        clock: Box<dyn Clock>,
    ) -> StoreResult<Self> {
        let store = EventStore::open_with_clock(&config.database_path, clock)?;
        Ok(Self::new(store, config.export_path.clone()))
    }

    pub fn store(&self) -> &EventStore {
        &self.store
    }

    pub fn export_path(&self) -> &Path {
        &self.export_path
    }

    pub fn create_event(
        &self,
        name: impl Into<String>,
        occurs_at: NaiveDateTime,
        description: impl Into<String>,
    ) -> StoreResult<EventId> {
        self.store.create(name, occurs_at, description)
    }

    pub fn delete_event(&self, id: EventId) -> StoreResult<()> {
        self.store.delete_by_id(id)
    }

    pub fn get_event(&self, id: EventId) -> StoreResult<Option<Event>> {
        self.store.get(id)
    }

    /// Pending events still due today, without changing any state.
    pub fn due_events(&self) -> StoreResult<DueEvents> {
        resolve_due_events(&self.store, self.store.now())
    }

    pub fn send_notifications(&self) -> NotifyResult<NotificationOutcome> {
        send_notifications(&self.store)
    }

    /// Rewrites the export file with every past event.
    pub fn export_past_events(&self) -> ExportResult<usize> {
        let mut sink = XlsxFileSink::new(self.export_path.clone());
        export_past_events(&self.store, &mut sink)
    }

    pub fn close(self) -> StoreResult<()> {
        self.store.close()
    }
}
