//! Use-case services built on top of `EventStore`.
//!
//! # Responsibility
//! - Resolve which pending events are due today.
//! - Produce reminders and flip events to notified.
//! - Export past events through a tabular sink.
//! - Offer a config-driven facade for library callers.
//!
//! # Invariants
//! - Services touch persisted state only through `EventStore`.

pub mod due_resolver;
pub mod exporter;
pub mod notifier;
pub mod reminder_service;
