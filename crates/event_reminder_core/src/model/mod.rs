//! Domain model for scheduled events.
//!
//! # Invariants
//! - Every persisted event is identified by a store-assigned `EventId`.
//! - Deletion is a hard delete; there is no tombstone state.

pub mod event;
