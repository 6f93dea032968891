//! Repository layer over the `events` table.
//!
//! # Responsibility
//! - Define the data-access contract used by `EventStore`.
//! - Keep SQL text and row decoding out of the store and services.
//!
//! # Invariants
//! - Missing rows surface as `RepoError::NotFound`, not as silent no-ops.
//! - Multi-row reads are ordered by ascending `id`.

pub mod event_repo;
