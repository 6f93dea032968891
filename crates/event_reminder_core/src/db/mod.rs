//! SQLite bootstrap for the events database.
//!
//! # Responsibility
//! - Open the database behind an `EventStore` (file or memory).
//! - Migrate it and confirm the `events` table has the expected shape.
//!
//! # Invariants
//! - No event row is read or written before migration and verification.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Where an events database lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DbTarget {
    File(PathBuf),
    Memory,
}

impl DbTarget {
    /// Short label used in `mode=` log fields.
    pub fn mode(&self) -> &'static str {
        match self {
            Self::File(_) => "file",
            Self::Memory => "memory",
        }
    }
}

impl Display for DbTarget {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File(path) => write!(f, "`{}`", path.display()),
            Self::Memory => write!(f, "in-memory database"),
        }
    }
}

#[derive(Debug)]
pub enum DbError {
    /// The database could not be opened or configured at all.
    Open {
        target: DbTarget,
        source: rusqlite::Error,
    },
    Sqlite(rusqlite::Error),
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
    /// `events` is missing a column or declares it with another type.
    EventsSchemaMismatch {
        column: &'static str,
        expected_type: &'static str,
        found_type: Option<String>,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open { target, source } => write!(f, "cannot open events database {target}: {source}"),
            Self::Sqlite(err) => write!(f, "sqlite failure: {err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "events database schema version {db_version} is newer than supported {latest_supported}"
            ),
            Self::EventsSchemaMismatch {
                column,
                expected_type,
                found_type: Some(found),
            } => write!(
                f,
                "events.{column} is declared `{found}`, expected `{expected_type}`"
            ),
            Self::EventsSchemaMismatch {
                column,
                expected_type,
                found_type: None,
            } => write!(f, "events.{column} ({expected_type}) is missing"),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Open { source, .. } => Some(source),
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } | Self::EventsSchemaMismatch { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
