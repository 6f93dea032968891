//! Tabular output sinks for exported events.
//!
//! # Responsibility
//! - Define the header-plus-rows contract the exporter writes through.
//! - Provide the xlsx file implementation.
//!
//! # Invariants
//! - A sink either publishes the whole table or leaves prior output untouched.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod xlsx;

pub use xlsx::XlsxFileSink;

pub type SinkResult<T> = Result<T, SinkError>;

/// One cell of an exported row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableCell {
    Integer(i64),
    Text(String),
}

impl From<i64> for TableCell {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<String> for TableCell {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for TableCell {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

#[derive(Debug)]
pub enum SinkError {
    Io(std::io::Error),
    Xlsx(rust_xlsxwriter::XlsxError),
    /// A data row's width does not match the header.
    RowWidth { row: usize, expected: usize, actual: usize },
}

impl Display for SinkError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "tabular file i/o failed: {err}"),
            Self::Xlsx(err) => write!(f, "xlsx rendering failed: {err}"),
            Self::RowWidth {
                row,
                expected,
                actual,
            } => write!(f, "row {row} has {actual} cells, header has {expected}"),
        }
    }
}

impl Error for SinkError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Xlsx(err) => Some(err),
            Self::RowWidth { .. } => None,
        }
    }
}

impl From<std::io::Error> for SinkError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<rust_xlsxwriter::XlsxError> for SinkError {
    fn from(value: rust_xlsxwriter::XlsxError) -> Self {
        Self::Xlsx(value)
    }
}

/// Destination accepting a header row and data rows in one call.
pub trait TabularSink {
    fn write_table(&mut self, header: &[&str], rows: &[Vec<TableCell>]) -> SinkResult<()>;
}

/// Rejects rows whose width differs from the header.
pub(crate) fn check_row_widths(header: &[&str], rows: &[Vec<TableCell>]) -> SinkResult<()> {
    match rows
        .iter()
        .enumerate()
        .find(|(_, row)| row.len() != header.len())
    {
        Some((row, cells)) => Err(SinkError::RowWidth {
            row,
            expected: header.len(),
            actual: cells.len(),
        }),
        None => Ok(()),
    }
}
