//! Single-sheet xlsx file sink.
//!
//! # Invariants
//! - The workbook is rendered fully in memory before touching disk.
//! - The destination is replaced by an atomic rename of a sibling temp file.

use super::{check_row_widths, SinkResult, TableCell, TabularSink};
use log::info;
use rust_xlsxwriter::{Format, Workbook};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

const SHEET_NAME: &str = "Past events";
/// Largest magnitude an xlsx number cell (IEEE-754 double) holds exactly.
const MAX_EXACT_NUMBER: u64 = 1 << 53;

/// Writes tables to a fixed `.xlsx` destination, overwriting it wholesale.
#[derive(Debug, Clone)]
pub struct XlsxFileSink {
    path: PathBuf,
}

impl XlsxFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TabularSink for XlsxFileSink {
    fn write_table(&mut self, header: &[&str], rows: &[Vec<TableCell>]) -> SinkResult<()> {
        check_row_widths(header, rows)?;
        let bytes = render_workbook(header, rows)?;
        replace_file(&self.path, &bytes)?;
        info!(
            "event=xlsx_write module=sink status=ok rows={} bytes={} path={}",
            rows.len(),
            bytes.len(),
            self.path.display()
        );
        Ok(())
    }
}

fn render_workbook(header: &[&str], rows: &[Vec<TableCell>]) -> SinkResult<Vec<u8>> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    for (col, label) in (0u16..).zip(header) {
        sheet.write_string_with_format(0, col, *label, &bold)?;
    }
    for (row, cells) in (1u32..).zip(rows) {
        for (col, cell) in (0u16..).zip(cells) {
            match cell {
                TableCell::Integer(value) => match exact_number(*value) {
                    Some(number) => {
                        sheet.write_number(row, col, number)?;
                    }
                    None => {
                        sheet.write_string(row, col, value.to_string())?;
                    }
                },
                TableCell::Text(value) => {
                    sheet.write_string(row, col, value)?;
                }
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}

/// `Some` when the integer survives conversion to a number cell unchanged.
fn exact_number(value: i64) -> Option<f64> {
    (value.unsigned_abs() <= MAX_EXACT_NUMBER).then_some(value as f64)
}

fn replace_file(path: &Path, bytes: &[u8]) -> SinkResult<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut staged = NamedTempFile::new_in(dir)?;
    staged.write_all(bytes)?;
    staged.as_file().sync_all()?;
    staged.persist(path).map_err(|err| err.error)?;
    Ok(())
}
