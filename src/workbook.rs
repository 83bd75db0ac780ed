//! Spreadsheet reading and writing.
//!
//! Reading goes through `calamine`: the first worksheet of each file, row 1
//! as the header row, every cell coerced to text so no numeric or date
//! precision is lost to implicit typing. Writing goes through
//! `rust_xlsxwriter`: a single named sheet of plain cells, no table
//! formatting objects.

use std::path::Path;

use anyhow::{Context, Result};
use calamine::{Data, Reader, Xlsx, open_workbook};
use thiserror::Error;

/// A source file that could not be read as a spreadsheet. Recorded against
/// the file and excluded from the batch without aborting sibling files.
#[derive(Debug, Error)]
#[error("{file_id}: {reason}")]
pub struct ReadFailure {
    pub file_id: String,
    pub reason: String,
}

/// One uploaded spreadsheet, fully materialized, all cells as text.
#[derive(Debug, Clone)]
pub struct SourceTable {
    pub file_id: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl SourceTable {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Cell at (row, column); absent cells read as empty text.
    pub fn cell(&self, row: usize, column: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn column_values(&self, column: usize) -> Vec<String> {
        (0..self.row_count())
            .map(|row| self.cell(row, column).to_string())
            .collect()
    }
}

pub fn file_id(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Reads the first worksheet of an .xlsx file into a [`SourceTable`].
pub fn read_source_table(path: &Path) -> Result<SourceTable, ReadFailure> {
    let id = file_id(path);
    let fail = |reason: String| ReadFailure {
        file_id: id.clone(),
        reason,
    };

    let mut workbook: Xlsx<_> =
        open_workbook(path).map_err(|err| fail(format!("cannot open workbook: {err}")))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| fail("workbook has no worksheets".to_string()))?
        .map_err(|err| fail(format!("cannot read first worksheet: {err}")))?;

    let mut rows_iter = range.rows();
    let headers: Vec<String> = match rows_iter.next() {
        Some(first) => first.iter().map(cell_to_text).collect(),
        None => return Err(fail("worksheet is empty".to_string())),
    };

    let width = headers.len();
    let rows = rows_iter
        .map(|row| {
            let mut cells: Vec<String> = row.iter().take(width).map(cell_to_text).collect();
            cells.resize(width, String::new());
            cells
        })
        .collect();

    Ok(SourceTable {
        file_id: id,
        headers,
        rows,
    })
}

/// Renders one spreadsheet cell as text, preserving formatting where the
/// cell carries none of its own.
fn cell_to_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => {
            if f.fract() == 0.0 && f.abs() < 1e15 {
                (*f as i64).to_string()
            } else {
                f.to_string()
            }
        }
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(naive) if naive.time() == chrono::NaiveTime::MIN => {
                naive.format("%Y-%m-%d").to_string()
            }
            Some(naive) => naive.format("%Y-%m-%d %H:%M:%S").to_string(),
            None => dt.as_f64().to_string(),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Error(err) => format!("#ERR {err:?}"),
    }
}

/// Writes headers plus rows to a single plain-range worksheet.
pub fn write_worksheet(
    path: &Path,
    sheet_name: &str,
    headers: &[String],
    rows: &[Vec<String>],
) -> Result<()> {
    let mut workbook = rust_xlsxwriter::Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name(sheet_name)
        .with_context(|| format!("Naming worksheet '{sheet_name}'"))?;

    for (col, header) in headers.iter().enumerate() {
        worksheet
            .write_string(0, col as u16, header)
            .context("Writing header row")?;
    }
    for (row_idx, row) in rows.iter().enumerate() {
        for (col, value) in row.iter().enumerate() {
            if value.is_empty() {
                continue;
            }
            worksheet
                .write_string(row_idx as u32 + 1, col as u16, value)
                .with_context(|| format!("Writing data row {}", row_idx + 2))?;
        }
    }

    workbook
        .save(path)
        .with_context(|| format!("Saving workbook {path:?}"))?;
    Ok(())
}
