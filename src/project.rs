//! Schema projection: builds the canonical output table for one source file.
//!
//! Columns are emitted in schema order under their canonical output names
//! (renames are a final cosmetic pass and never affect matching), followed
//! by the provenance column, followed by any operator-selected extra
//! columns. Column identity and order are invariant across every file in a
//! batch, so unmatched columns are filled with empty cells rather than
//! omitted.

use crate::{
    normalize::headers_equivalent,
    resolve::Resolution,
    schema::Schema,
    workbook::SourceTable,
};

/// A projected (or consolidated) table ready for serialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl OutputTable {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Projects one resolved source table into the canonical layout.
///
/// `keep_extras` carries operator-selected non-canonical columns through to
/// the output; they are located by normalized header equality and filled
/// empty when a file lacks them, keeping the batch column set invariant.
pub fn project(
    schema: &Schema,
    table: &SourceTable,
    resolution: &Resolution,
    keep_extras: &[String],
) -> OutputTable {
    let mut headers = schema.output_headers();
    headers.push(schema.provenance_header.clone());
    headers.extend(keep_extras.iter().map(|h| h.trim().to_string()));

    let source_positions: Vec<Option<usize>> = resolution
        .outcomes
        .iter()
        .map(|outcome| outcome.source_position())
        .collect();
    let extra_positions: Vec<Option<usize>> = keep_extras
        .iter()
        .map(|wanted| {
            resolution
                .extras
                .iter()
                .find(|extra| headers_equivalent(&extra.header, wanted))
                .map(|extra| extra.position)
        })
        .collect();

    let rows = (0..table.row_count())
        .map(|row| {
            let mut cells = Vec::with_capacity(headers.len());
            for position in &source_positions {
                cells.push(match position {
                    Some(col) => table.cell(row, *col).to_string(),
                    None => String::new(),
                });
            }
            cells.push(table.file_id.clone());
            for position in &extra_positions {
                cells.push(match position {
                    Some(col) => table.cell(row, *col).to_string(),
                    None => String::new(),
                });
            }
            cells
        })
        .collect();

    OutputTable { headers, rows }
}
