//! Row-wise consolidation of projected tables into one download.
//!
//! All inputs share the canonical column set by construction, which is
//! re-checked here; rows are appended in file arrival order with per-file
//! row order preserved. No deduplication, no sorting, no keys.

use anyhow::{Result, anyhow, ensure};
use log::info;

use crate::project::OutputTable;

pub fn consolidate(tables: Vec<OutputTable>) -> Result<OutputTable> {
    let mut iter = tables.into_iter();
    let mut combined = iter
        .next()
        .ok_or_else(|| anyhow!("No accepted files to consolidate"))?;

    for (idx, table) in iter.enumerate() {
        ensure!(
            table.headers == combined.headers,
            "Projected table {} does not share the canonical column set",
            idx + 2
        );
        combined.rows.extend(table.rows);
    }

    info!(
        "Consolidated {} row(s) across {} column(s)",
        combined.row_count(),
        combined.headers.len()
    );
    Ok(combined)
}
