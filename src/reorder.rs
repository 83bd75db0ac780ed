//! `reorder` command: the full pipeline. Read every input, resolve headers,
//! apply the missing-column policy, project each accepted file into the
//! canonical layout, consolidate, and write the output workbook plus any
//! side reports.

use std::path::PathBuf;

use anyhow::{Result, bail};
use log::{info, warn};

use crate::{
    cli::{MissingPolicy, ReorderArgs},
    consolidate::consolidate,
    io_utils, project,
    report::BatchReport,
    resolve::{self, Resolution},
    schema::Schema,
    workbook::{self, SourceTable},
};

pub fn execute(args: &ReorderArgs) -> Result<()> {
    let schema = Schema::from_source(&args.schema)?;
    let mut report = BatchReport::new(args.extras_threshold);
    let mut resolved: Vec<(SourceTable, Resolution)> = Vec::new();

    for input in &args.inputs {
        match workbook::read_source_table(input) {
            Ok(table) => {
                let resolution = resolve::resolve(&schema, &table)?;
                report.add_file(&schema, &table, &resolution);
                resolved.push((table, resolution));
            }
            Err(failure) => report.add_read_failure(&failure),
        }
    }

    report.print();
    if let Some(dir) = &args.reports_dir {
        report.write_csv(dir)?;
    }

    if report.has_missing() && args.missing_policy == MissingPolicy::StrictBatch {
        return Err(report.gate_error().into());
    }

    let mut projected = Vec::new();
    let mut filename_stem: Option<String> = None;
    for (table, resolution) in &resolved {
        if resolution.has_missing() && args.missing_policy == MissingPolicy::SkipFile {
            warn!(
                "Skipping {} ({} required column(s) missing)",
                table.file_id,
                resolution.missing_count()
            );
            continue;
        }
        if filename_stem.is_none() {
            filename_stem = filename_column_value(&schema, table, resolution);
        }
        projected.push(project::project(&schema, table, resolution, &args.keep_extras));
        info!("✓ Reordered {}", table.file_id);
    }

    if projected.is_empty() {
        bail!("No file passed validation; nothing to consolidate");
    }

    let combined = consolidate(projected)?;
    let output: PathBuf = match &args.output {
        Some(path) => path.clone(),
        None => io_utils::derive_output_path(filename_stem.as_deref()),
    };
    workbook::write_worksheet(&output, &args.sheet, &combined.headers, &combined.rows)?;
    info!(
        "Wrote {} row(s) across {} column(s) to {:?}",
        combined.row_count(),
        combined.headers.len(),
        output
    );
    Ok(())
}

/// First non-empty value of the schema's filename column, used to derive
/// the output name when `-o` is omitted.
fn filename_column_value(
    schema: &Schema,
    table: &SourceTable,
    resolution: &Resolution,
) -> Option<String> {
    let wanted = schema.filename_column.as_deref()?;
    let index = schema.columns.iter().position(|c| c.name == wanted)?;
    let position = resolution.outcomes.get(index)?.source_position()?;
    (0..table.row_count())
        .map(|row| table.cell(row, position).trim())
        .find(|value| !value.is_empty())
        .map(str::to_string)
}
