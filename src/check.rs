//! `check` command: header validation and anomaly reporting, no output
//! table.

use anyhow::{Result, bail};
use log::info;

use crate::{cli::CheckArgs, report::BatchReport, resolve, schema::Schema, workbook};

pub fn execute(args: &CheckArgs) -> Result<()> {
    let schema = Schema::from_source(&args.schema)?;
    let mut report = BatchReport::new(args.extras_threshold);

    for input in &args.inputs {
        match workbook::read_source_table(input) {
            Ok(table) => {
                let resolution = resolve::resolve(&schema, &table)?;
                info!(
                    "✓ {} ({} row(s), {} column(s), {} missing)",
                    table.file_id,
                    table.row_count(),
                    table.column_count(),
                    resolution.missing_count()
                );
                report.add_file(&schema, &table, &resolution);
            }
            Err(failure) => report.add_read_failure(&failure),
        }
    }

    report.print();
    if let Some(dir) = &args.reports_dir {
        report.write_csv(dir)?;
    }

    if report.has_missing() {
        return Err(report.gate_error().into());
    }
    if !report.read_errors.is_empty() {
        bail!("{} file(s) could not be read", report.read_errors.len());
    }
    info!("All headers verified");
    Ok(())
}
