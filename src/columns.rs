//! `columns` command: renders a schema's column table for inspection.

use anyhow::Result;
use log::info;

use crate::{cli::ColumnsArgs, schema::Schema, table};

pub fn execute(args: &ColumnsArgs) -> Result<()> {
    let schema = Schema::from_source(&args.schema)?;

    let mut rows = Vec::with_capacity(schema.columns.len());
    for (idx, column) in schema.columns.iter().enumerate() {
        let position = (idx + 1).to_string();
        let letter = column.letter.clone().unwrap_or_default();
        let locator = if column.letter.is_some() {
            "position"
        } else {
            "name"
        };
        let rename = if column.output_name() != column.name {
            column.output_name().to_string()
        } else {
            String::new()
        };
        rows.push(vec![
            position,
            letter,
            column.name.clone(),
            locator.to_string(),
            rename,
        ]);
    }

    let headers = ["#", "letter", "name", "locator", "output"]
        .iter()
        .map(|h| h.to_string())
        .collect::<Vec<_>>();
    table::print_table(&headers, &rows);
    info!(
        "Listed {} column(s) from schema '{}'",
        schema.columns.len(),
        schema.schema_version.as_deref().unwrap_or("unversioned")
    );
    Ok(())
}
