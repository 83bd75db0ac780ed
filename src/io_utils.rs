//! Small I/O helpers: report-CSV construction and output-filename
//! derivation.

use std::{
    fs::File,
    io::BufWriter,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use chrono::Local;
use csv::QuoteStyle;

pub const DEFAULT_OUTPUT_NAME: &str = "consolidated.xlsx";

/// Writes one report table as a CSV file, quote-always for round-trip
/// safety.
pub fn write_report_csv<I>(path: &Path, headers: &[&str], rows: I) -> Result<()>
where
    I: IntoIterator<Item = Vec<String>>,
{
    let file = File::create(path).with_context(|| format!("Creating report file {path:?}"))?;
    let mut writer = csv::WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .double_quote(true)
        .from_writer(BufWriter::new(file));
    writer
        .write_record(headers)
        .context("Writing report headers")?;
    for row in rows {
        writer
            .write_record(row.iter())
            .with_context(|| format!("Writing report row to {path:?}"))?;
    }
    writer.flush().context("Flushing report file")?;
    Ok(())
}

/// Reduces free text (typically a client name cell) to a conservative file
/// stem.
pub fn sanitize_file_stem(raw: &str) -> String {
    let mut stem = String::with_capacity(raw.len());
    for ch in raw.trim().chars() {
        match ch {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '-' | '_' => stem.push(ch),
            ' ' => stem.push('_'),
            _ => {}
        }
    }
    while stem.contains("__") {
        stem = stem.replace("__", "_");
    }
    stem.trim_matches('_').to_string()
}

/// Output path used when `-o` is omitted: `{stem}_{run date}.xlsx` from the
/// schema's filename column when one was matched, else a fixed default.
pub fn derive_output_path(stem: Option<&str>) -> PathBuf {
    let stem = stem.map(sanitize_file_stem).filter(|s| !s.is_empty());
    match stem {
        Some(stem) => {
            let date = Local::now().date_naive().format("%Y-%m-%d");
            PathBuf::from(format!("{stem}_{date}.xlsx"))
        }
        None => PathBuf::from(DEFAULT_OUTPUT_NAME),
    }
}
