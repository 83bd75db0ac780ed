//! Reconciliation reporting: turns per-file resolutions into the
//! operator-facing missing / drift / extras tables and the stop-or-continue
//! decision.
//!
//! Reports are pure projections of the resolutions; nothing here mutates
//! the source tables. Every anomaly class is itemized per file and per
//! column rather than collapsed into one opaque message.

use std::{collections::BTreeSet, fs, path::Path};

use anyhow::{Context, Result};
use itertools::Itertools;
use log::{info, warn};
use thiserror::Error;

use crate::{
    io_utils, resolve::MatchOutcome, resolve::Resolution, schema::Schema, schema::index_to_letter,
    table, workbook::ReadFailure, workbook::SourceTable,
};

/// Marker used in drift rows when the expected slot is past the end of the
/// header row.
const ABSENT_MARKER: &str = "(absent)";

/// Strict-gate failure: required columns are missing somewhere in the batch.
#[derive(Debug, Error)]
#[error("{missing} required column(s) missing across {files} file(s); no output produced")]
pub struct GateError {
    pub missing: usize,
    pub files: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingRow {
    pub file_id: String,
    pub column: String,
    pub expected_letter: Option<String>,
    pub found_instead: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriftRow {
    pub file_id: String,
    pub column: String,
    pub expected_letter: String,
    pub found_at_expected: String,
    pub actual_letter: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtraRow {
    pub file_id: String,
    pub header: String,
    pub meaningful: usize,
    pub letter: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadErrorRow {
    pub file_id: String,
    pub reason: String,
}

/// Accumulated anomaly reports for one batch run.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub missing: Vec<MissingRow>,
    pub drift: Vec<DriftRow>,
    pub extras: Vec<ExtraRow>,
    pub read_errors: Vec<ReadErrorRow>,
    extras_threshold: usize,
}

impl BatchReport {
    /// `extras_threshold` is the minimum meaningful-cell count for an extra
    /// column to be reported (1 reports any data, 2 suppresses single stray
    /// sentinel values).
    pub fn new(extras_threshold: usize) -> Self {
        BatchReport {
            extras_threshold: extras_threshold.max(1),
            ..BatchReport::default()
        }
    }

    pub fn add_read_failure(&mut self, failure: &ReadFailure) {
        warn!("✗ {failure}");
        self.read_errors.push(ReadErrorRow {
            file_id: failure.file_id.clone(),
            reason: failure.reason.clone(),
        });
    }

    /// Folds one file's resolution into the batch-wide report tables.
    pub fn add_file(&mut self, schema: &Schema, table: &SourceTable, resolution: &Resolution) {
        for (column, outcome) in schema.columns.iter().zip(&resolution.outcomes) {
            match outcome {
                MatchOutcome::Matched { .. } | MatchOutcome::MatchedNormalized { .. } => {}
                MatchOutcome::MisplacedExact { expected, actual } => {
                    let at_expected = table
                        .headers
                        .get(*expected)
                        .map(|h| h.trim().to_string())
                        .unwrap_or_else(|| ABSENT_MARKER.to_string());
                    self.drift.push(DriftRow {
                        file_id: table.file_id.clone(),
                        column: column.name.clone(),
                        expected_letter: index_to_letter(*expected),
                        found_at_expected: at_expected,
                        actual_letter: index_to_letter(*actual),
                    });
                }
                MatchOutcome::Missing {
                    expected,
                    found_instead,
                } => {
                    self.missing.push(MissingRow {
                        file_id: table.file_id.clone(),
                        column: column.name.clone(),
                        expected_letter: expected.map(index_to_letter),
                        found_instead: found_instead.clone(),
                    });
                }
            }
        }
        for extra in &resolution.extras {
            if extra.meaningful >= self.extras_threshold {
                self.extras.push(ExtraRow {
                    file_id: table.file_id.clone(),
                    header: extra.header.clone(),
                    meaningful: extra.meaningful,
                    letter: index_to_letter(extra.position),
                });
            }
        }
    }

    pub fn has_missing(&self) -> bool {
        !self.missing.is_empty()
    }

    /// Files with at least one missing required column, sorted by file id.
    pub fn files_with_missing(&self) -> BTreeSet<String> {
        self.missing.iter().map(|row| row.file_id.clone()).collect()
    }

    pub fn gate_error(&self) -> GateError {
        GateError {
            missing: self.missing.len(),
            files: self.files_with_missing().len(),
        }
    }

    /// Renders every non-empty report section to the console.
    pub fn print(&self) {
        if !self.read_errors.is_empty() {
            warn!("{} file(s) could not be read:", self.read_errors.len());
            let rows = self
                .read_errors
                .iter()
                .map(|r| vec![r.file_id.clone(), r.reason.clone()])
                .collect_vec();
            table::print_table(&headers(&["file", "error"]), &rows);
        }
        if self.has_missing() {
            warn!(
                "{} required column(s) missing in {} file(s):",
                self.missing.len(),
                self.files_with_missing().len()
            );
            let rows = self
                .missing
                .iter()
                .map(|r| {
                    vec![
                        r.file_id.clone(),
                        r.column.clone(),
                        r.expected_letter.clone().unwrap_or_default(),
                        r.found_instead.clone().unwrap_or_default(),
                    ]
                })
                .collect_vec();
            table::print_table(
                &headers(&["file", "missing column", "expected at", "found instead"]),
                &rows,
            );
        }
        if !self.drift.is_empty() {
            info!("{} column(s) found away from their expected position:", self.drift.len());
            let rows = self
                .drift
                .iter()
                .map(|r| {
                    vec![
                        r.file_id.clone(),
                        r.column.clone(),
                        r.expected_letter.clone(),
                        r.found_at_expected.clone(),
                        r.actual_letter.clone(),
                    ]
                })
                .collect_vec();
            table::print_table(
                &headers(&["file", "column", "expected at", "found there", "actual at"]),
                &rows,
            );
        }
        if !self.extras.is_empty() {
            info!(
                "{} unmapped column(s) carry data (threshold >= {}):",
                self.extras.len(),
                self.extras_threshold
            );
            let rows = self
                .extras
                .iter()
                .map(|r| {
                    vec![
                        r.file_id.clone(),
                        r.header.clone(),
                        r.letter.clone(),
                        r.meaningful.to_string(),
                    ]
                })
                .collect_vec();
            table::print_table(&headers(&["file", "header", "at", "values"]), &rows);
        }
    }

    /// Writes each non-empty report section as a CSV under `dir`.
    pub fn write_csv(&self, dir: &Path) -> Result<()> {
        fs::create_dir_all(dir).with_context(|| format!("Creating reports directory {dir:?}"))?;
        if self.has_missing() {
            let rows = self.missing.iter().map(|r| {
                vec![
                    r.file_id.clone(),
                    r.column.clone(),
                    r.expected_letter.clone().unwrap_or_default(),
                    r.found_instead.clone().unwrap_or_default(),
                ]
            });
            io_utils::write_report_csv(
                &dir.join("missing.csv"),
                &["file", "column", "expected_letter", "found_instead"],
                rows,
            )?;
        }
        if !self.drift.is_empty() {
            let rows = self.drift.iter().map(|r| {
                vec![
                    r.file_id.clone(),
                    r.column.clone(),
                    r.expected_letter.clone(),
                    r.found_at_expected.clone(),
                    r.actual_letter.clone(),
                ]
            });
            io_utils::write_report_csv(
                &dir.join("drift.csv"),
                &[
                    "file",
                    "column",
                    "expected_letter",
                    "found_at_expected",
                    "actual_letter",
                ],
                rows,
            )?;
        }
        if !self.extras.is_empty() {
            let rows = self.extras.iter().map(|r| {
                vec![
                    r.file_id.clone(),
                    r.header.clone(),
                    r.letter.clone(),
                    r.meaningful.to_string(),
                ]
            });
            io_utils::write_report_csv(
                &dir.join("extras.csv"),
                &["file", "header", "letter", "meaningful_values"],
                rows,
            )?;
        }
        if !self.read_errors.is_empty() {
            let rows = self
                .read_errors
                .iter()
                .map(|r| vec![r.file_id.clone(), r.reason.clone()]);
            io_utils::write_report_csv(
                &dir.join("read_errors.csv"),
                &["file", "error"],
                rows,
            )?;
        }
        Ok(())
    }
}

fn headers(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}
