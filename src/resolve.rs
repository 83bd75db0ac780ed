//! Header resolution: maps each canonical schema column to at most one
//! column of a source table, and identifies the leftover columns.
//!
//! Two locator strategies exist, chosen per column by the schema:
//!
//! - **Positional**: the header at the configured letter is compared
//!   character-for-character (after trimming). A mismatch falls back to an
//!   exact search across the whole header row, which distinguishes a
//!   misplaced header from a truly absent one.
//! - **By name**: an exact search first, then a second pass under
//!   [`crate::normalize::normalize_header`] to absorb accent, spacing, and
//!   symbol variants.
//!
//! Where a header occurs more than once, the first occurrence wins.

use anyhow::Result;

use crate::{
    normalize::{is_meaningful_cell, normalize_header},
    schema::{Locator, Schema},
    workbook::SourceTable,
};

/// Outcome of locating one canonical column in a source header row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchOutcome {
    /// Exact match where the locator expects it.
    Matched { position: usize },
    /// Found by name, but only under normalization.
    MatchedNormalized { position: usize, found: String },
    /// Exact header text found at a different position than configured.
    MisplacedExact { expected: usize, actual: usize },
    /// Not found anywhere. For positional locators, records what actually
    /// occupied the expected slot, if anything.
    Missing {
        expected: Option<usize>,
        found_instead: Option<String>,
    },
}

impl MatchOutcome {
    /// The source column the projector should copy from, if any.
    pub fn source_position(&self) -> Option<usize> {
        match self {
            MatchOutcome::Matched { position } => Some(*position),
            MatchOutcome::MatchedNormalized { position, .. } => Some(*position),
            MatchOutcome::MisplacedExact { actual, .. } => Some(*actual),
            MatchOutcome::Missing { .. } => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, MatchOutcome::Missing { .. })
    }
}

/// A source column not claimed by any schema column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtraColumn {
    pub header: String,
    pub position: usize,
    /// Cells that are non-empty, not a placeholder literal, and not an echo
    /// of the column's own header.
    pub meaningful: usize,
}

/// Full resolution of one source table against a schema: one outcome per
/// schema column (in schema order) plus the unclaimed leftovers.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub outcomes: Vec<MatchOutcome>,
    pub extras: Vec<ExtraColumn>,
}

impl Resolution {
    pub fn missing_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_missing()).count()
    }

    pub fn has_missing(&self) -> bool {
        self.outcomes.iter().any(MatchOutcome::is_missing)
    }
}

pub fn resolve(schema: &Schema, table: &SourceTable) -> Result<Resolution> {
    let trimmed: Vec<&str> = table.headers.iter().map(|h| h.trim()).collect();
    let normalized: Vec<String> = table.headers.iter().map(|h| normalize_header(h)).collect();

    let mut outcomes = Vec::with_capacity(schema.columns.len());
    for column in &schema.columns {
        let expected = column.name.trim();
        let outcome = match column.locator()? {
            Locator::Position(index) => resolve_positional(expected, index, &trimmed),
            Locator::Name => resolve_by_name(expected, &trimmed, &normalized),
        };
        outcomes.push(outcome);
    }

    let claimed: Vec<usize> = outcomes
        .iter()
        .filter_map(MatchOutcome::source_position)
        .collect();
    let extras = (0..table.column_count())
        .filter(|position| !claimed.contains(position))
        .map(|position| ExtraColumn {
            header: trimmed[position].to_string(),
            position,
            meaningful: (0..table.row_count())
                .filter(|row| is_meaningful_cell(table.cell(*row, position), trimmed[position]))
                .count(),
        })
        .collect();

    Ok(Resolution { outcomes, extras })
}

fn resolve_positional(expected: &str, index: usize, headers: &[&str]) -> MatchOutcome {
    let Some(found) = headers.get(index) else {
        return MatchOutcome::Missing {
            expected: Some(index),
            found_instead: None,
        };
    };
    if *found == expected {
        return MatchOutcome::Matched { position: index };
    }
    match headers.iter().position(|h| *h == expected) {
        Some(actual) => MatchOutcome::MisplacedExact {
            expected: index,
            actual,
        },
        None => MatchOutcome::Missing {
            expected: Some(index),
            found_instead: Some(found.to_string()),
        },
    }
}

fn resolve_by_name(expected: &str, headers: &[&str], normalized: &[String]) -> MatchOutcome {
    if let Some(position) = headers.iter().position(|h| *h == expected) {
        return MatchOutcome::Matched { position };
    }
    let wanted = normalize_header(expected);
    match normalized.iter().position(|h| *h == wanted) {
        Some(position) => MatchOutcome::MatchedNormalized {
            position,
            found: headers[position].to_string(),
        },
        None => MatchOutcome::Missing {
            expected: None,
            found_instead: None,
        },
    }
}
