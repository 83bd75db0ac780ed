//! Canonical schema model, YAML persistence, and column-letter arithmetic.
//!
//! A [`Schema`] is the ordered list of canonical output columns a source
//! spreadsheet must satisfy. Each [`ColumnSpec`] carries a locator: a fixed
//! spreadsheet column letter (positional matching) or, when no letter is
//! given, the canonical name itself (by-name matching). Schema order defines
//! output column order.
//!
//! Schemas are plain YAML documents so deployments can version and extend
//! them without a rebuild; one historical schema ships embedded and is
//! selectable by name.

use std::{collections::HashSet, fs::File, io::BufReader, path::Path};

use anyhow::{Context, Result, anyhow, bail, ensure};
use serde::{Deserialize, Serialize};

use crate::cli::SchemaSource;

pub const DEFAULT_PROVENANCE_HEADER: &str = "ARCHIVO_ORIGEN";

const BUILTIN_SCHEMAS: &[(&str, &str)] = &[(
    "mobilserv-v2",
    include_str!("schemas/mobilserv_v2.yaml"),
)];

/// How a canonical column is located inside a source header row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
    /// Fixed spreadsheet position, 0-based column index.
    Position(usize),
    /// Exact (then normalized) search across the whole header row.
    Name,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ColumnSpec {
    /// Canonical name, matched against source headers and used as the
    /// output header unless a rename applies.
    pub name: String,
    /// Spreadsheet column letter where this header is expected; absent
    /// means the column is located by name anywhere in the header row.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub letter: Option<String>,
    /// Cosmetic output rename, applied after matching.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rename: Option<String>,
}

impl ColumnSpec {
    pub fn locator(&self) -> Result<Locator> {
        match &self.letter {
            Some(letter) => Ok(Locator::Position(letter_to_index(letter)?)),
            None => Ok(Locator::Name),
        }
    }

    /// Header the column carries in the output table.
    pub fn output_name(&self) -> &str {
        match self
            .rename
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
        {
            Some(rename) => rename,
            None => &self.name,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schema {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_version: Option<String>,
    /// Header of the trailing column recording which file each row came from.
    #[serde(default = "Schema::default_provenance_header")]
    pub provenance_header: String,
    /// Canonical column whose first data value seeds the derived output
    /// filename (typically the client name).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename_column: Option<String>,
    pub columns: Vec<ColumnSpec>,
}

impl Schema {
    pub fn default_provenance_header() -> String {
        DEFAULT_PROVENANCE_HEADER.to_string()
    }

    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("Opening schema file {path:?}"))?;
        let reader = BufReader::new(file);
        let schema: Schema = serde_yaml::from_reader(reader).context("Parsing schema YAML")?;
        schema.validate()?;
        Ok(schema)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        self.validate()?;
        let file = File::create(path).with_context(|| format!("Creating schema file {path:?}"))?;
        serde_yaml::to_writer(file, self).context("Writing schema YAML")
    }

    pub fn builtin(name: &str) -> Result<Self> {
        let trimmed = name.trim();
        let source = BUILTIN_SCHEMAS
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(trimmed))
            .map(|(_, body)| *body)
            .ok_or_else(|| {
                anyhow!(
                    "Unknown built-in schema '{trimmed}'. Available: {}",
                    Schema::builtin_names().join(", ")
                )
            })?;
        let schema: Schema =
            serde_yaml::from_str(source).context("Parsing built-in schema YAML")?;
        schema.validate()?;
        Ok(schema)
    }

    pub fn builtin_names() -> Vec<&'static str> {
        BUILTIN_SCHEMAS.iter().map(|(key, _)| *key).collect()
    }

    /// Resolves the `--schema <path>` / `--builtin <name>` CLI pair.
    pub fn from_source(source: &SchemaSource) -> Result<Self> {
        match (&source.schema, &source.builtin) {
            (Some(path), None) => Schema::load(path),
            (None, Some(name)) => Schema::builtin(name),
            (None, None) => Err(anyhow!(
                "A schema is required: pass --schema <file> or --builtin <name>"
            )),
            (Some(_), Some(_)) => Err(anyhow!(
                "--schema and --builtin are mutually exclusive"
            )),
        }
    }

    /// Output headers in canonical order, renames applied, before the
    /// provenance column is appended.
    pub fn output_headers(&self) -> Vec<String> {
        self.columns
            .iter()
            .map(|c| c.output_name().to_string())
            .collect()
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            !self.columns.is_empty(),
            "Schema must define at least one column"
        );
        ensure!(
            !self.provenance_header.trim().is_empty(),
            "Provenance header must not be empty"
        );
        let mut names = HashSet::new();
        let mut letters = HashSet::new();
        for column in &self.columns {
            let name = column.name.trim();
            ensure!(!name.is_empty(), "Schema column names must not be empty");
            ensure!(
                names.insert(name.to_string()),
                "Duplicate schema column '{name}'"
            );
            if let Some(letter) = &column.letter {
                let index = letter_to_index(letter)
                    .with_context(|| format!("Column '{name}'"))?;
                ensure!(
                    letters.insert(index),
                    "Duplicate schema column letter '{}' on '{name}'",
                    letter.trim().to_ascii_uppercase()
                );
            }
        }
        if let Some(filename_column) = &self.filename_column {
            ensure!(
                self.columns.iter().any(|c| c.name == *filename_column),
                "filename_column '{filename_column}' is not a schema column"
            );
        }
        Ok(())
    }
}

/// Converts a 1-based spreadsheet column letter (`A`, `Z`, `AA`, `BZ`, ...)
/// to a 0-based column index.
pub fn letter_to_index(letter: &str) -> Result<usize> {
    let trimmed = letter.trim();
    if trimmed.is_empty() {
        bail!("Column letter must not be empty");
    }
    let mut index = 0usize;
    for ch in trimmed.chars() {
        let upper = ch.to_ascii_uppercase();
        if !upper.is_ascii_uppercase() {
            bail!("Invalid column letter '{trimmed}'");
        }
        index = index
            .checked_mul(26)
            .and_then(|i| i.checked_add(upper as usize - 'A' as usize + 1))
            .ok_or_else(|| anyhow!("Column letter '{trimmed}' overflows"))?;
    }
    Ok(index - 1)
}

/// Converts a 0-based column index back to its spreadsheet letter.
pub fn index_to_letter(index: usize) -> String {
    let mut remaining = index + 1;
    let mut letters = Vec::new();
    while remaining > 0 {
        let digit = (remaining - 1) % 26;
        letters.push((b'A' + digit as u8) as char);
        remaining = (remaining - 1) / 26;
    }
    letters.iter().rev().collect()
}
