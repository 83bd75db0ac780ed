use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(author, version, about = "Validate, reorder, and consolidate laboratory spreadsheets", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Validate spreadsheet headers against a canonical schema and report anomalies
    Check(CheckArgs),
    /// Reorder one or more spreadsheets into the canonical column layout and consolidate them
    Reorder(ReorderArgs),
    /// List the columns defined by a canonical schema
    Columns(ColumnsArgs),
}

/// Policy applied when a required canonical column is missing from a file.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
#[value(rename_all = "kebab-case")]
pub enum MissingPolicy {
    /// Halt the whole batch before producing any output
    StrictBatch,
    /// Exclude the offending file and continue with the rest
    SkipFile,
    /// Keep the file and fill missing columns with empty cells
    FillEmpty,
}

impl Default for MissingPolicy {
    fn default() -> Self {
        MissingPolicy::StrictBatch
    }
}

#[derive(Debug, Args)]
pub struct SchemaSource {
    /// Canonical schema YAML file
    #[arg(short, long, conflicts_with = "builtin")]
    pub schema: Option<PathBuf>,
    /// Name of a built-in schema version (e.g. mobilserv-v2)
    #[arg(long)]
    pub builtin: Option<String>,
}

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// One or more .xlsx files to validate
    #[arg(short = 'i', long = "input", required = true, action = clap::ArgAction::Append)]
    pub inputs: Vec<PathBuf>,
    #[command(flatten)]
    pub schema: SchemaSource,
    /// Minimum meaningful-cell count for an extra column to be reported
    #[arg(long = "extras-threshold", default_value_t = 1)]
    pub extras_threshold: usize,
    /// Directory to write missing/drift/extras report CSVs into
    #[arg(long = "reports-dir")]
    pub reports_dir: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct ReorderArgs {
    /// One or more .xlsx files to reorder and consolidate
    #[arg(short = 'i', long = "input", required = true, action = clap::ArgAction::Append)]
    pub inputs: Vec<PathBuf>,
    /// Output .xlsx file (derived from schema metadata if omitted)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
    #[command(flatten)]
    pub schema: SchemaSource,
    /// Policy for files missing a required column
    #[arg(long = "missing-policy", value_enum, default_value = "strict-batch")]
    pub missing_policy: MissingPolicy,
    /// Minimum meaningful-cell count for an extra column to be reported
    #[arg(long = "extras-threshold", default_value_t = 1)]
    pub extras_threshold: usize,
    /// Carry a non-canonical source column through to the output (repeatable)
    #[arg(long = "keep-extra", action = clap::ArgAction::Append)]
    pub keep_extras: Vec<String>,
    /// Directory to write missing/drift/extras report CSVs into
    #[arg(long = "reports-dir")]
    pub reports_dir: Option<PathBuf>,
    /// Worksheet name for the consolidated output
    #[arg(long, default_value = "Consolidado")]
    pub sheet: String,
}

#[derive(Debug, Args)]
pub struct ColumnsArgs {
    #[command(flatten)]
    pub schema: SchemaSource,
}
