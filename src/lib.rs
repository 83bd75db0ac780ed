pub mod check;
pub mod cli;
pub mod columns;
pub mod consolidate;
pub mod io_utils;
pub mod normalize;
pub mod project;
pub mod reorder;
pub mod report;
pub mod resolve;
pub mod schema;
pub mod table;
pub mod workbook;

use std::{env, sync::OnceLock};

use anyhow::Result;
use clap::Parser;
use log::LevelFilter;

use crate::cli::{Cli, Commands};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("xlsx_reorder", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Check(args) => check::execute(&args),
        Commands::Reorder(args) => reorder::execute(&args),
        Commands::Columns(args) => columns::execute(&args),
    }
}
