#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for call and issue reports.

mod commands;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use reporter_geography::RegionKind;

#[derive(Parser)]
#[command(name = "reporter_cli", about = "Call and issue reports by ward and ZIP code")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Count records per ward or ZIP code
    Breakdown {
        /// JSON file with an array of call/issue records
        #[arg(long)]
        records: PathBuf,
        /// Directory holding `wards.geojson` and `zips.geojson`
        /// (defaults to `REPORTER_BOUNDARIES_DIR`, then `data/boundaries`)
        #[arg(long)]
        boundaries_dir: Option<PathBuf>,
        /// Boundaries to break down by
        #[arg(long, default_value = "wards")]
        geog: RegionKind,
        #[command(flatten)]
        filters: FilterArgs,
        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Json)]
        format: Format,
        /// Add one CSV column per category
        #[arg(long)]
        by_category: bool,
        /// Count a record only in the first region containing it when
        /// boundaries overlap
        #[arg(long)]
        first_match: bool,
        /// Output file, or a directory to write a dated file into.
        /// Writes to stdout if not set.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Dump every column of the matching records as CSV
    Export {
        /// JSON file with an array of call/issue records
        #[arg(long)]
        records: PathBuf,
        #[command(flatten)]
        filters: FilterArgs,
        /// Output file. Writes to stdout if not set.
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

/// Record selection shared by every report.
#[derive(Args, Debug, Clone, Default)]
struct FilterArgs {
    /// First day to include (`YYYY-MM-DD`, default one year ago)
    #[arg(long)]
    start_date: Option<String>,
    /// Last day to include (`YYYY-MM-DD`, default today)
    #[arg(long)]
    end_date: Option<String>,
    /// Comma-separated category names
    #[arg(long)]
    categories: Option<String>,
    /// Comma-separated ZIP codes
    #[arg(long)]
    zip_codes: Option<String>,
}

/// How a breakdown is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Region counts as JSON
    Json,
    /// Boundary features with counts as properties
    Geojson,
    /// Parameter row, header and one row per region
    Csv,
}

impl Format {
    /// File extension for outputs in this format.
    const fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Geojson => "geojson",
            Self::Csv => "csv",
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Breakdown {
            records,
            boundaries_dir,
            geog,
            filters,
            format,
            by_category,
            first_match,
            output,
        } => commands::breakdown(&commands::BreakdownRequest {
            records,
            boundaries_dir: commands::boundaries_dir(boundaries_dir),
            kind: geog,
            filters,
            format,
            by_category,
            first_match,
            output,
        }),
        Commands::Export {
            records,
            filters,
            output,
        } => commands::export(&records, &filters, output.as_deref()),
    };

    if let Err(e) = &result {
        log::error!("{e}");
    }

    result
}
