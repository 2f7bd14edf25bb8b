#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CSV exports for reports.
//!
//! Two exports exist: the region breakdown (one row per ward or ZIP code)
//! and the full record dump (one row per call or issue, columns driven by
//! [`columns::RECORD_COLUMNS`]). Report titles and download file names are
//! derived from the reporting date range.

pub mod breakdown;
pub mod columns;
pub mod naming;

use thiserror::Error;

pub use breakdown::{CsvLayout, ExportParams, write_breakdown_csv};
pub use columns::{Column, RECORD_COLUMNS, write_records_csv};
pub use naming::{export_filename, report_title};

/// Errors that can occur while writing an export.
#[derive(Debug, Error)]
pub enum ExportError {
    /// CSV serialization failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Writing to the output failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
