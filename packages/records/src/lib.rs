#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Record selection for reports.
//!
//! Resolves the reporting date range, narrows the call/issue record set by
//! date, category and ZIP code, and loads records exported from the record
//! store as JSON.

pub mod dates;
pub mod filter;
pub mod load;

use thiserror::Error;

pub use dates::DateRange;
pub use filter::RecordFilter;
pub use load::{load_records, parse_records};

/// Errors that can occur while selecting records.
#[derive(Debug, Error)]
pub enum RecordError {
    /// Reading the record file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A date parameter was not `YYYY-MM-DD`.
    #[error("Invalid date '{value}': expected YYYY-MM-DD")]
    InvalidDate {
        /// The rejected input.
        value: String,
    },

    /// The start date falls after the end date.
    #[error("Invalid date range: {start} is after {end}")]
    InvalidRange {
        /// Resolved start date.
        start: chrono::NaiveDate,
        /// Resolved end date.
        end: chrono::NaiveDate,
    },
}
