#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Ward and ZIP code breakdowns of call and issue records.
//!
//! Loads boundary polygons from `GeoJSON`, indexes their bounding boxes in
//! an R-tree and assigns each geocoded record to the region(s) whose
//! polygon contains it, tallying totals and per-category counts.

pub mod aggregate;
pub mod boundaries;
pub mod cache;
pub mod index;

use std::path::PathBuf;

use reporter_spatial::SpatialError;
use thiserror::Error;

pub use aggregate::{AssignmentPolicy, aggregate, feature_collection};
pub use boundaries::{BoundaryDataset, BoundaryFeature};
pub use cache::IndexCache;
pub use index::RegionIndex;
pub use reporter_geography_models::{Breakdown, CategoryCount, RegionCount, RegionKind};

/// Errors that can occur during geography operations.
#[derive(Debug, Error)]
pub enum GeoError {
    /// Reading a boundary file failed.
    #[error("IO error reading {path}: {source}")]
    Io {
        /// File that could not be read.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// `GeoJSON` parsing failed.
    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),

    /// The boundary file parsed but a feature is unusable.
    #[error("Malformed boundary: {message}")]
    MalformedBoundary {
        /// Description of what went wrong.
        message: String,
    },

    /// A boundary's bounding box was rejected by the spatial index.
    #[error("Spatial index error: {0}")]
    Spatial(#[from] SpatialError),
}
