#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! In-memory spatial index for region attribution.
//!
//! Holds bounding boxes of boundary polygons (wards, ZIP codes) in an
//! R-tree so that a point lookup only has to run the exact
//! point-in-polygon test against the handful of polygons whose box
//! contains the point.

pub mod bbox;
pub mod containment;
mod index;

use thiserror::Error;

pub use bbox::BoundingBox;
pub use containment::{multi_polygon_contains, polygon_contains};
pub use index::{IndexEntry, SpatialIndex};

/// Errors that can occur while building a spatial index.
#[derive(Debug, Error)]
pub enum SpatialError {
    /// A bounding box had `min > max` on an axis or a non-finite corner.
    #[error("Malformed bounding box: {message}")]
    MalformedBoundingBox {
        /// Description of what went wrong.
        message: String,
    },
}
