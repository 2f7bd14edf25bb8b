//! Axis-aligned bounding boxes in (longitude, latitude) space.

use geo::{BoundingRect, MultiPolygon};
use rstar::AABB;

use crate::SpatialError;

/// An axis-aligned bounding box.
///
/// Corners are stored as-is; use [`BoundingBox::validate`] (called by
/// [`crate::SpatialIndex::insert`]) to reject inverted or non-finite boxes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// Western longitude boundary.
    pub west: f64,
    /// Southern latitude boundary.
    pub south: f64,
    /// Eastern longitude boundary.
    pub east: f64,
    /// Northern latitude boundary.
    pub north: f64,
}

impl BoundingBox {
    /// Creates a new bounding box from the given coordinates.
    #[must_use]
    pub const fn new(west: f64, south: f64, east: f64, north: f64) -> Self {
        Self {
            west,
            south,
            east,
            north,
        }
    }

    /// Computes the bounding box of a [`MultiPolygon`].
    ///
    /// Returns `None` for an empty geometry.
    #[must_use]
    pub fn of_multi_polygon(mp: &MultiPolygon<f64>) -> Option<Self> {
        mp.bounding_rect()
            .map(|rect| Self::new(rect.min().x, rect.min().y, rect.max().x, rect.max().y))
    }

    /// Checks that every corner is finite and `min <= max` on both axes.
    ///
    /// # Errors
    ///
    /// Returns [`SpatialError::MalformedBoundingBox`] describing the first
    /// violated condition.
    pub fn validate(&self) -> Result<(), SpatialError> {
        let corners = [self.west, self.south, self.east, self.north];
        if corners.iter().any(|c| !c.is_finite()) {
            return Err(SpatialError::MalformedBoundingBox {
                message: format!("non-finite corner in {self:?}"),
            });
        }
        if self.west > self.east {
            return Err(SpatialError::MalformedBoundingBox {
                message: format!("west ({}) must be <= east ({})", self.west, self.east),
            });
        }
        if self.south > self.north {
            return Err(SpatialError::MalformedBoundingBox {
                message: format!("south ({}) must be <= north ({})", self.south, self.north),
            });
        }
        Ok(())
    }

    /// Whether the point lies inside the box. Edges count as inside.
    #[must_use]
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        x >= self.west && x <= self.east && y >= self.south && y <= self.north
    }

    /// Area in square degrees.
    #[must_use]
    pub fn area(&self) -> f64 {
        (self.east - self.west) * (self.north - self.south)
    }

    pub(crate) fn envelope(&self) -> AABB<[f64; 2]> {
        AABB::from_corners([self.west, self.south], [self.east, self.north])
    }
}
