//! Boundary datasets paired with their R-tree.

use reporter_geography_models::RegionKind;
use reporter_spatial::SpatialIndex;

use crate::{BoundaryDataset, GeoError};

/// A boundary dataset with an R-tree over its features' bounding boxes.
///
/// Index payloads are positions into [`BoundaryDataset::features`]; the
/// geometry itself stays owned by the dataset.
#[derive(Debug)]
pub struct RegionIndex {
    dataset: BoundaryDataset,
    index: SpatialIndex<usize>,
}

impl RegionIndex {
    /// Inserts every feature's bounding box into a fresh index.
    ///
    /// # Errors
    ///
    /// Returns [`GeoError::Spatial`] if a feature's bounding box is
    /// malformed (e.g. non-finite coordinates).
    pub fn build(dataset: BoundaryDataset) -> Result<Self, GeoError> {
        let mut index = SpatialIndex::new();
        for (position, feature) in dataset.features().iter().enumerate() {
            index.insert(position, *feature.bbox())?;
        }

        log::info!(
            "Built spatial index over {} {} boundaries",
            index.len(),
            dataset.kind()
        );

        Ok(Self { dataset, index })
    }

    /// The indexed boundaries.
    #[must_use]
    pub const fn dataset(&self) -> &BoundaryDataset {
        &self.dataset
    }

    /// Which boundary set is indexed.
    #[must_use]
    pub const fn kind(&self) -> RegionKind {
        self.dataset.kind()
    }

    /// Positions of features whose bounding box contains the point.
    ///
    /// May include features whose polygon does not contain the point.
    pub fn candidates(&self, lon: f64, lat: f64) -> impl Iterator<Item = usize> {
        self.index.query_point(lon, lat).map(|entry| *entry.payload())
    }

    /// Positions of features whose polygon contains the point, in
    /// unspecified order.
    pub fn locate(&self, lon: f64, lat: f64) -> impl Iterator<Item = usize> {
        self.candidates(lon, lat)
            .filter(move |&position| self.dataset.features()[position].contains(lon, lat))
    }
}
