//! Per-request memoization of built region indexes.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use reporter_geography_models::RegionKind;

use crate::{BoundaryDataset, GeoError, RegionIndex};

/// Built region indexes keyed by region kind.
///
/// Create one per request (or per batch of work) and drop it afterwards.
/// Boundary data is static, so entries are never invalidated.
#[derive(Debug, Default)]
pub struct IndexCache {
    entries: BTreeMap<RegionKind, Arc<RegionIndex>>,
}

impl IndexCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the index for `kind`, building it from `loader` on first
    /// use.
    ///
    /// # Errors
    ///
    /// Propagates errors from `loader` and from [`RegionIndex::build`].
    /// Nothing is cached when loading fails.
    pub fn get_or_load<F>(
        &mut self,
        kind: RegionKind,
        loader: F,
    ) -> Result<Arc<RegionIndex>, GeoError>
    where
        F: FnOnce(RegionKind) -> Result<BoundaryDataset, GeoError>,
    {
        if let Some(index) = self.entries.get(&kind) {
            log::trace!("Reusing cached {kind} index");
            return Ok(Arc::clone(index));
        }

        let dataset = loader(kind)?;
        if dataset.kind() != kind {
            return Err(GeoError::MalformedBoundary {
                message: format!("loader for {kind} returned {} boundaries", dataset.kind()),
            });
        }

        let index = Arc::new(RegionIndex::build(dataset)?);
        self.entries.insert(kind, Arc::clone(&index));
        Ok(index)
    }

    /// Returns the index for `kind`, reading `<dir>/<kind>.geojson` on
    /// first use.
    ///
    /// # Errors
    ///
    /// See [`BoundaryDataset::load`] and [`RegionIndex::build`].
    pub fn get_or_load_dir(
        &mut self,
        kind: RegionKind,
        dir: &Path,
    ) -> Result<Arc<RegionIndex>, GeoError> {
        self.get_or_load(kind, |kind| BoundaryDataset::load(kind, dir))
    }

    /// Whether an index for `kind` has been built.
    #[must_use]
    pub fn contains(&self, kind: RegionKind) -> bool {
        self.entries.contains_key(&kind)
    }

    /// Number of cached indexes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been cached yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
