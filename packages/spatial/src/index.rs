//! R-tree over bounding-box-tagged payloads.

use rstar::{AABB, RTree, RTreeObject};

use crate::{BoundingBox, SpatialError};

/// A payload stored in the R-tree together with its bounding box.
#[derive(Debug, Clone)]
pub struct IndexEntry<T> {
    payload: T,
    bbox: BoundingBox,
}

impl<T> IndexEntry<T> {
    /// The value this entry was inserted with.
    #[must_use]
    pub const fn payload(&self) -> &T {
        &self.payload
    }

    /// The bounding box this entry was inserted with.
    #[must_use]
    pub const fn bbox(&self) -> &BoundingBox {
        &self.bbox
    }
}

impl<T> RTreeObject for IndexEntry<T> {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.bbox.envelope()
    }
}

/// Bounding-box index answering "which boxes contain this point".
///
/// Point queries return a superset of the true matches: every entry whose
/// box contains the point, including false positives that the caller has
/// to filter with an exact geometry test.
#[derive(Debug)]
pub struct SpatialIndex<T> {
    tree: RTree<IndexEntry<T>>,
}

impl<T> Default for SpatialIndex<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SpatialIndex<T> {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self { tree: RTree::new() }
    }

    /// Builds an index from a known set of entries in one pass.
    ///
    /// # Errors
    ///
    /// Returns [`SpatialError::MalformedBoundingBox`] if any box is
    /// malformed. Nothing is built in that case.
    pub fn bulk_load(entries: Vec<(T, BoundingBox)>) -> Result<Self, SpatialError> {
        let entries = entries
            .into_iter()
            .map(|(payload, bbox)| Self::entry(payload, bbox))
            .collect::<Result<Vec<_>, _>>()?;

        log::debug!("Bulk loading {} entries into spatial index", entries.len());

        Ok(Self {
            tree: RTree::bulk_load(entries),
        })
    }

    /// Adds one payload tagged with its bounding box.
    ///
    /// # Errors
    ///
    /// Returns [`SpatialError::MalformedBoundingBox`] if `bbox` has
    /// `min > max` on either axis or a non-finite corner. The index is left
    /// unchanged.
    pub fn insert(&mut self, payload: T, bbox: BoundingBox) -> Result<(), SpatialError> {
        let entry = Self::entry(payload, bbox)?;
        self.tree.insert(entry);
        Ok(())
    }

    /// Lazily yields every entry whose bounding box contains `(x, y)`.
    ///
    /// Box edges count as inside. The order of the results is unspecified.
    pub fn query_point(&self, x: f64, y: f64) -> impl Iterator<Item = &IndexEntry<T>> {
        self.tree.locate_in_envelope_intersecting(&AABB::from_point([x, y]))
    }

    /// Iterates over all entries in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = &IndexEntry<T>> {
        self.tree.iter()
    }

    /// Number of entries in the index.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    /// Whether the index has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    fn entry(payload: T, bbox: BoundingBox) -> Result<IndexEntry<T>, SpatialError> {
        bbox.validate()?;
        Ok(IndexEntry { payload, bbox })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payloads_at(index: &SpatialIndex<u32>, x: f64, y: f64) -> Vec<u32> {
        let mut found: Vec<u32> = index.query_point(x, y).map(|e| *e.payload()).collect();
        found.sort_unstable();
        found
    }

    #[test]
    fn empty_index_returns_nothing() {
        let index = SpatialIndex::<u32>::new();
        assert!(index.is_empty());
        assert_eq!(index.query_point(0.0, 0.0).count(), 0);
    }

    #[test]
    fn finds_containing_boxes() {
        let mut index = SpatialIndex::new();
        index.insert(1, BoundingBox::new(0.0, 0.0, 1.0, 1.0)).unwrap();
        index.insert(2, BoundingBox::new(2.0, 0.0, 3.0, 1.0)).unwrap();
        index.insert(3, BoundingBox::new(0.5, 0.5, 2.5, 2.5)).unwrap();

        assert_eq!(index.len(), 3);
        assert_eq!(payloads_at(&index, 0.25, 0.25), vec![1]);
        assert_eq!(payloads_at(&index, 0.75, 0.75), vec![1, 3]);
        assert_eq!(payloads_at(&index, 2.25, 0.75), vec![2, 3]);
        assert!(payloads_at(&index, 5.0, 5.0).is_empty());
    }

    #[test]
    fn box_edges_are_inclusive() {
        let mut index = SpatialIndex::new();
        index.insert(7, BoundingBox::new(0.0, 0.0, 1.0, 1.0)).unwrap();
        assert_eq!(payloads_at(&index, 1.0, 0.0), vec![7]);
    }

    #[test]
    fn malformed_insert_leaves_index_unchanged() {
        let mut index = SpatialIndex::new();
        index.insert(1, BoundingBox::new(0.0, 0.0, 1.0, 1.0)).unwrap();

        let result = index.insert(2, BoundingBox::new(1.0, 0.0, 0.0, 1.0));
        assert!(matches!(
            result,
            Err(SpatialError::MalformedBoundingBox { .. })
        ));
        assert_eq!(index.len(), 1);
        assert_eq!(payloads_at(&index, 0.5, 0.5), vec![1]);
    }

    #[test]
    fn bulk_load_rejects_any_malformed_box() {
        let result = SpatialIndex::bulk_load(vec![
            (1, BoundingBox::new(0.0, 0.0, 1.0, 1.0)),
            (2, BoundingBox::new(0.0, 2.0, 1.0, 1.0)),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn never_misses_a_containing_box_across_splits() {
        // A 20x20 grid of unit cells forces many node splits.
        let mut index = SpatialIndex::new();
        for row in 0..20_u32 {
            for col in 0..20_u32 {
                let (x, y) = (f64::from(col), f64::from(row));
                index
                    .insert(row * 20 + col, BoundingBox::new(x, y, x + 1.0, y + 1.0))
                    .unwrap();
            }
        }
        assert_eq!(index.len(), 400);

        for row in 0..20_u32 {
            for col in 0..20_u32 {
                let (x, y) = (f64::from(col) + 0.5, f64::from(row) + 0.5);
                assert_eq!(payloads_at(&index, x, y), vec![row * 20 + col]);
            }
        }
    }

    #[test]
    fn bulk_load_and_incremental_insert_agree() {
        let boxes: Vec<(u32, BoundingBox)> = (0..50_u32)
            .map(|i| {
                let x = f64::from(i % 10) * 1.5;
                let y = f64::from(i / 10) * 1.5;
                (i, BoundingBox::new(x, y, x + 2.0, y + 2.0))
            })
            .collect();

        let bulk = SpatialIndex::bulk_load(boxes.clone()).unwrap();
        let mut incremental = SpatialIndex::new();
        for (payload, bbox) in boxes {
            incremental.insert(payload, bbox).unwrap();
        }

        for (x, y) in [(0.5, 0.5), (1.75, 1.75), (7.6, 3.1), (14.0, 7.0), (20.0, 20.0)] {
            assert_eq!(payloads_at(&bulk, x, y), payloads_at(&incremental, x, y));
        }
    }

    #[test]
    fn entries_expose_their_box() {
        let bbox = BoundingBox::new(-87.9, 41.6, -87.5, 42.0);
        let mut index = SpatialIndex::new();
        index.insert("ward", bbox).unwrap();
        let entry = index.query_point(-87.7, 41.8).next().unwrap();
        assert_eq!(*entry.payload(), "ward");
        assert_eq!(entry.bbox(), &bbox);
        assert_eq!(entry.envelope().lower(), [-87.9, 41.6]);
        assert_eq!(entry.envelope().upper(), [-87.5, 42.0]);
    }
}
