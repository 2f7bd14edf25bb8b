//! Point-in-polygon aggregation of geocoded records.

use std::borrow::Borrow;

use geojson::{Feature, FeatureCollection};
use reporter_geography_models::{Breakdown, RegionCount};
use reporter_records_models::GeocodedRecord;

use crate::RegionIndex;

/// What to do with a record whose point lies in more than one region.
///
/// Administrative boundaries are expected to be disjoint, but nothing
/// validates that.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AssignmentPolicy {
    /// Count the record in every region that contains it.
    #[default]
    AllContaining,
    /// Count the record only in the containing region that comes first in
    /// the boundary dataset.
    FirstContaining,
}

/// Assigns each record to the region(s) containing it and tallies totals
/// and per-category counts.
///
/// The record stream is consumed exactly once. Records missing either
/// coordinate are skipped. Every bounding-box candidate returned by the
/// index gets the exact polygon test, so box false positives never count.
/// Regions in the result follow the boundary dataset order.
pub fn aggregate<I>(records: I, regions: &RegionIndex, policy: AssignmentPolicy) -> Breakdown
where
    I: IntoIterator,
    I::Item: Borrow<GeocodedRecord>,
{
    let features = regions.dataset().features();
    let mut tallies: Vec<RegionCount> = features
        .iter()
        .map(|feature| RegionCount::new(feature.identifier()))
        .collect();

    let mut assigned_records = 0_u64;
    let mut skipped_missing_coordinates = 0_u64;
    let mut unassigned_records = 0_u64;
    let mut containing: Vec<usize> = Vec::new();

    for record in records {
        let record = record.borrow();

        let Some((lon, lat)) = record.coordinates() else {
            log::trace!("Skipping record {} with missing coordinates", record.id);
            skipped_missing_coordinates += 1;
            continue;
        };

        containing.clear();
        containing.extend(regions.locate(lon, lat));

        if containing.is_empty() {
            log::trace!("Record {} at ({lon}, {lat}) is outside every region", record.id);
            unassigned_records += 1;
            continue;
        }

        if containing.len() > 1 {
            containing.sort_unstable();
            log::debug!(
                "Record {} at ({lon}, {lat}) falls in {} overlapping regions",
                record.id,
                containing.len()
            );
            if policy == AssignmentPolicy::FirstContaining {
                containing.truncate(1);
            }
        }

        for &position in &containing {
            tallies[position].record(record.category_names());
        }
        assigned_records += 1;
    }

    log::debug!(
        "Aggregated {assigned_records} records into {} {} \
         ({skipped_missing_coordinates} without coordinates, {unassigned_records} outside)",
        tallies.len(),
        regions.kind()
    );

    Breakdown {
        kind: regions.kind(),
        regions: tallies,
        assigned_records,
        skipped_missing_coordinates,
        unassigned_records,
    }
}

/// Renders the boundary features with their counts injected as
/// `call_issue_count` and `category_counts` properties.
///
/// Features are paired with [`Breakdown::regions`] by position, so several
/// features sharing one identifier each keep their own counts. Features
/// past the end of the breakdown get a count of zero.
#[must_use]
pub fn feature_collection(regions: &RegionIndex, breakdown: &Breakdown) -> FeatureCollection {
    let features: Vec<Feature> = regions
        .dataset()
        .features()
        .iter()
        .enumerate()
        .map(|(position, boundary)| {
            let counts = breakdown.regions.get(position);
            let mut feature = boundary.feature().clone();
            let properties = feature.properties.get_or_insert_with(serde_json::Map::new);

            properties.insert(
                "call_issue_count".to_string(),
                serde_json::Value::from(counts.map_or(0, |c| c.total_count)),
            );
            properties.insert(
                "category_counts".to_string(),
                serde_json::Value::Object(
                    counts
                        .into_iter()
                        .flat_map(|c| c.category_counts.iter())
                        .map(|(name, &count)| (name.clone(), serde_json::Value::from(count)))
                        .collect(),
                ),
            );
            feature
        })
        .collect();

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}
