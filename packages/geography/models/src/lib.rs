#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Region kinds and per-region breakdown types.
//!
//! These are the output shapes of a geographic breakdown: how many calls
//! and issues fell in each ward or ZIP code, and how those split across
//! categories. They serialize directly to the JSON the map and the CSV
//! exports consume.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// The kind of administrative boundary a breakdown is keyed by.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RegionKind {
    /// City council wards.
    Wards,
    /// ZIP codes.
    Zips,
}

impl RegionKind {
    /// All region kinds.
    pub const ALL: &[Self] = &[Self::Wards, Self::Zips];

    /// The feature property holding a region's identifier, and the column
    /// header used for it in exports (`"ward"` / `"zip"`).
    #[must_use]
    pub const fn identifier_field(self) -> &'static str {
        match self {
            Self::Wards => "ward",
            Self::Zips => "zip",
        }
    }

    /// Alternate property names tried when [`Self::identifier_field`] is
    /// absent from a feature.
    #[must_use]
    pub const fn fallback_fields(self) -> &'static [&'static str] {
        match self {
            Self::Wards => &["WARD", "ward_id"],
            Self::Zips => &["ZIP", "zip_code", "ZCTA5CE10"],
        }
    }
}

/// Count of records in a single category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCount {
    /// Category name.
    pub category: String,
    /// Number of records.
    pub count: u64,
}

/// Totals for one region.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionCount {
    /// Ward number or ZIP code.
    pub identifier: String,
    /// Records assigned to this region.
    pub total_count: u64,
    /// Category name -> records in this region carrying it.
    pub category_counts: BTreeMap<String, u64>,
}

impl RegionCount {
    /// Creates an empty tally for a region.
    #[must_use]
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            total_count: 0,
            category_counts: BTreeMap::new(),
        }
    }

    /// Counts one record with the given categories.
    pub fn record<'a>(&mut self, categories: impl IntoIterator<Item = &'a str>) {
        self.total_count += 1;
        for category in categories {
            *self
                .category_counts
                .entry(category.to_string())
                .or_insert(0) += 1;
        }
    }

    /// Count for one category, zero when absent.
    #[must_use]
    pub fn category(&self, name: &str) -> u64 {
        self.category_counts.get(name).copied().unwrap_or(0)
    }

    /// Categories ordered by count, highest first, ties by name.
    #[must_use]
    pub fn by_category(&self) -> Vec<CategoryCount> {
        let mut counts: Vec<CategoryCount> = self
            .category_counts
            .iter()
            .map(|(category, &count)| CategoryCount {
                category: category.clone(),
                count,
            })
            .collect();
        counts.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.category.cmp(&b.category)));
        counts
    }
}

/// Result of aggregating a record stream over a set of regions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Breakdown {
    /// Which boundary set the regions come from.
    pub kind: RegionKind,
    /// One entry per region, in boundary dataset order.
    pub regions: Vec<RegionCount>,
    /// Records assigned to at least one region.
    pub assigned_records: u64,
    /// Records skipped because a coordinate was missing.
    pub skipped_missing_coordinates: u64,
    /// Geocoded records that fell outside every region.
    pub unassigned_records: u64,
}

impl Breakdown {
    /// Looks up a region by identifier.
    #[must_use]
    pub fn region(&self, identifier: &str) -> Option<&RegionCount> {
        self.regions.iter().find(|r| r.identifier == identifier)
    }

    /// Every category seen in any region, sorted by name.
    #[must_use]
    pub fn categories(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .regions
            .iter()
            .flat_map(|r| r.category_counts.keys().map(String::as_str))
            .collect();
        names.sort_unstable();
        names.dedup();
        names
    }

    /// Sum of region totals. Exceeds `assigned_records` only when regions
    /// overlap and a record was counted in several.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.regions.iter().map(|r| r.total_count).sum()
    }
}
