//! Report filters over call/issue records.

use std::collections::BTreeSet;

use reporter_records_models::{CallIssue, GeocodedRecord};

use crate::DateRange;

/// Selects the records that go into a report.
///
/// A record passes when its creation day is in `range`, its address ZIP is
/// listed in `zip_codes` (when set) and at least one of its categories is
/// listed in `categories` (when set).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordFilter {
    /// Creation days to include.
    pub range: DateRange,
    /// Category names to include. `None` means all.
    pub categories: Option<BTreeSet<String>>,
    /// ZIP codes to include. `None` means all.
    pub zip_codes: Option<BTreeSet<String>>,
}

impl RecordFilter {
    /// Creates a filter that only restricts by date.
    #[must_use]
    pub const fn new(range: DateRange) -> Self {
        Self {
            range,
            categories: None,
            zip_codes: None,
        }
    }

    /// Builds a filter from comma-separated request parameters.
    ///
    /// Entries are trimmed and blanks dropped; a parameter with no entries
    /// left does not filter.
    #[must_use]
    pub fn from_params(
        range: DateRange,
        categories: Option<&str>,
        zip_codes: Option<&str>,
    ) -> Self {
        Self {
            range,
            categories: categories.and_then(split_list),
            zip_codes: zip_codes.and_then(split_list),
        }
    }

    /// Whether the record passes every configured criterion.
    #[must_use]
    pub fn matches(&self, record: &CallIssue) -> bool {
        if !self.range.contains(&record.created_at) {
            return false;
        }

        if let Some(zips) = &self.zip_codes {
            match record.zip().map(str::trim) {
                Some(zip) if zips.contains(zip) => {}
                _ => return false,
            }
        }

        if let Some(categories) = &self.categories {
            return record
                .category_names()
                .any(|name| categories.contains(name));
        }

        true
    }

    /// Projects a passing record for geographic aggregation.
    ///
    /// With a category filter only the listed categories are kept, so
    /// per-category counts reflect the filter.
    #[must_use]
    pub fn project(&self, record: &CallIssue) -> Option<GeocodedRecord> {
        if !self.matches(record) {
            return None;
        }

        let mut geocoded = GeocodedRecord::from(record);
        if let Some(categories) = &self.categories {
            geocoded.categories = record
                .category_names()
                .filter(|name| categories.contains(*name))
                .map(|name| Some(name.to_string()))
                .collect();
        }
        Some(geocoded)
    }

    /// Passing records, newest first.
    #[must_use]
    pub fn apply<'a>(&self, records: &'a [CallIssue]) -> Vec<&'a CallIssue> {
        let mut selected: Vec<&CallIssue> = records.iter().filter(|r| self.matches(r)).collect();
        selected.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        log::debug!(
            "Filter selected {} of {} records",
            selected.len(),
            records.len()
        );
        selected
    }

    /// Geocoded projections of the passing records, newest first.
    #[must_use]
    pub fn geocoded(&self, records: &[CallIssue]) -> Vec<GeocodedRecord> {
        self.apply(records)
            .into_iter()
            .filter_map(|record| self.project(record))
            .collect()
    }
}

fn split_list(value: &str) -> Option<BTreeSet<String>> {
    let items: BTreeSet<String> = value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .collect();

    if items.is_empty() { None } else { Some(items) }
}
