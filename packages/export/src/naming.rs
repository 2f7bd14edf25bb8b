//! Report titles and download file names.

use chrono::Datelike as _;
use reporter_geography_models::RegionKind;
use reporter_records::DateRange;

/// File name for a breakdown download, e.g.
/// `sa_export_2023-01-01_2023-12-31_wards.csv`.
#[must_use]
pub fn export_filename(range: &DateRange, kind: RegionKind) -> String {
    format!("sa_export_{}_{}_{kind}.csv", range.start_str(), range.end_str())
}

/// Human title for a reporting period.
///
/// A full calendar year is just the year (`2023`). Other periods within one
/// year are `Mar-Jun 2023`; periods spanning years are
/// `Nov 2022-Feb 2023`.
#[must_use]
pub fn report_title(range: &DateRange) -> String {
    let (start, end) = (range.start, range.end);

    if start.year() != end.year() {
        return format!(
            "{} {}-{} {}",
            start.format("%b"),
            start.year(),
            end.format("%b"),
            end.year()
        );
    }

    if start.month() == 1 && end.month() == 12 {
        start.year().to_string()
    } else {
        format!("{}-{} {}", start.format("%b"), end.format("%b"), start.year())
    }
}
