//! Region breakdown CSV.

use std::io::Write;

use reporter_geography_models::{Breakdown, RegionKind};
use reporter_records::DateRange;

use crate::ExportError;

/// Column header for region totals.
pub const COUNT_COLUMN: &str = "call_issue_count";

/// The request parameters echoed in the first row of a breakdown export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportParams {
    /// Reporting period.
    pub range: DateRange,
    /// Category filter exactly as requested, if any.
    pub categories: Option<String>,
    /// Which boundaries the breakdown is keyed by.
    pub kind: RegionKind,
}

/// Which columns follow the region identifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CsvLayout {
    /// Only the region total.
    #[default]
    Totals,
    /// The region total followed by one column per category seen anywhere
    /// in the breakdown.
    ByCategory,
}

/// Writes a breakdown as CSV.
///
/// The first row echoes the parameters (`start, end, categories, kind`),
/// the second is the header, then one row per region in breakdown order.
///
/// # Errors
///
/// Returns [`ExportError`] if serialization or the underlying writer
/// fails.
pub fn write_breakdown_csv<W: Write>(
    writer: W,
    params: &ExportParams,
    breakdown: &Breakdown,
    layout: CsvLayout,
) -> Result<(), ExportError> {
    // The parameter row is narrower than the rest when categories are
    // expanded into columns.
    let mut csv = csv::WriterBuilder::new().flexible(true).from_writer(writer);

    csv.write_record([
        params.range.start_str(),
        params.range.end_str(),
        params.categories.clone().unwrap_or_default(),
        params.kind.to_string(),
    ])?;

    let categories = match layout {
        CsvLayout::Totals => Vec::new(),
        CsvLayout::ByCategory => breakdown.categories(),
    };

    let mut header = vec![params.kind.identifier_field(), COUNT_COLUMN];
    header.extend(categories.iter().copied());
    csv.write_record(&header)?;

    for region in &breakdown.regions {
        let mut row = vec![region.identifier.clone(), region.total_count.to_string()];
        row.extend(categories.iter().map(|name| region.category(name).to_string()));
        csv.write_record(&row)?;
    }
    csv.flush()?;

    log::debug!(
        "Wrote {} {} rows for {}..{}",
        breakdown.regions.len(),
        params.kind,
        params.range.start_str(),
        params.range.end_str()
    );

    Ok(())
}
