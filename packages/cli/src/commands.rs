//! Report commands.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use reporter_export::{CsvLayout, ExportParams, export_filename, report_title};
use reporter_geography::{
    AssignmentPolicy, Breakdown, IndexCache, RegionIndex, RegionKind, aggregate,
    feature_collection,
};
use reporter_records::{DateRange, RecordFilter, load_records};

use crate::{FilterArgs, Format};

/// Environment variable naming the boundary directory.
pub const BOUNDARIES_DIR_ENV: &str = "REPORTER_BOUNDARIES_DIR";

const DEFAULT_BOUNDARIES_DIR: &str = "data/boundaries";

/// A fully resolved `breakdown` invocation.
#[derive(Debug, Clone)]
pub struct BreakdownRequest {
    pub records: PathBuf,
    pub boundaries_dir: PathBuf,
    pub kind: RegionKind,
    pub filters: FilterArgs,
    pub format: Format,
    pub by_category: bool,
    pub first_match: bool,
    pub output: Option<PathBuf>,
}

/// Picks the boundary directory: the flag, then the environment, then
/// `data/boundaries`.
pub fn boundaries_dir(flag: Option<PathBuf>) -> PathBuf {
    flag.or_else(|| std::env::var_os(BOUNDARIES_DIR_ENV).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_BOUNDARIES_DIR))
}

impl FilterArgs {
    fn range(&self) -> Result<DateRange, reporter_records::RecordError> {
        DateRange::resolve_today(self.start_date.as_deref(), self.end_date.as_deref())
    }

    fn record_filter(&self, range: DateRange) -> RecordFilter {
        RecordFilter::from_params(range, self.categories.as_deref(), self.zip_codes.as_deref())
    }
}

/// Runs the `breakdown` command.
pub fn breakdown(request: &BreakdownRequest) -> Result<(), Box<dyn std::error::Error>> {
    let range = request.filters.range()?;
    let filter = request.filters.record_filter(range);
    log::info!("Breaking down {} by {}", report_title(&range), request.kind);

    let records = load_records(&request.records)?;
    let geocoded = filter.geocoded(&records);

    let mut cache = IndexCache::new();
    let regions = cache.get_or_load_dir(request.kind, &request.boundaries_dir)?;

    let policy = if request.first_match {
        AssignmentPolicy::FirstContaining
    } else {
        AssignmentPolicy::AllContaining
    };
    let breakdown = aggregate(&geocoded, &regions, policy);

    if breakdown.skipped_missing_coordinates > 0 {
        log::warn!(
            "{} matching records have no coordinates and were not counted",
            breakdown.skipped_missing_coordinates
        );
    }
    log::info!(
        "Counted {} records in {} {} ({} outside every region)",
        breakdown.assigned_records,
        breakdown.regions.len(),
        request.kind,
        breakdown.unassigned_records
    );

    let params = ExportParams {
        range,
        categories: request.filters.categories.clone(),
        kind: request.kind,
    };
    let layout = if request.by_category {
        CsvLayout::ByCategory
    } else {
        CsvLayout::Totals
    };

    let output = request
        .output
        .as_deref()
        .map(|path| breakdown_output_path(path, &params, request.format));
    let mut out = open_output(output.as_deref())?;
    write_breakdown(&mut out, request.format, &params, &regions, &breakdown, layout)?;
    out.flush()?;

    Ok(())
}

/// Runs the `export` command.
pub fn export(
    records: &Path,
    filters: &FilterArgs,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let range = filters.range()?;
    let filter = filters.record_filter(range);

    let records = load_records(records)?;
    let selected = filter.apply(&records);
    log::info!("Exporting {} records for {}", selected.len(), report_title(&range));

    let mut out = open_output(output)?;
    reporter_export::write_records_csv(&mut out, selected)?;
    out.flush()?;

    Ok(())
}

/// Renders a breakdown in the requested format.
fn write_breakdown<W: Write>(
    out: &mut W,
    format: Format,
    params: &ExportParams,
    regions: &RegionIndex,
    breakdown: &Breakdown,
    layout: CsvLayout,
) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        Format::Json => {
            serde_json::to_writer_pretty(&mut *out, breakdown)?;
            writeln!(out)?;
        }
        Format::Geojson => {
            serde_json::to_writer(&mut *out, &feature_collection(regions, breakdown))?;
            writeln!(out)?;
        }
        Format::Csv => {
            reporter_export::write_breakdown_csv(&mut *out, params, breakdown, layout)?;
        }
    }
    Ok(())
}

/// A directory output gets the dated export file name inside it, with the
/// extension of the output format.
fn breakdown_output_path(path: &Path, params: &ExportParams, format: Format) -> PathBuf {
    if path.is_dir() {
        path.join(export_filename(&params.range, params.kind))
            .with_extension(format.extension())
    } else {
        path.to_path_buf()
    }
}

fn open_output(path: Option<&Path>) -> io::Result<Box<dyn Write>> {
    Ok(match path {
        Some(path) => {
            log::info!("Writing {}", path.display());
            Box::new(BufWriter::new(File::create(path)?))
        }
        None => Box::new(BufWriter::new(io::stdout().lock())),
    })
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    const WARDS: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": {"ward": "1"},
                "geometry": {"type": "Polygon", "coordinates": [[[0,0],[1,0],[1,1],[0,1],[0,0]]]}
            },
            {
                "type": "Feature",
                "properties": {"ward": "2"},
                "geometry": {"type": "Polygon", "coordinates": [[[2,0],[3,0],[3,1],[2,1],[2,0]]]}
            }
        ]
    }"#;

    const RECORDS: &str = r#"[
        {
            "id": 1,
            "created_at": "2023-03-01T12:00:00Z",
            "address": {"zip": "60601", "lat": 0.5, "lon": 0.5},
            "categories": ["Heat"]
        },
        {
            "id": 2,
            "created_at": "2023-03-02T12:00:00Z",
            "title": "Leaking roof",
            "address": {"zip": "60602", "lat": 0.5, "lon": 2.5},
            "categories": ["Heat", "Repairs"]
        },
        {
            "id": 3,
            "created_at": "2023-03-03T12:00:00Z",
            "address": {"zip": "60602"},
            "categories": ["Repairs"]
        },
        {
            "id": 4,
            "created_at": "2021-01-01T12:00:00Z",
            "address": {"zip": "60601", "lat": 0.5, "lon": 0.5},
            "categories": ["Heat"]
        }
    ]"#;

    struct Fixture {
        dir: PathBuf,
    }

    impl Fixture {
        fn new(name: &str) -> Self {
            let dir = std::env::temp_dir().join(format!(
                "reporter_cli_{name}_{}",
                std::process::id()
            ));
            fs::create_dir_all(&dir).unwrap();
            fs::write(dir.join("wards.geojson"), WARDS).unwrap();
            fs::write(dir.join("records.json"), RECORDS).unwrap();
            Self { dir }
        }

        fn filters() -> FilterArgs {
            FilterArgs {
                start_date: Some("2023-01-01".to_string()),
                end_date: Some("2023-12-31".to_string()),
                ..FilterArgs::default()
            }
        }

        fn request(&self, format: Format, output: &str) -> BreakdownRequest {
            BreakdownRequest {
                records: self.dir.join("records.json"),
                boundaries_dir: self.dir.clone(),
                kind: RegionKind::Wards,
                filters: Self::filters(),
                format,
                by_category: false,
                first_match: false,
                output: Some(self.dir.join(output)),
            }
        }
    }

    impl Drop for Fixture {
        fn drop(&mut self) {
            let _ = fs::remove_dir_all(&self.dir);
        }
    }

    #[test]
    fn boundaries_dir_falls_back_to_env_then_default() {
        // Safety: test-only; no other test reads this variable.
        unsafe {
            std::env::set_var(BOUNDARIES_DIR_ENV, "/srv/env-bounds");
        }
        assert_eq!(boundaries_dir(None), PathBuf::from("/srv/env-bounds"));
        assert_eq!(
            boundaries_dir(Some(PathBuf::from("/srv/bounds"))),
            PathBuf::from("/srv/bounds")
        );

        // Safety: as above.
        unsafe {
            std::env::remove_var(BOUNDARIES_DIR_ENV);
        }
        assert_eq!(boundaries_dir(None), PathBuf::from("data/boundaries"));
        assert_eq!(
            boundaries_dir(Some(PathBuf::from("/srv/bounds"))),
            PathBuf::from("/srv/bounds")
        );
    }

    #[test]
    fn breakdown_as_json() {
        let fixture = Fixture::new("json");
        breakdown(&fixture.request(Format::Json, "out.json")).unwrap();

        let text = fs::read_to_string(fixture.dir.join("out.json")).unwrap();
        let result: Breakdown = serde_json::from_str(&text).unwrap();
        assert_eq!(result.region("1").unwrap().total_count, 1);
        assert_eq!(result.region("2").unwrap().category("Repairs"), 1);
        assert_eq!(result.skipped_missing_coordinates, 1);
    }

    #[test]
    fn breakdown_as_csv_into_directory() {
        let fixture = Fixture::new("csv");
        let out_dir = fixture.dir.join("exports");
        fs::create_dir_all(&out_dir).unwrap();
        let mut request = fixture.request(Format::Csv, "exports");
        request.by_category = true;

        breakdown(&request).unwrap();

        let path = out_dir.join("sa_export_2023-01-01_2023-12-31_wards.csv");
        let text = fs::read_to_string(path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "2023-01-01,2023-12-31,,wards");
        assert_eq!(lines[1], "ward,call_issue_count,Heat,Repairs");
        assert_eq!(lines[2], "1,1,1,0");
        assert_eq!(lines[3], "2,1,1,1");
    }

    #[test]
    fn json_into_directory_gets_json_extension() {
        let fixture = Fixture::new("json_dir");
        let out_dir = fixture.dir.join("exports");
        fs::create_dir_all(&out_dir).unwrap();

        breakdown(&fixture.request(Format::Json, "exports")).unwrap();

        let path = out_dir.join("sa_export_2023-01-01_2023-12-31_wards.json");
        let result: Breakdown = serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(result.kind, RegionKind::Wards);
        assert!(!out_dir.join("sa_export_2023-01-01_2023-12-31_wards.csv").exists());
    }

    #[test]
    fn breakdown_as_geojson() {
        let fixture = Fixture::new("geojson");
        breakdown(&fixture.request(Format::Geojson, "out.geojson")).unwrap();

        let text = fs::read_to_string(fixture.dir.join("out.geojson")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["type"], "FeatureCollection");
        assert_eq!(value["features"][1]["properties"]["call_issue_count"], 1);
    }

    #[test]
    fn category_filter_narrows_counts() {
        let fixture = Fixture::new("categories");
        let mut request = fixture.request(Format::Json, "out.json");
        request.filters.categories = Some("Repairs".to_string());

        breakdown(&request).unwrap();

        let text = fs::read_to_string(fixture.dir.join("out.json")).unwrap();
        let result: Breakdown = serde_json::from_str(&text).unwrap();
        assert_eq!(result.region("1").unwrap().total_count, 0);
        let two = result.region("2").unwrap();
        assert_eq!(two.total_count, 1);
        assert_eq!(two.category("Heat"), 0);
    }

    #[test]
    fn missing_boundaries_fail() {
        let fixture = Fixture::new("missing");
        let mut request = fixture.request(Format::Json, "out.json");
        request.kind = RegionKind::Zips;
        assert!(breakdown(&request).is_err());
    }

    #[test]
    fn export_writes_matching_records_newest_first() {
        let fixture = Fixture::new("export");
        let output = fixture.dir.join("records.csv");

        export(&fixture.dir.join("records.json"), &Fixture::filters(), Some(&output)).unwrap();

        let text = fs::read_to_string(output).unwrap();
        let ids: Vec<&str> = text
            .lines()
            .skip(1)
            .map(|line| line.split(',').next().unwrap())
            .collect();
        assert_eq!(ids, vec!["3", "2", "1"]);
        assert!(text.lines().nth(2).unwrap().starts_with("2,issue,"));
    }
}
