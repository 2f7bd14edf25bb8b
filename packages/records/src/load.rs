//! Loading call/issue records exported from the record store.

use std::path::Path;

use reporter_records_models::CallIssue;

use crate::RecordError;

/// Parses a JSON array of call/issue records.
///
/// # Errors
///
/// Returns [`RecordError::Json`] if the input is not a JSON array of
/// records.
pub fn parse_records(json: &str) -> Result<Vec<CallIssue>, RecordError> {
    Ok(serde_json::from_str(json)?)
}

/// Reads and parses a JSON record file.
///
/// # Errors
///
/// Returns [`RecordError::Io`] if the file cannot be read, or
/// [`RecordError::Json`] if it does not parse.
pub fn load_records(path: &Path) -> Result<Vec<CallIssue>, RecordError> {
    let contents = std::fs::read_to_string(path)?;
    let records = parse_records(&contents)?;
    log::info!("Loaded {} records from {}", records.len(), path.display());
    Ok(records)
}
