//! Reporting date ranges.

use chrono::{DateTime, Days, NaiveDate, Utc};

use crate::RecordError;

/// How far back a report reaches when no start date is given.
pub const DEFAULT_LOOKBACK_DAYS: u64 = 365;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// An inclusive range of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    /// First day included.
    pub start: NaiveDate,
    /// Last day included.
    pub end: NaiveDate,
}

impl DateRange {
    /// Resolves optional `YYYY-MM-DD` parameters against `today`.
    ///
    /// A missing end defaults to `today`; a missing start defaults to
    /// [`DEFAULT_LOOKBACK_DAYS`] before `today`. Blank strings count as
    /// missing.
    ///
    /// # Errors
    ///
    /// * [`RecordError::InvalidDate`] if a parameter does not parse.
    /// * [`RecordError::InvalidRange`] if the start is after the end.
    pub fn resolve(
        start: Option<&str>,
        end: Option<&str>,
        today: NaiveDate,
    ) -> Result<Self, RecordError> {
        let start = match non_blank(start) {
            Some(s) => parse_date(s)?,
            None => today
                .checked_sub_days(Days::new(DEFAULT_LOOKBACK_DAYS))
                .unwrap_or(NaiveDate::MIN),
        };
        let end = match non_blank(end) {
            Some(s) => parse_date(s)?,
            None => today,
        };

        if start > end {
            return Err(RecordError::InvalidRange { start, end });
        }

        Ok(Self { start, end })
    }

    /// Resolves parameters against the current UTC date.
    ///
    /// # Errors
    ///
    /// See [`DateRange::resolve`].
    pub fn resolve_today(start: Option<&str>, end: Option<&str>) -> Result<Self, RecordError> {
        Self::resolve(start, end, Utc::now().date_naive())
    }

    /// Whether the timestamp falls on a day inside the range.
    #[must_use]
    pub fn contains(&self, at: &DateTime<Utc>) -> bool {
        let day = at.date_naive();
        day >= self.start && day <= self.end
    }

    /// Start date as `YYYY-MM-DD`.
    #[must_use]
    pub fn start_str(&self) -> String {
        self.start.format(DATE_FORMAT).to_string()
    }

    /// End date as `YYYY-MM-DD`.
    #[must_use]
    pub fn end_str(&self) -> String {
        self.end.format(DATE_FORMAT).to_string()
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

fn parse_date(value: &str) -> Result<NaiveDate, RecordError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| RecordError::InvalidDate {
        value: value.to_string(),
    })
}
