//! Boundary parsing for dates arriving as strings.
//!
//! Only the calendar-date part of the input is read. A trailing time
//! component (`2025-02-17T23:30:00-05:00`) is ignored rather than converted,
//! so the same written date never lands in a different week because of the
//! caller's time zone.

use chrono::NaiveDate;

use super::error::CalendarError;

pub fn parse_iso_date(raw: &str) -> Result<NaiveDate, CalendarError> {
    let trimmed = raw.trim();
    let date_part = trimmed
        .split_once(['T', ' '])
        .map(|(date, _)| date)
        .unwrap_or(trimmed);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").map_err(|_| CalendarError::InvalidDate {
        input: trimmed.to_string(),
    })
}

/// Lenient variant for optional enrichment data: blank or malformed input
/// yields `None` and a warning.
pub fn parse_optional_date(raw: Option<&str>) -> Option<NaiveDate> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    match parse_iso_date(raw) {
        Ok(date) => Some(date),
        Err(e) => {
            tracing::warn!(error = %e, "ignoring malformed date");
            None
        }
    }
}

/// Parses a `YYYY-MM` month key into `(year, month)`.
pub fn parse_month_key(raw: &str) -> Result<(i32, u32), CalendarError> {
    let invalid = || CalendarError::InvalidDate {
        input: raw.trim().to_string(),
    };
    let (y, m) = raw.trim().split_once('-').ok_or_else(invalid)?;
    let year = y.parse::<i32>().map_err(|_| invalid())?;
    let month = m.parse::<u32>().map_err(|_| invalid())?;
    NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
    Ok((year, month))
}

pub fn format_iso_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
