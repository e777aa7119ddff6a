//! Calendar helpers shared by the schedule, savings and plan modules.

use chrono::{Datelike, Months, NaiveDate};

use crate::error::HomeplanError;
use crate::HomeplanResult;

/// Add a number of months to a date, clamping the day to the month's max.
pub fn add_months(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_add_months(Months::new(months))
        .unwrap_or(NaiveDate::MAX)
}

/// Whole calendar months from `from` to `to` (year/month difference only,
/// the day of month is ignored). Negative when `to` precedes `from`.
pub fn months_between(from: NaiveDate, to: NaiveDate) -> i64 {
    let years = i64::from(to.year() - from.year());
    let months = i64::from(to.month()) - i64::from(from.month());
    years * 12 + months
}

/// Parse a `YYYY-MM-DD` date string as supplied by the state provider.
pub fn parse_date(field: &str, value: &str) -> HomeplanResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|e| HomeplanError::DateError(format!("{field}: '{value}' is not YYYY-MM-DD ({e})")))
}
