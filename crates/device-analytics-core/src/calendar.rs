//! Whole-month calendar arithmetic.
//!
//! Ages are counted in calendar months with the day of month ignored:
//! 31 January to 1 February is one month, 1 January to 31 January is
//! zero. Every valuation in the crate relies on this rule.

use chrono::{Datelike, Months, NaiveDate};

use crate::error::AnalyticsError;
use crate::AnalyticsResult;

/// Whole calendar months from `start` to `end`. Negative when `end`
/// falls in an earlier month than `start`.
pub fn months_between(start: NaiveDate, end: NaiveDate) -> i32 {
    (end.year() - start.year()) * 12 + (end.month() as i32 - start.month() as i32)
}

/// First day of the month containing `date`.
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// First day of the month `months` months before the month of `date`.
pub fn month_start_before(date: NaiveDate, months: u32) -> AnalyticsResult<NaiveDate> {
    month_start(date)
        .checked_sub_months(Months::new(months))
        .ok_or_else(|| {
            AnalyticsError::DateError(format!(
                "cannot step {} months back from {}",
                months, date
            ))
        })
}

/// "YYYY-MM" bucket key. Sorts lexicographically in chronological order.
pub fn month_key(date: NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}
