//! Calendar utilities for date-bucket construction
//!
//! Proleptic Gregorian rules throughout: chrono's `NaiveDate` already uses
//! them, so month lengths are derived from it rather than from a lookup table.

use chrono::{Datelike, NaiveDate, Utc};

/// Earliest year a four-digit `YYYY` prefix can express
pub const MIN_SUPPORTED_YEAR: i32 = 1;

/// Latest year a four-digit `YYYY` prefix can express
pub const MAX_SUPPORTED_YEAR: i32 = 9999;

/// Leap year test: divisible by 4, except centuries not divisible by 400
///
/// # Examples
/// ```
/// use dicom_bucket_audit::utils::time::is_leap_year;
/// assert!(is_leap_year(2016));
/// assert!(is_leap_year(2000));
/// assert!(!is_leap_year(1900));
/// assert!(!is_leap_year(2017));
/// ```
pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Number of days in `month` (1-12) of `year`
///
/// Computed as the day before the first of the following month, i.e. "day 0"
/// of the next month. Returns `None` for a month outside 1-12 or a year chrono
/// cannot represent.
///
/// # Examples
/// ```
/// use dicom_bucket_audit::utils::time::days_in_month;
/// assert_eq!(days_in_month(2016, 2), Some(29));
/// assert_eq!(days_in_month(2017, 2), Some(28));
/// assert_eq!(days_in_month(2018, 12), Some(31));
/// assert_eq!(days_in_month(2018, 13), None);
/// ```
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    if !(1..=12).contains(&month) {
        return None;
    }
    let (next_year, next_month) = if month == 12 {
        (year.checked_add(1)?, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first| first.pred_opt())
        .map(|last| last.day())
}

/// Two-character zero-padded rendering used for month and day keys
///
/// Values above 99 are outside the key contract and render unpadded.
///
/// # Examples
/// ```
/// use dicom_bucket_audit::utils::time::pad2;
/// assert_eq!(pad2(3), "03");
/// assert_eq!(pad2(12), "12");
/// ```
pub fn pad2(value: u32) -> String {
    format!("{:02}", value)
}

/// Current UTC time for report headers ("YYYY-MM-DD HH:MM:SS")
pub fn report_timestamp() -> String {
    Utc::now().format("%Y-%m-%d %H:%M:%S").to_string()
}
