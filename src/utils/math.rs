//! Percentage helpers for report summaries
//!
//! Buckets with no documents are common (weekends, pre-migration years), so
//! every ratio here treats a zero denominator as 0%.

/// Calculate percentage safely, returning 0.0 if total is zero.
///
/// **Precision Note**: counts above 2^53 lose precision when cast to f64,
/// which is irrelevant at display precision.
///
/// # Examples
/// ```
/// use dicom_bucket_audit::utils::math::safe_percentage;
///
/// assert_eq!(safe_percentage(50, 100), 50.0);
/// assert_eq!(safe_percentage(1, 4), 25.0);
/// assert_eq!(safe_percentage(50, 0), 0.0);
/// ```
#[inline]
pub fn safe_percentage(part: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        (part as f64 / total as f64) * 100.0
    }
}

/// Render a percentage with two decimals and a trailing `%`
pub fn format_percentage(part: u64, total: u64) -> String {
    format!("{:.2}%", safe_percentage(part, total))
}
