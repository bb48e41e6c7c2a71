//! Utility functions for report formatting
//!
//! Provides shared formatting helpers used across all report formatters.

use crate::errors::AppResult;
use serde::Serialize;

/// Format number with thousand separators for console output
///
/// # Arguments
///
/// * `n` - Number to format
///
/// # Returns
///
/// String with comma separators (e.g., "1,234,567")
///
/// # Examples
///
/// ```
/// # use dicom_bucket_audit::analysis::reports::utils::format_number;
/// assert_eq!(format_number(1234), "1,234");
/// assert_eq!(format_number(1234567), "1,234,567");
/// assert_eq!(format_number(36524), "36,524");
/// ```
pub fn format_number(n: u64) -> String {
    let digits = n.to_string();
    let len = digits.len();
    let mut result = String::with_capacity(len + len / 3);

    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }

    result
}

/// Export data as pretty JSON for programmatic use
pub fn export_json<T: Serialize>(data: &T) -> AppResult<String> {
    Ok(serde_json::to_string_pretty(data)?)
}

/// Section header used by every console report
pub fn section_header(title: &str) -> String {
    format!("\n📊 {}\n{}\n\n", title, "━".repeat(48))
}
