//! Day-level bucket coordinates

use crate::errors::{AppError, AppResult};
use crate::utils::time::{days_in_month, MAX_SUPPORTED_YEAR, MIN_SUPPORTED_YEAR};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A calendar-valid (year, month, day) triple
///
/// Construction through [`DateKey::new`] guarantees the day exists in that
/// month, leap years included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DateKey {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl DateKey {
    pub fn new(year: i32, month: u32, day: u32) -> AppResult<Self> {
        if !(MIN_SUPPORTED_YEAR..=MAX_SUPPORTED_YEAR).contains(&year) {
            return Err(AppError::InvalidRange(format!(
                "year {} outside {}-{}",
                year, MIN_SUPPORTED_YEAR, MAX_SUPPORTED_YEAR
            )));
        }
        let last_day = days_in_month(year, month)
            .ok_or_else(|| AppError::InvalidRange(format!("month {} outside 1-12", month)))?;
        if day == 0 || day > last_day {
            return Err(AppError::InvalidRange(format!(
                "day {} does not exist in {:04}/{:02}",
                day, year, month
            )));
        }
        Ok(Self { year, month, day })
    }

    /// `YYYY/MM/DD`, the prefix for hierarchical path fields
    pub fn path_prefix(&self) -> String {
        format!("{:04}/{:02}/{:02}", self.year, self.month, self.day)
    }

    /// `YYYYMMDD`, the prefix for flat date fields such as `StudyDate`
    pub fn date_prefix(&self) -> String {
        format!("{:04}{:02}{:02}", self.year, self.month, self.day)
    }

    pub fn month_key(&self) -> String {
        format!("{:02}", self.month)
    }

    pub fn day_key(&self) -> String {
        format!("{:02}", self.day)
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path_prefix())
    }
}
