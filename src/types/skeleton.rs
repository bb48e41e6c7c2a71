//! Calendar skeleton: year → "MM" → "DD" → leaf
//!
//! The skeleton is the report. It is built once per run with every
//! calendar-valid day in range present, then filled leaf by leaf by the
//! collector. Maps are `BTreeMap`s so serialisation order is ascending and
//! reproducible; zero-padded month/day keys sort the same as their numbers.

use super::date_key::DateKey;
use super::leaf_values::LeafValue;
use crate::errors::{AppError, AppResult};
use crate::utils::time::{days_in_month, pad2, MAX_SUPPORTED_YEAR, MIN_SUPPORTED_YEAR};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

pub type DayMap<V> = BTreeMap<String, V>;
pub type MonthMap<V> = BTreeMap<String, DayMap<V>>;

/// Inclusive month restriction, 1-12
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthRange {
    pub first: u32,
    pub last: u32,
}

impl MonthRange {
    pub const ALL: MonthRange = MonthRange { first: 1, last: 12 };

    pub fn new(first: u32, last: u32) -> AppResult<Self> {
        let range = Self { first, last };
        range.validate()?;
        Ok(range)
    }

    pub fn single(month: u32) -> AppResult<Self> {
        Self::new(month, month)
    }

    pub fn validate(&self) -> AppResult<()> {
        for month in [self.first, self.last] {
            if !(1..=12).contains(&month) {
                return Err(AppError::InvalidRange(format!(
                    "month {} outside 1-12",
                    month
                )));
            }
        }
        if self.first > self.last {
            return Err(AppError::InvalidRange(format!(
                "first month {} after last month {}",
                self.first, self.last
            )));
        }
        Ok(())
    }
}

impl Default for MonthRange {
    fn default() -> Self {
        Self::ALL
    }
}

impl fmt::Display for MonthRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.first == self.last {
            write!(f, "{}", self.first)
        } else {
            write!(f, "{}-{}", self.first, self.last)
        }
    }
}

impl FromStr for MonthRange {
    type Err = AppError;

    /// Accepts `"3"` or `"1-6"`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (first, last) = parse_bounds(s, "month")?;
        Self::new(first, last)
    }
}

/// Inclusive day-of-month restriction, clipped to each month's length
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayRange {
    pub first: u32,
    pub last: u32,
}

impl DayRange {
    pub fn new(first: u32, last: u32) -> AppResult<Self> {
        let range = Self { first, last };
        range.validate()?;
        Ok(range)
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.first == 0 || self.last > 31 || self.first > self.last {
            return Err(AppError::InvalidRange(format!(
                "day range {}-{} must lie within 1-31 and be ascending",
                self.first, self.last
            )));
        }
        Ok(())
    }
}

impl FromStr for DayRange {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (first, last) = parse_bounds(s, "day")?;
        Self::new(first, last)
    }
}

fn parse_bounds(s: &str, what: &str) -> AppResult<(u32, u32)> {
    let parse = |part: &str| {
        part.trim()
            .parse::<u32>()
            .map_err(|_| AppError::InvalidRange(format!("invalid {} bound '{}'", what, part)))
    };
    match s.split_once('-') {
        Some((first, last)) => Ok((parse(first)?, parse(last)?)),
        None => {
            let value = parse(s)?;
            Ok((value, value))
        }
    }
}

/// Validate an inclusive year range before anything is built or queried
pub fn validate_years(min_year: i32, max_year: i32) -> AppResult<()> {
    if min_year > max_year {
        return Err(AppError::InvalidRange(format!(
            "min year {} is after max year {}",
            min_year, max_year
        )));
    }
    for year in [min_year, max_year] {
        if !(MIN_SUPPORTED_YEAR..=MAX_SUPPORTED_YEAR).contains(&year) {
            return Err(AppError::InvalidRange(format!(
                "year {} outside {}-{}",
                year, MIN_SUPPORTED_YEAR, MAX_SUPPORTED_YEAR
            )));
        }
    }
    Ok(())
}

/// Nested ordered year → month → day mapping with one leaf per calendar day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Skeleton<V> {
    years: BTreeMap<i32, MonthMap<V>>,
}

impl<V: Default> Skeleton<V> {
    /// Build the full skeleton for `[min_year, max_year]` restricted to `months`
    ///
    /// Every day is initialised to `V::default()`, the statistic's zero value.
    ///
    /// # Errors
    /// `InvalidRange` when `min_year > max_year`, a year cannot be rendered as
    /// `YYYY`, or the month range is outside 1-12.
    pub fn build(min_year: i32, max_year: i32, months: MonthRange) -> AppResult<Self> {
        Self::build_with_days(min_year, max_year, months, None)
    }

    /// As [`Skeleton::build`], additionally restricting days of every month
    pub fn build_with_days(
        min_year: i32,
        max_year: i32,
        months: MonthRange,
        days: Option<DayRange>,
    ) -> AppResult<Self> {
        validate_years(min_year, max_year)?;
        months.validate()?;
        if let Some(range) = &days {
            range.validate()?;
        }

        let mut years = BTreeMap::new();
        for year in min_year..=max_year {
            let mut month_map = MonthMap::new();
            for month in months.first..=months.last {
                let month_len = days_in_month(year, month).ok_or_else(|| {
                    AppError::InvalidRange(format!("no calendar month {:04}/{:02}", year, month))
                })?;
                let (first_day, last_day) = match days {
                    Some(range) => (range.first, range.last.min(month_len)),
                    None => (1, month_len),
                };

                let day_map: DayMap<V> = (first_day..=last_day)
                    .map(|day| (pad2(day), V::default()))
                    .collect();
                month_map.insert(pad2(month), day_map);
            }
            years.insert(year, month_map);
        }

        Ok(Self { years })
    }
}

impl<V> Skeleton<V> {
    /// Number of day leaves
    pub fn leaf_count(&self) -> usize {
        self.years
            .values()
            .flat_map(|months| months.values())
            .map(|days| days.len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.leaf_count() == 0
    }

    /// Leaves in ascending year, month, day order
    pub fn iter(&self) -> impl Iterator<Item = (DateKey, &V)> + '_ {
        self.years.iter().flat_map(|(year, months)| {
            months.iter().flat_map(move |(month, days)| {
                days.iter().filter_map(move |(day, value)| {
                    let key = DateKey {
                        year: *year,
                        month: month.parse().ok()?,
                        day: day.parse().ok()?,
                    };
                    Some((key, value))
                })
            })
        })
    }

    /// Bucket coordinates in traversal order
    pub fn keys(&self) -> Vec<DateKey> {
        self.iter().map(|(key, _)| key).collect()
    }

    pub fn get(&self, key: &DateKey) -> Option<&V> {
        self.years
            .get(&key.year)?
            .get(&key.month_key())?
            .get(&key.day_key())
    }

    pub fn get_mut(&mut self, key: &DateKey) -> Option<&mut V> {
        self.years
            .get_mut(&key.year)?
            .get_mut(&key.month_key())?
            .get_mut(&key.day_key())
    }

    /// Year-level view for report summaries
    pub fn years(&self) -> &BTreeMap<i32, MonthMap<V>> {
        &self.years
    }
}

impl<V: LeafValue> Skeleton<V> {
    /// Fold a computed value into an existing leaf
    ///
    /// # Errors
    /// `InvalidData` when the key is not part of this skeleton.
    pub fn absorb(&mut self, key: &DateKey, value: V) -> AppResult<()> {
        let leaf = self.get_mut(key).ok_or_else(|| {
            AppError::InvalidData(format!("bucket {} is not part of the skeleton", key))
        })?;
        leaf.absorb(value);
        Ok(())
    }
}
