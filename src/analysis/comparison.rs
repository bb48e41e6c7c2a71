//! Storage vs database count comparison
//!
//! Storage counts come from a walk of the archive (`year → month → day →
//! files`). Database counts are a `dual-count` report, either merged or
//! per collection. Every storage day is matched against the database counts
//! of the same day, summed over collections, and rolled up into monthly and
//! yearly rows with transfer percentages.

use crate::errors::{AppError, AppResult};
use crate::types::{DualCount, LeafValue};
use crate::utils::math::format_percentage;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Nested `year → month → day → value` listing with string keys
pub type CountListing<V> = BTreeMap<String, BTreeMap<String, BTreeMap<String, V>>>;

/// Database counts as read from a dual-count report
#[derive(Debug, Clone, PartialEq)]
pub enum DatabaseCounts {
    /// One skeleton for all collections
    Merged(CountListing<DualCount>),
    /// One skeleton per collection
    PerCollection(BTreeMap<String, CountListing<DualCount>>),
}

impl DatabaseCounts {
    /// Load a dual-count report written by `report --kind dual-count`
    ///
    /// A document whose top-level keys are all four-digit years is a merged
    /// report; anything else is read as collection → year → ...
    pub fn load(path: &Path) -> AppResult<Self> {
        let content = fs::read_to_string(path)?;
        let value: serde_json::Value = serde_json::from_str(&content).map_err(|e| {
            AppError::InvalidData(format!("{}: not valid JSON: {}", path.display(), e))
        })?;
        Self::from_value(value)
            .map_err(|e| AppError::InvalidData(format!("{}: {}", path.display(), e)))
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        let merged = value
            .as_object()
            .map(|map| map.keys().all(|key| is_year_key(key)))
            .unwrap_or(false);
        if merged {
            Ok(DatabaseCounts::Merged(serde_json::from_value(value)?))
        } else {
            Ok(DatabaseCounts::PerCollection(serde_json::from_value(value)?))
        }
    }

    /// Counts for one day, summed over collections; absent days count as zero
    pub fn day(&self, year: &str, month: &str, day: &str) -> Option<DualCount> {
        let lookup = |listing: &CountListing<DualCount>| {
            listing.get(year)?.get(month)?.get(day).copied()
        };
        match self {
            DatabaseCounts::Merged(listing) => lookup(listing),
            DatabaseCounts::PerCollection(collections) => {
                let mut total: Option<DualCount> = None;
                for listing in collections.values() {
                    if let Some(counts) = lookup(listing) {
                        total.get_or_insert_with(DualCount::default).absorb(counts);
                    }
                }
                total
            }
        }
    }

    /// Yearly totals per collection; empty for a merged report
    pub fn collection_years(&self) -> Vec<CollectionYear> {
        let DatabaseCounts::PerCollection(collections) = self else {
            return Vec::new();
        };

        let mut rows = Vec::new();
        for (collection, years) in collections {
            for (year, months) in years {
                let mut total = DualCount::default();
                for days in months.values() {
                    for counts in days.values() {
                        total.absorb(*counts);
                    }
                }
                rows.push(CollectionYear {
                    collection: collection.clone(),
                    year: year.clone(),
                    by_path: total.path_count(),
                    by_date: total.date_count(),
                });
            }
        }
        rows
    }
}

fn is_year_key(key: &str) -> bool {
    key.len() == 4 && key.bytes().all(|b| b.is_ascii_digit())
}

/// Storage count and the two database counts for some span of days
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CountRow {
    pub storage: u64,
    pub by_path: u64,
    pub by_date: u64,
}

impl CountRow {
    fn add(&mut self, other: &CountRow) {
        self.storage += other.storage;
        self.by_path += other.by_path;
        self.by_date += other.by_date;
    }

    /// Share of stored files found by path
    pub fn path_transfer(&self) -> String {
        format_percentage(self.by_path, self.storage)
    }

    /// Share of stored files found by StudyDate
    pub fn date_transfer(&self) -> String {
        format_percentage(self.by_date, self.storage)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayComparison {
    pub year: String,
    pub month: String,
    pub day: String,
    #[serde(flatten)]
    pub counts: CountRow,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthComparison {
    pub year: String,
    pub month: String,
    #[serde(flatten)]
    pub counts: CountRow,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearComparison {
    pub year: String,
    #[serde(flatten)]
    pub counts: CountRow,
    pub path_transfer: String,
    pub date_transfer: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionYear {
    pub collection: String,
    pub year: String,
    pub by_path: u64,
    pub by_date: u64,
}

/// Day-level comparison plus the per-collection yearly totals
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StorageComparison {
    pub days: Vec<DayComparison>,
    pub collections: Vec<CollectionYear>,
}

impl StorageComparison {
    /// Load a storage count listing (`year → month → day → files`)
    pub fn load_storage_counts(path: &Path) -> AppResult<CountListing<u64>> {
        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            AppError::InvalidData(format!("{}: not a storage count listing: {}", path.display(), e))
        })
    }

    /// Match every storage day against the database counts
    pub fn compare(storage: &CountListing<u64>, database: &DatabaseCounts) -> Self {
        let mut days = Vec::new();
        let mut unmatched = 0usize;

        for (year, months) in storage {
            for (month, month_days) in months {
                for (day, stored) in month_days {
                    let counts = database.day(year, month, day).unwrap_or_else(|| {
                        unmatched += 1;
                        DualCount::default()
                    });
                    days.push(DayComparison {
                        year: year.clone(),
                        month: month.clone(),
                        day: day.clone(),
                        counts: CountRow {
                            storage: *stored,
                            by_path: counts.path_count(),
                            by_date: counts.date_count(),
                        },
                    });
                }
            }
        }

        if unmatched > 0 {
            warn!(
                "{} storage days are absent from the database report and count as zero",
                unmatched
            );
        }
        info!("Compared {} storage days", days.len());

        Self {
            days,
            collections: database.collection_years(),
        }
    }

    /// Days rolled up per month, ascending
    pub fn months(&self) -> Vec<MonthComparison> {
        let mut totals: BTreeMap<(&str, &str), CountRow> = BTreeMap::new();
        for day in &self.days {
            totals
                .entry((day.year.as_str(), day.month.as_str()))
                .or_default()
                .add(&day.counts);
        }
        totals
            .into_iter()
            .map(|((year, month), counts)| MonthComparison {
                year: year.to_string(),
                month: month.to_string(),
                counts,
            })
            .collect()
    }

    /// Days rolled up per year with transfer percentages
    pub fn years(&self) -> Vec<YearComparison> {
        let mut totals: BTreeMap<&str, CountRow> = BTreeMap::new();
        for day in &self.days {
            totals.entry(day.year.as_str()).or_default().add(&day.counts);
        }
        totals
            .into_iter()
            .map(|(year, counts)| YearComparison {
                year: year.to_string(),
                path_transfer: counts.path_transfer(),
                date_transfer: counts.date_transfer(),
                counts,
            })
            .collect()
    }

    pub fn total(&self) -> CountRow {
        let mut total = CountRow::default();
        for day in &self.days {
            total.add(&day.counts);
        }
        total
    }
}
