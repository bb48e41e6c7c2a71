//! Report type system
//!
//! - `date_key`: day-level bucket coordinates and their prefix renderings
//! - `skeleton`: the year → month → day report structure and its builder
//! - `leaf_values`: per-day statistics and their accumulation rules
//! - `statistic`: statistic kinds and validated document field paths
//! - `statistics`: run counters and timing

pub mod date_key;
pub mod leaf_values;
pub mod skeleton;
pub mod statistic;
pub mod statistics;

pub use date_key::DateKey;
pub use leaf_values::{AccessionSet, DualCount, LeafValue, TagProportion};
pub use skeleton::{validate_years, DayRange, MonthRange, Skeleton};
pub use statistic::{FieldPath, FieldSelector, PrefixField, StatisticKind};
pub use statistics::{FillStats, TimingInfo};
