//! Leaf statistics stored at each day bucket
//!
//! Exactly one leaf type is active per skeleton; the generic parameter of
//! [`Skeleton`](super::skeleton::Skeleton) pins it for the whole run.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::Debug;

/// A per-day statistic with a zero value and an accumulation rule
///
/// `absorb` is how a freshly computed value lands in the skeleton. Starting
/// from `Default`, absorbing a single value is equivalent to storing it; runs
/// over several collections absorb once per collection, so the rule must be
/// commutative and associative for the final report to be order-independent.
pub trait LeafValue: Default + Clone + Debug + PartialEq + Serialize + Send + 'static {
    fn absorb(&mut self, other: Self);
}

/// Scalar document count
impl LeafValue for u64 {
    fn absorb(&mut self, other: Self) {
        *self += other;
    }
}

/// Distinct accession identifiers, kept sorted by the set itself
pub type AccessionSet = BTreeSet<String>;

impl LeafValue for AccessionSet {
    fn absorb(&mut self, other: Self) {
        self.extend(other);
    }
}

/// `[path-field count, date-field count]` for the same bucket
///
/// Serialises as a two-element array to keep the report layout of the
/// per-day dual counts.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DualCount(pub u64, pub u64);

impl DualCount {
    pub fn path_count(&self) -> u64 {
        self.0
    }

    pub fn date_count(&self) -> u64 {
        self.1
    }
}

impl LeafValue for DualCount {
    fn absorb(&mut self, other: Self) {
        self.0 += other.0;
        self.1 += other.1;
    }
}

/// Tag availability within a bucket
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagProportion {
    /// Documents matching the bucket prefix
    pub total_count: u64,

    /// Of those, documents where the tag field exists
    pub tag_count: u64,

    /// Tag value → document count, in discovery order; absent when no
    /// document in the bucket carries the tag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<IndexMap<String, u64>>,
}

impl LeafValue for TagProportion {
    fn absorb(&mut self, other: Self) {
        self.total_count += other.total_count;
        self.tag_count += other.tag_count;

        if let Some(incoming) = other.values {
            let values = self.values.get_or_insert_with(IndexMap::new);
            for (value, count) in incoming {
                *values.entry(value).or_insert(0) += count;
            }
        }
    }
}
