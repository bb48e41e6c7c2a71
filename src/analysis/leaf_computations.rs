//! Per-bucket leaf computations, one per statistic kind
//!
//! A computation turns a bucket's date key plus a data source into the leaf
//! value for that bucket. It never touches the skeleton itself; the collector
//! decides how the value lands there.

use crate::database::helpers::last_path_segment;
use crate::database::DataSource;
use crate::errors::AppResult;
use crate::types::{
    AccessionSet, DateKey, DualCount, FieldPath, FieldSelector, LeafValue, PrefixField,
    StatisticKind, TagProportion,
};
use indexmap::IndexMap;

/// The statistic-specific part of a bucket fill
pub trait LeafComputation: Sync {
    type Value: LeafValue;

    fn kind(&self) -> StatisticKind;

    /// Queries issued against the data source for one bucket
    fn queries_per_bucket(&self) -> u64;

    fn compute(
        &self,
        source: &dyn DataSource,
        collection: &str,
        key: &DateKey,
    ) -> AppResult<Self::Value>;
}

/// Raw document count on one prefix field
#[derive(Debug, Clone)]
pub struct RawCounter {
    pub prefix: PrefixField,
}

impl RawCounter {
    pub fn new(selector: &FieldSelector) -> Self {
        Self {
            prefix: selector.prefix.clone(),
        }
    }
}

impl LeafComputation for RawCounter {
    type Value = u64;

    fn kind(&self) -> StatisticKind {
        StatisticKind::RawCount
    }

    fn queries_per_bucket(&self) -> u64 {
        1
    }

    fn compute(&self, source: &dyn DataSource, collection: &str, key: &DateKey) -> AppResult<u64> {
        source.count_prefix(collection, self.prefix.field(), &self.prefix.prefix_for(key))
    }
}

/// Path-field count (`YYYY/MM/DD`) and date-field count (`YYYYMMDD`) for the
/// same bucket and collection
#[derive(Debug, Clone)]
pub struct DualCounter {
    pub path_field: FieldPath,
    pub date_field: FieldPath,
}

impl DualCounter {
    pub fn new(selector: &FieldSelector) -> Self {
        Self {
            path_field: selector.prefix.field().clone(),
            date_field: selector.date_field.clone(),
        }
    }
}

impl LeafComputation for DualCounter {
    type Value = DualCount;

    fn kind(&self) -> StatisticKind {
        StatisticKind::DualCount
    }

    fn queries_per_bucket(&self) -> u64 {
        2
    }

    fn compute(
        &self,
        source: &dyn DataSource,
        collection: &str,
        key: &DateKey,
    ) -> AppResult<DualCount> {
        let by_path = source.count_prefix(collection, &self.path_field, &key.path_prefix())?;
        let by_date = source.count_prefix(collection, &self.date_field, &key.date_prefix())?;
        Ok(DualCount(by_path, by_date))
    }
}

/// Distinct accessions: the final path segment of every matching document
#[derive(Debug, Clone)]
pub struct AccessionCollector {
    pub prefix: PrefixField,
}

impl AccessionCollector {
    pub fn new(selector: &FieldSelector) -> Self {
        Self {
            prefix: selector.prefix.clone(),
        }
    }
}

impl LeafComputation for AccessionCollector {
    type Value = AccessionSet;

    fn kind(&self) -> StatisticKind {
        StatisticKind::Accessions
    }

    fn queries_per_bucket(&self) -> u64 {
        1
    }

    fn compute(
        &self,
        source: &dyn DataSource,
        collection: &str,
        key: &DateKey,
    ) -> AppResult<AccessionSet> {
        let prefix = self.prefix.prefix_for(key);
        let paths = source.prefix_field_values(collection, self.prefix.field(), &prefix)?;
        Ok(paths
            .iter()
            .map(|path| last_path_segment(path).to_string())
            .collect())
    }
}

/// Number of distinct study identifiers among matching documents
#[derive(Debug, Clone)]
pub struct DistinctStudyCounter {
    pub prefix: PrefixField,
    pub study_field: FieldPath,
}

impl DistinctStudyCounter {
    pub fn new(selector: &FieldSelector) -> Self {
        Self {
            prefix: selector.prefix.clone(),
            study_field: selector.study_field.clone(),
        }
    }
}

impl LeafComputation for DistinctStudyCounter {
    type Value = u64;

    fn kind(&self) -> StatisticKind {
        StatisticKind::DistinctStudies
    }

    fn queries_per_bucket(&self) -> u64 {
        1
    }

    fn compute(&self, source: &dyn DataSource, collection: &str, key: &DateKey) -> AppResult<u64> {
        let studies = source.distinct_prefix(
            collection,
            self.prefix.field(),
            &self.prefix.prefix_for(key),
            &self.study_field,
        )?;
        Ok(studies.len() as u64)
    }
}

/// Total documents, documents carrying the tag, and tag value counts
///
/// `value_limit` truncates the grouped values in discovery order; it is not a
/// top-K by frequency.
#[derive(Debug, Clone)]
pub struct TagProportionCounter {
    pub prefix: PrefixField,
    pub tag: FieldPath,
    pub value_limit: Option<usize>,
}

impl TagProportionCounter {
    /// A limit of `Some(0)` keeps every value, as `None` does
    pub fn new(selector: &FieldSelector, value_limit: Option<usize>) -> Self {
        Self {
            prefix: selector.prefix.clone(),
            tag: selector.tag.clone(),
            value_limit: value_limit.filter(|&limit| limit > 0),
        }
    }
}

impl LeafComputation for TagProportionCounter {
    type Value = TagProportion;

    fn kind(&self) -> StatisticKind {
        StatisticKind::TagProportion
    }

    fn queries_per_bucket(&self) -> u64 {
        3
    }

    fn compute(
        &self,
        source: &dyn DataSource,
        collection: &str,
        key: &DateKey,
    ) -> AppResult<TagProportion> {
        let field = self.prefix.field();
        let prefix = self.prefix.prefix_for(key);

        let total_count = source.count_prefix(collection, field, &prefix)?;
        let tag_count = source.count_prefix_with_field(collection, field, &prefix, &self.tag)?;
        let groups = source.group_counts(collection, field, &prefix, &self.tag, self.value_limit)?;

        let values = if groups.is_empty() {
            None
        } else {
            let mut values = IndexMap::with_capacity(groups.len());
            for (value, count) in groups {
                // Distinct JSON values can render to the same key (e.g. "null")
                *values.entry(value).or_insert(0) += count;
            }
            Some(values)
        };

        Ok(TagProportion {
            total_count,
            tag_count,
            values,
        })
    }
}
