//! Data source abstraction consumed by the bucket collector.
//!
//! Every read the collector issues is an anchored prefix match on one
//! document field of one named collection. Implementations must treat an
//! empty match as a zero result, and report a missing collection or lost
//! connection as an error.

use crate::errors::AppResult;
use crate::types::FieldPath;

/// Read-only access to named document collections
pub trait DataSource {
    /// Names of all collections, ascending
    fn collection_names(&self) -> AppResult<Vec<String>>;

    /// Fail with `DataSourceUnavailable` unless `collection` exists
    fn ensure_collection(&self, collection: &str) -> AppResult<()>;

    /// Count documents whose `field` starts with `prefix`
    fn count_prefix(&self, collection: &str, field: &FieldPath, prefix: &str) -> AppResult<u64>;

    /// Count documents whose `field` starts with `prefix` and that carry `present`
    fn count_prefix_with_field(
        &self,
        collection: &str,
        field: &FieldPath,
        prefix: &str,
        present: &FieldPath,
    ) -> AppResult<u64>;

    /// Values of `field` for every document whose `field` starts with `prefix`
    /// (one entry per document, duplicates kept)
    fn prefix_field_values(
        &self,
        collection: &str,
        field: &FieldPath,
        prefix: &str,
    ) -> AppResult<Vec<String>>;

    /// Distinct values of `distinct` among documents whose `field` starts with
    /// `prefix`; documents lacking `distinct` are ignored
    fn distinct_prefix(
        &self,
        collection: &str,
        field: &FieldPath,
        prefix: &str,
        distinct: &FieldPath,
    ) -> AppResult<Vec<String>>;

    /// Grouped document counts per value of `group` among documents whose
    /// `field` starts with `prefix` and that carry `group`
    ///
    /// Groups are returned in discovery order (the order their first document
    /// was stored) and truncated to `limit` groups when given.
    fn group_counts(
        &self,
        collection: &str,
        field: &FieldPath,
        prefix: &str,
        group: &FieldPath,
        limit: Option<usize>,
    ) -> AppResult<Vec<(String, u64)>>;
}
