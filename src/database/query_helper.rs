//! Query helper utilities for prefix-bucket queries
//!
//! This module consolidates the query patterns every leaf computation needs:
//! - Anchored prefix filters on a JSON document field
//! - Row counting under a filter
//! - Multi-row collection with mapping
//!
//! ## Anchored prefix matching
//!
//! A prefix match is expressed as the half-open range
//! `prefix <= value < successor(prefix)` rather than `LIKE 'prefix%'`.
//! Field paths are validated and inlined as literals so an expression index
//! such as
//!
//! ```sql
//! CREATE INDEX image_mr_path ON image_MR (json_extract(doc, '$.header.DicomFilePath'));
//! ```
//!
//! can serve the range.

use crate::errors::AppResult;
use crate::types::FieldPath;
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, Row};

/// Column holding each JSON document
pub const DOCUMENT_COLUMN: &str = "doc";

/// Quote a collection name as an SQL identifier
///
/// # Examples
/// ```
/// use dicom_bucket_audit::database::query_helper::quote_identifier;
/// assert_eq!(quote_identifier("image_MR"), "\"image_MR\"");
/// assert_eq!(quote_identifier("we\"ird"), "\"we\"\"ird\"");
/// ```
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// `json_extract(doc, '$.field')` for a validated field
pub fn extract_expr(field: &FieldPath) -> String {
    format!("json_extract({}, '{}')", DOCUMENT_COLUMN, field.json_path())
}

/// `json_type(doc, '$.field')`; NULL when the field is absent, `'null'` when
/// present with a JSON null
pub fn type_expr(field: &FieldPath) -> String {
    format!("json_type({}, '{}')", DOCUMENT_COLUMN, field.json_path())
}

/// Smallest string greater than every string starting with `prefix`
///
/// `None` when no such bound exists (empty prefix, or every character is
/// `char::MAX`), meaning the range is unbounded above.
///
/// # Examples
/// ```
/// use dicom_bucket_audit::database::query_helper::prefix_upper_bound;
/// assert_eq!(prefix_upper_bound("2016/01/05").as_deref(), Some("2016/01/06"));
/// assert_eq!(prefix_upper_bound("20160109").as_deref(), Some("2016010:"));
/// assert_eq!(prefix_upper_bound(""), None);
/// ```
pub fn prefix_upper_bound(prefix: &str) -> Option<String> {
    let mut chars: Vec<char> = prefix.chars().collect();
    while let Some(last) = chars.pop() {
        let mut next = last as u32 + 1;
        // Skip the surrogate gap
        if (0xD800..=0xDFFF).contains(&next) {
            next = 0xE000;
        }
        if let Some(successor) = char::from_u32(next) {
            chars.push(successor);
            return Some(chars.into_iter().collect());
        }
    }
    None
}

/// A WHERE fragment plus its positional parameters
#[derive(Debug, Clone, PartialEq)]
pub struct SqlFilter {
    pub clause: String,
    pub params: Vec<Value>,
}

impl SqlFilter {
    /// Anchored prefix match of `field` on `prefix`
    pub fn prefix(field: &FieldPath, prefix: &str) -> Self {
        let expr = extract_expr(field);
        let mut params = vec![Value::Text(prefix.to_string())];
        let clause = match prefix_upper_bound(prefix) {
            Some(upper) => {
                params.push(Value::Text(upper));
                format!("{expr} >= ? AND {expr} < ?")
            }
            None => format!("{expr} >= ?"),
        };
        Self { clause, params }
    }

    /// Require `field` to exist in the document (JSON null counts as present)
    pub fn and_exists(mut self, field: &FieldPath) -> Self {
        self.clause = format!("({}) AND {} IS NOT NULL", self.clause, type_expr(field));
        self
    }
}

/// Helper trait for the query patterns used by the document store
pub trait QueryHelper {
    /// COUNT(*) of `table` rows matching `filter`
    fn count_matching(&self, table: &str, filter: &SqlFilter) -> AppResult<u64>;

    /// Execute a query with positional parameters, collecting mapped rows
    fn query_collect<T, F>(&self, sql: &str, params: &[Value], mapper: F) -> AppResult<Vec<T>>
    where
        F: FnMut(&Row) -> rusqlite::Result<T>;

    /// Whether a table or view named `name` exists
    fn table_exists(&self, name: &str) -> AppResult<bool>;
}

impl QueryHelper for Connection {
    fn count_matching(&self, table: &str, filter: &SqlFilter) -> AppResult<u64> {
        let sql = format!(
            "SELECT COUNT(*) FROM {} WHERE {}",
            quote_identifier(table),
            filter.clause
        );
        let count: i64 = self.query_row(&sql, params_from_iter(filter.params.iter()), |row| {
            row.get(0)
        })?;
        Ok(count.max(0) as u64)
    }

    fn query_collect<T, F>(&self, sql: &str, params: &[Value], mut mapper: F) -> AppResult<Vec<T>>
    where
        F: FnMut(&Row) -> rusqlite::Result<T>,
    {
        let mut stmt = self.prepare(sql)?;
        let results = stmt
            .query_map(params_from_iter(params.iter()), &mut mapper)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(results)
    }

    fn table_exists(&self, name: &str) -> AppResult<bool> {
        let count: i64 = self.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type IN ('table', 'view') AND name = ?1",
            [name],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }
}
