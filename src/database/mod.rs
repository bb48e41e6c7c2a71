//! Document store access for the bucket reports.
//!
//! ## Layout
//!
//! Imaging metadata lives in a SQLite file with one table per logical
//! collection (`image_MR`, `image_CT`, `series`, ...). Each row stores one
//! JSON document in the `doc` column:
//!
//! ```sql
//! CREATE TABLE image_MR (doc TEXT NOT NULL);
//! ```
//!
//! Nested fields such as `header.DicomFilePath` are read with SQLite's JSON
//! functions. The store is opened read-only; populating it is the ingestion
//! side's job.

pub mod helpers; // Row mapping shared by the document queries
pub mod query_helper; // Prefix filters and query collection
pub mod traits;

pub use query_helper::{QueryHelper, SqlFilter};
pub use traits::DataSource;

use crate::errors::{AppError, AppResult};
use crate::types::FieldPath;
use helpers::rendered_value_from_row;
use query_helper::{extract_expr, quote_identifier, type_expr};
use rusqlite::types::Value;
use rusqlite::{Connection, OpenFlags};
use std::path::Path;
use tracing::{debug, info};

/// SQLite-backed implementation of [`DataSource`]
pub struct DocumentStore {
    connection: Connection,
}

impl DocumentStore {
    /// Open an existing store file read-only
    ///
    /// # Errors
    /// `DataSourceUnavailable` when the file does not exist or cannot be opened.
    pub fn open_read_only(path: &Path) -> AppResult<Self> {
        let label = path.display().to_string();
        if !path.exists() {
            return Err(AppError::unavailable(
                &label,
                AppError::NO_BUCKET,
                "store file does not exist",
            ));
        }

        let connection = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|e| AppError::unavailable(&label, AppError::NO_BUCKET, e))?;

        info!("Document store opened read-only: {}", label);
        Ok(Self { connection })
    }

    /// Wrap an existing connection (in-memory stores, tests)
    pub fn from_connection(connection: Connection) -> Self {
        Self { connection }
    }

    /// Get a reference to the underlying connection
    pub fn connection(&self) -> &Connection {
        &self.connection
    }
}

impl DataSource for DocumentStore {
    fn collection_names(&self) -> AppResult<Vec<String>> {
        self.connection.query_collect(
            "SELECT name FROM sqlite_master \
             WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
            &[],
            |row| row.get(0),
        )
    }

    fn ensure_collection(&self, collection: &str) -> AppResult<()> {
        if self.connection.table_exists(collection)? {
            Ok(())
        } else {
            Err(AppError::unavailable(
                collection,
                AppError::NO_BUCKET,
                "collection does not exist",
            ))
        }
    }

    fn count_prefix(&self, collection: &str, field: &FieldPath, prefix: &str) -> AppResult<u64> {
        let filter = SqlFilter::prefix(field, prefix);
        self.connection.count_matching(collection, &filter)
    }

    fn count_prefix_with_field(
        &self,
        collection: &str,
        field: &FieldPath,
        prefix: &str,
        present: &FieldPath,
    ) -> AppResult<u64> {
        let filter = SqlFilter::prefix(field, prefix).and_exists(present);
        self.connection.count_matching(collection, &filter)
    }

    fn prefix_field_values(
        &self,
        collection: &str,
        field: &FieldPath,
        prefix: &str,
    ) -> AppResult<Vec<String>> {
        let filter = SqlFilter::prefix(field, prefix);
        let sql = format!(
            "SELECT {}, {} FROM {} WHERE {} ORDER BY rowid",
            extract_expr(field),
            type_expr(field),
            quote_identifier(collection),
            filter.clause
        );
        self.connection
            .query_collect(&sql, &filter.params, rendered_value_from_row)
    }

    fn distinct_prefix(
        &self,
        collection: &str,
        field: &FieldPath,
        prefix: &str,
        distinct: &FieldPath,
    ) -> AppResult<Vec<String>> {
        let filter = SqlFilter::prefix(field, prefix).and_exists(distinct);
        let sql = format!(
            "SELECT DISTINCT {}, {} FROM {} WHERE {}",
            extract_expr(distinct),
            type_expr(distinct),
            quote_identifier(collection),
            filter.clause
        );
        self.connection
            .query_collect(&sql, &filter.params, rendered_value_from_row)
    }

    fn group_counts(
        &self,
        collection: &str,
        field: &FieldPath,
        prefix: &str,
        group: &FieldPath,
        limit: Option<usize>,
    ) -> AppResult<Vec<(String, u64)>> {
        let filter = SqlFilter::prefix(field, prefix).and_exists(group);
        let sql = format!(
            "SELECT {value} AS group_value, {kind} AS group_kind, \
             COUNT(*), MIN(rowid) AS first_seen \
             FROM {table} WHERE {clause} \
             GROUP BY group_value, group_kind ORDER BY first_seen LIMIT ?",
            value = extract_expr(group),
            kind = type_expr(group),
            table = quote_identifier(collection),
            clause = filter.clause
        );

        let mut params = filter.params;
        // SQLite treats a negative LIMIT as "no limit"
        params.push(Value::Integer(limit.map(|n| n as i64).unwrap_or(-1)));

        let groups = self.connection.query_collect(&sql, &params, |row| {
            let rendered = rendered_value_from_row(row)?;
            let count: i64 = row.get(2)?;
            Ok((rendered, count.max(0) as u64))
        })?;

        debug!(
            "{} groups of {} under {} in {}",
            groups.len(),
            group,
            prefix,
            collection
        );
        Ok(groups)
    }
}
