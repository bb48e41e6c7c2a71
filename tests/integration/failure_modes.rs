//! Failures abort the run and name the collection and bucket

use crate::common::db_seeding::{image_doc, seed_collection};
use crate::common::store::TestStore;
use dicom_bucket_audit::analysis::collector::fill;
use dicom_bucket_audit::analysis::{CollectionSelection, RawCounter, ReportEngine, ReportRequest};
use dicom_bucket_audit::database::{DataSource, DocumentStore};
use dicom_bucket_audit::errors::{AppError, AppResult};
use dicom_bucket_audit::types::{
    FieldPath, FieldSelector, FillStats, MonthRange, Skeleton, StatisticKind,
};
use std::cell::Cell;

/// Delegates to a real store but loses its connection at one bucket prefix
struct FlakySource {
    inner: DocumentStore,
    fail_at: &'static str,
    queries: Cell<u32>,
}

impl DataSource for FlakySource {
    fn collection_names(&self) -> AppResult<Vec<String>> {
        self.inner.collection_names()
    }

    fn ensure_collection(&self, collection: &str) -> AppResult<()> {
        self.inner.ensure_collection(collection)
    }

    fn count_prefix(&self, collection: &str, field: &FieldPath, prefix: &str) -> AppResult<u64> {
        self.queries.set(self.queries.get() + 1);
        if prefix == self.fail_at {
            return Err(AppError::Io(std::io::Error::new(
                std::io::ErrorKind::ConnectionReset,
                "connection reset",
            )));
        }
        self.inner.count_prefix(collection, field, prefix)
    }

    fn count_prefix_with_field(
        &self,
        collection: &str,
        field: &FieldPath,
        prefix: &str,
        present: &FieldPath,
    ) -> AppResult<u64> {
        self.inner
            .count_prefix_with_field(collection, field, prefix, present)
    }

    fn prefix_field_values(
        &self,
        collection: &str,
        field: &FieldPath,
        prefix: &str,
    ) -> AppResult<Vec<String>> {
        self.inner.prefix_field_values(collection, field, prefix)
    }

    fn distinct_prefix(
        &self,
        collection: &str,
        field: &FieldPath,
        prefix: &str,
        distinct: &FieldPath,
    ) -> AppResult<Vec<String>> {
        self.inner.distinct_prefix(collection, field, prefix, distinct)
    }

    fn group_counts(
        &self,
        collection: &str,
        field: &FieldPath,
        prefix: &str,
        group: &FieldPath,
        limit: Option<usize>,
    ) -> AppResult<Vec<(String, u64)>> {
        self.inner.group_counts(collection, field, prefix, group, limit)
    }
}

fn seeded_store() -> anyhow::Result<TestStore> {
    let store = TestStore::new()?;
    seed_collection(
        &store.writer()?,
        "image_MR",
        &[image_doc("2016/01/02/E-1", "1.dcm")],
    )?;
    Ok(store)
}

#[test]
fn test_missing_collection_is_unavailable() -> anyhow::Result<()> {
    let store = seeded_store()?;
    let engine = ReportEngine::new(|| store.open());
    let request = ReportRequest::new(StatisticKind::RawCount, 2016, 2016)
        .with_collections(CollectionSelection::Named(vec!["image_XA".to_string()]));

    match engine.run(&request) {
        Err(AppError::DataSourceUnavailable { collection, .. }) => {
            assert_eq!(collection, "image_XA")
        }
        other => panic!("expected DataSourceUnavailable, got {:?}", other.map(|_| ())),
    }
    Ok(())
}

#[test]
fn test_failing_bucket_aborts_with_coordinates() -> anyhow::Result<()> {
    let store = seeded_store()?;
    let source = FlakySource {
        inner: store.open()?,
        fail_at: "2016/01/03",
        queries: Cell::new(0),
    };
    let counter = RawCounter::new(&FieldSelector::defaults_for(StatisticKind::RawCount));
    let skeleton: Skeleton<u64> = Skeleton::build(2016, 2016, MonthRange::single(1)?)?;
    let mut stats = FillStats::new();

    match fill(skeleton, &source, "image_MR", &counter, &mut stats) {
        Err(AppError::DataSourceUnavailable {
            collection,
            bucket,
            reason,
        }) => {
            assert_eq!(collection, "image_MR");
            assert_eq!(bucket, "2016/01/03");
            assert!(reason.contains("connection reset"));
        }
        other => panic!("expected DataSourceUnavailable, got {:?}", other.map(|_| ())),
    }
    // Nothing after the failing bucket is queried
    assert_eq!(source.queries.get(), 3);
    assert_eq!(stats.buckets_filled, 2);
    Ok(())
}

#[test]
fn test_inverted_years_fail_before_opening_store() {
    let engine = ReportEngine::new(|| -> AppResult<DocumentStore> {
        panic!("no store may be opened for an invalid range")
    });
    let request = ReportRequest::new(StatisticKind::Accessions, 2018, 2010);
    assert!(matches!(engine.run(&request), Err(AppError::InvalidRange(_))));
}

#[test]
fn test_missing_store_file_is_unavailable() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("absent.db");
    let engine = ReportEngine::new(|| DocumentStore::open_read_only(&path));
    let request = ReportRequest::new(StatisticKind::RawCount, 2016, 2016);
    assert!(matches!(
        engine.run(&request),
        Err(AppError::DataSourceUnavailable { .. })
    ));
    Ok(())
}

#[test]
fn test_unsafe_field_rejected() {
    assert!(matches!(
        FieldPath::parse("header.DicomFilePath') OR 1=1 --"),
        Err(AppError::InvalidField { .. })
    ));
}
