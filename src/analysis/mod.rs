//! Date-bucket report engine
//!
//! ## Overview
//!
//! A report run has two sequential phases:
//!
//! - **Skeleton build** - the full year → month → day structure for the
//!   requested range, every leaf at the statistic's zero value
//! - **Bucket fill** - one [`LeafComputation`] per bucket, per collection,
//!   folded into the skeleton by the [`collector`]
//!
//! [`ReportEngine`] ties the two together and picks the computation from the
//! request's [`StatisticKind`].
//!
//! ## Usage
//!
//! ```rust,no_run
//! use dicom_bucket_audit::analysis::{ReportEngine, ReportRequest};
//! use dicom_bucket_audit::database::DocumentStore;
//! use dicom_bucket_audit::errors::AppResult;
//! use dicom_bucket_audit::types::StatisticKind;
//! use std::path::Path;
//!
//! fn example() -> AppResult<()> {
//!     let engine = ReportEngine::new(|| DocumentStore::open_read_only(Path::new("./dicom.db")));
//!     let request = ReportRequest::new(StatisticKind::Accessions, 2016, 2016);
//!     let report = engine.run(&request)?;
//!     println!("{}", report.to_json()?);
//!     Ok(())
//! }
//! ```

pub mod collector;
pub mod comparison;
pub mod gaps;
pub mod leaf_computations;
pub mod reports;

pub use comparison::{DatabaseCounts, StorageComparison};
pub use gaps::{AccessionListing, GapFinder, GapRecord};
pub use leaf_computations::{
    AccessionCollector, DistinctStudyCounter, DualCounter, LeafComputation, RawCounter,
    TagProportionCounter,
};
pub use reports::{OutputFormat, ReportFormatter};

use crate::database::DataSource;
use crate::errors::{AppError, AppResult};
use crate::types::{
    validate_years, AccessionSet, DayRange, DualCount, FieldSelector, FillStats, MonthRange,
    PrefixField, Skeleton, StatisticKind, TagProportion,
};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::info;

/// Collection the report is computed over when none is named
pub const DEFAULT_COLLECTION: &str = "image_MR";

/// Accession listings are read from the series-level documents
pub const DEFAULT_ACCESSION_COLLECTION: &str = "series";

/// Collection skipped by "all collections" runs unless told otherwise
pub const DEFAULT_EXCLUDED_COLLECTION: &str = "series";

/// Which collections a run reads
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectionSelection {
    /// Exactly these collections
    Named(Vec<String>),
    /// Every collection in the store except `excluded`
    All { excluded: Vec<String> },
}

impl Default for CollectionSelection {
    fn default() -> Self {
        CollectionSelection::Named(vec![DEFAULT_COLLECTION.to_string()])
    }
}

impl CollectionSelection {
    /// The single default collection for `kind`
    pub fn default_for(kind: StatisticKind) -> Self {
        let name = match kind {
            StatisticKind::Accessions => DEFAULT_ACCESSION_COLLECTION,
            _ => DEFAULT_COLLECTION,
        };
        CollectionSelection::Named(vec![name.to_string()])
    }
}

/// Everything a report run needs
#[derive(Debug, Clone)]
pub struct ReportRequest {
    pub kind: StatisticKind,
    pub min_year: i32,
    pub max_year: i32,
    pub months: MonthRange,
    pub days: Option<DayRange>,
    pub collections: CollectionSelection,
    pub fields: FieldSelector,
    /// Cap on grouped tag values per bucket; `None` keeps them all
    pub value_limit: Option<usize>,
    pub workers: usize,
}

impl ReportRequest {
    /// Default request for `kind`: all months, the kind's default collection
    /// (see [`CollectionSelection::default_for`]), default fields, three tag
    /// values, sequential fill
    pub fn new(kind: StatisticKind, min_year: i32, max_year: i32) -> Self {
        Self {
            kind,
            min_year,
            max_year,
            months: MonthRange::ALL,
            days: None,
            collections: CollectionSelection::default_for(kind),
            fields: FieldSelector::defaults_for(kind),
            value_limit: Some(3),
            workers: 1,
        }
    }

    pub fn with_months(mut self, months: MonthRange) -> Self {
        self.months = months;
        self
    }

    pub fn with_days(mut self, days: Option<DayRange>) -> Self {
        self.days = days;
        self
    }

    pub fn with_collections(mut self, collections: CollectionSelection) -> Self {
        self.collections = collections;
        self
    }

    pub fn with_fields(mut self, fields: FieldSelector) -> Self {
        self.fields = fields;
        self
    }

    pub fn with_value_limit(mut self, value_limit: Option<usize>) -> Self {
        self.value_limit = value_limit;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Check the request before any query is issued
    pub fn validate(&self) -> AppResult<()> {
        validate_years(self.min_year, self.max_year)?;
        self.months.validate()?;
        if let Some(days) = &self.days {
            days.validate()?;
        }

        if self.workers == 0 {
            return Err(AppError::Config("workers must be at least 1".to_string()));
        }

        if let CollectionSelection::Named(names) = &self.collections {
            if names.is_empty() {
                return Err(AppError::Config("no collection named".to_string()));
            }
            if names.iter().any(|name| name.trim().is_empty()) {
                return Err(AppError::Config("empty collection name".to_string()));
            }
        }

        // Dual counts and accessions are defined on the hierarchical path field
        let needs_path = matches!(
            self.kind,
            StatisticKind::DualCount | StatisticKind::Accessions
        );
        if needs_path {
            if let PrefixField::Date(field) = &self.fields.prefix {
                return Err(AppError::InvalidField {
                    field: field.to_string(),
                    reason: format!("{} needs a path prefix field", self.kind),
                });
            }
        }

        Ok(())
    }
}

/// A filled skeleton, one variant per leaf type
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum BucketReport {
    Count(Skeleton<u64>),
    Dual(Skeleton<DualCount>),
    Accessions(Skeleton<AccessionSet>),
    Proportion(Skeleton<TagProportion>),
}

impl BucketReport {
    pub fn leaf_count(&self) -> usize {
        match self {
            BucketReport::Count(s) => s.leaf_count(),
            BucketReport::Dual(s) => s.leaf_count(),
            BucketReport::Accessions(s) => s.leaf_count(),
            BucketReport::Proportion(s) => s.leaf_count(),
        }
    }

    /// The bare skeleton as pretty JSON
    pub fn to_json(&self) -> AppResult<String> {
        reports::utils::export_json(self)
    }
}

/// One filled skeleton per collection, serialised as collection → year → ...
pub type CollectionReports = BTreeMap<String, BucketReport>;

/// Runs report requests against stores produced by `open_source`
///
/// `open_source` is called once for the run itself and once more per worker
/// when the request asks for more than one.
pub struct ReportEngine<F> {
    open_source: F,
}

impl<S, F> ReportEngine<F>
where
    S: DataSource,
    F: Fn() -> AppResult<S> + Sync,
{
    pub fn new(open_source: F) -> Self {
        Self { open_source }
    }

    /// Every collection in the store, ascending
    pub fn list_collections(&self) -> AppResult<Vec<String>> {
        (self.open_source)()?.collection_names()
    }

    pub fn run(&self, request: &ReportRequest) -> AppResult<BucketReport> {
        self.run_with_stats(request).map(|(report, _)| report)
    }

    /// Run a request, also returning fill counters
    ///
    /// Every resolved collection is folded into one skeleton.
    ///
    /// # Errors
    /// - `InvalidRange` / `InvalidField` / `Config` from validation, before any query
    /// - `DataSourceUnavailable` for a missing collection or failed bucket
    pub fn run_with_stats(&self, request: &ReportRequest) -> AppResult<(BucketReport, FillStats)> {
        let (source, collections) = self.prepare(request)?;

        let mut stats = FillStats::new();
        let report = self.report_for(&source, request, &collections, &mut stats)?;

        stats.finish();
        info!("Report complete: {}", stats.summary());
        Ok((report, stats))
    }

    /// Run a request keeping one skeleton per collection
    ///
    /// Fails on the same conditions as [`ReportEngine::run_with_stats`].
    pub fn run_per_collection(
        &self,
        request: &ReportRequest,
    ) -> AppResult<(CollectionReports, FillStats)> {
        let (source, collections) = self.prepare(request)?;

        let mut stats = FillStats::new();
        let mut reports = CollectionReports::new();
        for collection in collections {
            let report =
                self.report_for(&source, request, std::slice::from_ref(&collection), &mut stats)?;
            reports.insert(collection, report);
        }

        stats.finish();
        info!("Per-collection report complete: {}", stats.summary());
        Ok((reports, stats))
    }

    /// Validate, open the store and resolve collection names
    fn prepare(&self, request: &ReportRequest) -> AppResult<(S, Vec<String>)> {
        request.validate()?;

        let source = (self.open_source)()?;
        let collections = resolve_collections(&source, &request.collections)?;
        info!(
            "{} report for {}-{} (months {}) over {}",
            request.kind,
            request.min_year,
            request.max_year,
            request.months,
            collections.join(", ")
        );
        Ok((source, collections))
    }

    /// Build and fill one skeleton for `collections`
    fn report_for(
        &self,
        source: &S,
        request: &ReportRequest,
        collections: &[String],
        stats: &mut FillStats,
    ) -> AppResult<BucketReport> {
        let fields = &request.fields;
        let report = match request.kind {
            StatisticKind::RawCount => BucketReport::Count(self.fill_all(
                source,
                request,
                collections,
                &RawCounter::new(fields),
                stats,
            )?),
            StatisticKind::DualCount => BucketReport::Dual(self.fill_all(
                source,
                request,
                collections,
                &DualCounter::new(fields),
                stats,
            )?),
            StatisticKind::Accessions => BucketReport::Accessions(self.fill_all(
                source,
                request,
                collections,
                &AccessionCollector::new(fields),
                stats,
            )?),
            StatisticKind::DistinctStudies => BucketReport::Count(self.fill_all(
                source,
                request,
                collections,
                &DistinctStudyCounter::new(fields),
                stats,
            )?),
            StatisticKind::TagProportion => BucketReport::Proportion(self.fill_all(
                source,
                request,
                collections,
                &TagProportionCounter::new(fields, request.value_limit),
                stats,
            )?),
        };
        Ok(report)
    }

    fn fill_all<C: LeafComputation>(
        &self,
        source: &S,
        request: &ReportRequest,
        collections: &[String],
        computation: &C,
        stats: &mut FillStats,
    ) -> AppResult<Skeleton<C::Value>> {
        let mut skeleton = Skeleton::build_with_days(
            request.min_year,
            request.max_year,
            request.months,
            request.days,
        )?;

        for collection in collections {
            skeleton = if request.workers > 1 {
                collector::fill_parallel(
                    skeleton,
                    &self.open_source,
                    collection,
                    computation,
                    request.workers,
                    stats,
                )?
            } else {
                collector::fill(skeleton, source, collection, computation, stats)?
            };
        }

        Ok(skeleton)
    }
}

/// Collections in ascending name order, duplicates removed
fn resolve_collections<S: DataSource>(
    source: &S,
    selection: &CollectionSelection,
) -> AppResult<Vec<String>> {
    let mut collections = match selection {
        CollectionSelection::Named(names) => names.clone(),
        CollectionSelection::All { excluded } => source
            .collection_names()?
            .into_iter()
            .filter(|name| !excluded.contains(name))
            .collect(),
    };
    collections.sort();
    collections.dedup();

    if collections.is_empty() {
        return Err(AppError::Config(
            "no collections left to report on".to_string(),
        ));
    }
    Ok(collections)
}
