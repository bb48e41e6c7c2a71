//! Report formatting and output generation
//!
//! Provides formatting for filled skeletons via the [`ReportFormatter`] facade.
//! Supports JSON (the bare skeleton) and Console summaries.

pub mod buckets;
pub mod comparison;
pub mod utils;

use crate::analysis::comparison::StorageComparison;
use crate::analysis::{BucketReport, CollectionReports, ReportRequest};
use crate::errors::{AppError, AppResult};
use clap::ValueEnum;
use std::fmt;
use std::str::FromStr;

/// Output format options for bucket reports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Json,
    Console,
}

impl FromStr for OutputFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        <Self as ValueEnum>::from_str(s, true)
            .map_err(|_| AppError::Config(format!("unknown output format '{}'", s)))
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Json => f.write_str("json"),
            OutputFormat::Console => f.write_str("console"),
        }
    }
}

/// Facade for all report formatting operations
pub struct ReportFormatter;

impl ReportFormatter {
    // Utilities
    pub fn format_number(n: u64) -> String {
        utils::format_number(n)
    }

    // Bucket reports
    pub fn format_bucket_report(
        report: &BucketReport,
        request: &ReportRequest,
        format: &OutputFormat,
    ) -> AppResult<String> {
        buckets::format_bucket_report(report, request, format)
    }

    pub fn format_collection_reports(
        reports: &CollectionReports,
        request: &ReportRequest,
        format: &OutputFormat,
    ) -> AppResult<String> {
        buckets::format_collection_reports(reports, request, format)
    }

    pub fn format_collections(names: &[String], format: &OutputFormat) -> AppResult<String> {
        buckets::format_collections(names, format)
    }

    // Storage comparison
    pub fn format_comparison(
        comparison: &StorageComparison,
        daily: bool,
        format: &OutputFormat,
    ) -> AppResult<String> {
        comparison::format_comparison(comparison, daily, format)
    }
}
