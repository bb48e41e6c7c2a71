use super::emit;
use crate::analysis::{DatabaseCounts, OutputFormat, ReportFormatter, StorageComparison};
use crate::errors::AppResult;
use clap::Args;
use std::path::PathBuf;
use tracing::info;

#[derive(Args)]
pub struct CompareCommand {
    /// Storage count listing, year → month → day → file count
    #[arg(long)]
    storage: PathBuf,

    /// Dual-count report to compare against, merged or --per-collection
    #[arg(long = "database-report")]
    database_report: PathBuf,

    /// Include a row for every day
    #[arg(long)]
    daily: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Console)]
    format: OutputFormat,

    /// Output file path (if not specified, outputs to stdout)
    #[arg(long)]
    output: Option<PathBuf>,
}

impl CompareCommand {
    pub fn run(&self) -> AppResult<()> {
        let storage = StorageComparison::load_storage_counts(&self.storage)?;
        let database = DatabaseCounts::load(&self.database_report)?;

        let comparison = StorageComparison::compare(&storage, &database);
        info!(
            "{} days compared, {} collection rows",
            comparison.days.len(),
            comparison.collections.len()
        );

        let output = ReportFormatter::format_comparison(&comparison, self.daily, &self.format)?;
        emit(self.output.as_deref(), &output, "Comparison")
    }
}
