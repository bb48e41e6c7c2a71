use super::emit;
use crate::analysis::{
    CollectionSelection, OutputFormat, ReportEngine, ReportFormatter, ReportRequest,
};
use crate::config::AppConfig;
use crate::database::DocumentStore;
use crate::errors::AppResult;
use crate::types::{DayRange, FieldPath, FieldSelector, MonthRange, PrefixField, StatisticKind};
use clap::Args;
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Args)]
pub struct ReportCommand {
    /// Statistic stored at each day bucket
    #[arg(long, value_enum, default_value_t = StatisticKind::RawCount)]
    kind: StatisticKind,

    /// Database path (overrides config.toml and env vars)
    #[arg(long)]
    database_path: Option<PathBuf>,

    /// First year, inclusive (overrides config.toml)
    #[arg(long)]
    min_year: Option<i32>,

    /// Last year, inclusive (overrides config.toml)
    #[arg(long)]
    max_year: Option<i32>,

    /// Month restriction, e.g. "3" or "1-6"
    #[arg(long, default_value = "1-12")]
    months: MonthRange,

    /// Day-of-month restriction, e.g. "1-15"; clipped to each month's length
    #[arg(long)]
    days: Option<DayRange>,

    /// Collection to read; repeat to sum several into one report. Defaults to
    /// report.collection, or report.accession_collection (series) for accessions
    #[arg(long = "collection")]
    collections: Vec<String>,

    /// Read every collection except the excluded ones
    #[arg(long, conflicts_with = "collections")]
    all_collections: bool,

    /// Collection skipped by --all-collections (overrides config.toml); repeatable
    #[arg(long = "exclude")]
    excluded: Vec<String>,

    /// Keep one skeleton per collection instead of summing them
    #[arg(long)]
    per_collection: bool,

    /// Field matched against each bucket prefix
    #[arg(long)]
    prefix_field: Option<String>,

    /// Treat --prefix-field as a flat YYYYMMDD date field instead of a YYYY/MM/DD path
    #[arg(long, requires = "prefix_field")]
    date_prefix: bool,

    /// Tag field for tag-proportion (overrides config.toml)
    #[arg(long)]
    tag: Option<String>,

    /// Tag values kept per bucket in discovery order, 0 for all (overrides config.toml)
    #[arg(long)]
    value_limit: Option<usize>,

    /// Worker threads, each with its own store connection (overrides config.toml)
    #[arg(long)]
    workers: Option<usize>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Output file path (if not specified, outputs to stdout)
    #[arg(long)]
    output: Option<PathBuf>,
}

impl ReportCommand {
    pub fn run(&self) -> AppResult<()> {
        let app_config = AppConfig::load().unwrap_or_else(|e| {
            warn!("Failed to load configuration, using defaults: {}", e);
            AppConfig::default()
        });

        let request = self.build_request(&app_config)?;
        let database_path = self
            .database_path
            .clone()
            .unwrap_or(app_config.database.default_path.clone());
        info!("=== {} report from {} ===", request.kind, database_path.display());

        let engine = ReportEngine::new(|| DocumentStore::open_read_only(&database_path));
        let output = if self.per_collection {
            let (reports, stats) = engine.run_per_collection(&request)?;
            info!("{}", stats.summary());
            ReportFormatter::format_collection_reports(&reports, &request, &self.format)?
        } else {
            let (report, stats) = engine.run_with_stats(&request)?;
            info!("{}", stats.summary());
            ReportFormatter::format_bucket_report(&report, &request, &self.format)?
        };
        emit(self.output.as_deref(), &output, "Report")
    }

    /// CLI arguments override config values
    fn build_request(&self, app_config: &AppConfig) -> AppResult<ReportRequest> {
        let defaults = &app_config.report;

        let collections = if self.all_collections {
            let excluded = if self.excluded.is_empty() {
                defaults.excluded_collections.clone()
            } else {
                self.excluded.clone()
            };
            CollectionSelection::All { excluded }
        } else if self.collections.is_empty() {
            let default = match self.kind {
                StatisticKind::Accessions => &defaults.accession_collection,
                _ => &defaults.collection,
            };
            CollectionSelection::Named(vec![default.clone()])
        } else {
            CollectionSelection::Named(self.collections.clone())
        };

        let tag = FieldPath::parse(self.tag.as_deref().unwrap_or(&defaults.tag))?;
        let mut fields = FieldSelector::defaults_for(self.kind).with_tag(tag);
        if let Some(name) = &self.prefix_field {
            let field = FieldPath::parse(name)?;
            fields = fields.with_prefix(if self.date_prefix {
                PrefixField::Date(field)
            } else {
                PrefixField::Path(field)
            });
        }

        let value_limit = match self.value_limit {
            Some(0) => None,
            Some(n) => Some(n),
            None => defaults.value_limit(),
        };

        let request = ReportRequest::new(
            self.kind,
            self.min_year.unwrap_or(defaults.min_year),
            self.max_year.unwrap_or(defaults.max_year),
        )
        .with_months(self.months)
        .with_days(self.days)
        .with_collections(collections)
        .with_fields(fields)
        .with_value_limit(value_limit)
        .with_workers(self.workers.unwrap_or(defaults.workers));

        request.validate()?;
        Ok(request)
    }
}
