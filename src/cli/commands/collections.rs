use super::emit;
use crate::analysis::{OutputFormat, ReportEngine, ReportFormatter};
use crate::config::AppConfig;
use crate::database::DocumentStore;
use crate::errors::AppResult;
use clap::Args;
use std::path::PathBuf;
use tracing::info;

#[derive(Args)]
pub struct CollectionsCommand {
    /// Database path (overrides config.toml and env vars)
    #[arg(long)]
    database_path: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Console)]
    format: OutputFormat,
}

impl CollectionsCommand {
    pub fn run(&self) -> AppResult<()> {
        let database_path = self
            .database_path
            .clone()
            .unwrap_or_else(|| AppConfig::get_defaults().database.default_path);

        let engine = ReportEngine::new(|| DocumentStore::open_read_only(&database_path));
        let names = engine.list_collections()?;
        info!("{} collections in {}", names.len(), database_path.display());

        emit(None, &ReportFormatter::format_collections(&names, &self.format)?, "Collections")
    }
}
