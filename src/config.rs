use config::{Config, ConfigError, File};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// Application configuration loaded from config.toml or environment variables
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub report: ReportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub default_path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            default_path: PathBuf::from("./dicom.db"),
        }
    }
}

/// Defaults for report runs; every value can be overridden per run on the CLI
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    pub min_year: i32,
    pub max_year: i32,
    pub collection: String,
    /// Default collection for accession listings
    pub accession_collection: String,
    pub tag: String,
    /// Grouped tag values kept per bucket; 0 keeps all of them
    pub value_limit: usize,
    pub workers: usize,
    /// Skipped when a run targets every collection
    pub excluded_collections: Vec<String>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            min_year: 2010,
            max_year: 2018,
            collection: "image_MR".to_string(),
            accession_collection: "series".to_string(),
            tag: "AngioFlag".to_string(),
            value_limit: 3,
            workers: 1,
            excluded_collections: vec!["series".to_string()],
        }
    }
}

impl ReportConfig {
    /// `value_limit` with 0 meaning unlimited
    pub fn value_limit(&self) -> Option<usize> {
        match self.value_limit {
            0 => None,
            n => Some(n),
        }
    }
}

impl AppConfig {
    /// Load configuration from config.toml file and environment variables
    /// Environment variables take precedence over file configuration
    pub fn load() -> Result<Self, ConfigError> {
        let database = DatabaseConfig::default();
        let report = ReportConfig::default();
        let config = Config::builder()
            // Start with default values
            .set_default(
                "database.default_path",
                database.default_path.to_string_lossy().to_string(),
            )?
            .set_default("report.min_year", report.min_year as i64)?
            .set_default("report.max_year", report.max_year as i64)?
            .set_default("report.collection", report.collection)?
            .set_default("report.accession_collection", report.accession_collection)?
            .set_default("report.tag", report.tag)?
            .set_default("report.value_limit", report.value_limit as i64)?
            .set_default("report.workers", report.workers as i64)?
            .set_default("report.excluded_collections", report.excluded_collections)?
            // Load from config.toml if it exists
            .add_source(File::with_name("config").required(false))
            // AUDIT_REPORT__MIN_YEAR=2015 overrides report.min_year
            .add_source(
                config::Environment::with_prefix("AUDIT")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("report.excluded_collections"),
            )
            .build()?;

        let mut app_config: AppConfig = config.try_deserialize()?;

        // Short form for the most common override
        if let Ok(db_path) = env::var("AUDIT_DATABASE_PATH") {
            app_config.database.default_path = PathBuf::from(db_path);
        }

        if app_config.report.min_year > app_config.report.max_year {
            return Err(ConfigError::Message(format!(
                "report.min_year {} is after report.max_year {}",
                app_config.report.min_year, app_config.report.max_year
            )));
        }

        Ok(app_config)
    }

    /// Get default config values for CLI argument defaults
    pub fn get_defaults() -> Self {
        // Fall back to built-in defaults if config.toml is unreadable
        Self::load().unwrap_or_default()
    }

    /// Effective configuration as TOML
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Message(e.to_string()))
    }
}
