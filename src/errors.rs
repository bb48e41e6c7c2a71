use thiserror::Error;

/// Application-wide error type - single point of truth
#[derive(Error, Debug)]
pub enum AppError {
    /// Database operations
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// File I/O operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV output
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Configuration issues
    #[error("Configuration error: {0}")]
    Config(String),

    /// Bad year/month/day bounds, raised before any query is issued
    #[error("Invalid range: {0}")]
    InvalidRange(String),

    /// Field path or collection name that cannot be used in a query
    #[error("Invalid field '{field}': {reason}")]
    InvalidField { field: String, reason: String },

    /// Collection missing or connection lost while filling a bucket
    #[error("Data source unavailable for collection '{collection}' at bucket {bucket}: {reason}")]
    DataSourceUnavailable {
        collection: String,
        bucket: String,
        reason: String,
    },

    /// Data validation/parsing
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl AppError {
    /// Bucket label used when a failure happens before any bucket is queried
    pub const NO_BUCKET: &'static str = "-";

    pub fn unavailable(collection: &str, bucket: &str, reason: impl ToString) -> Self {
        AppError::DataSourceUnavailable {
            collection: collection.to_string(),
            bucket: bucket.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Attach bucket coordinates to a query failure.
    ///
    /// Range and field errors are configuration problems and pass through untouched.
    pub fn at_bucket(self, collection: &str, bucket: &str) -> Self {
        match self {
            AppError::InvalidRange(_) | AppError::InvalidField { .. } => self,
            AppError::DataSourceUnavailable { reason, .. } => {
                AppError::unavailable(collection, bucket, reason)
            }
            other => AppError::unavailable(collection, bucket, other),
        }
    }
}

/// Application-wide result type - single point of truth
pub type AppResult<T> = Result<T, AppError>;

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InvalidData(format!("JSON error: {}", err))
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}
