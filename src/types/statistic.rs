//! Statistic kinds and the document fields they query

use super::date_key::DateKey;
use crate::errors::{AppError, AppResult};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

lazy_static! {
    /// Dotted field paths made of identifier segments only; these are inlined
    /// into JSON path expressions so nothing else is admitted.
    static ref FIELD_PATH_PATTERN: Regex =
        Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)*$")
            .expect("field path pattern is valid");
}

pub const DICOM_FILE_PATH_FIELD: &str = "header.DicomFilePath";
pub const DIRECTORY_PATH_FIELD: &str = "header.DirectoryPath";
pub const STUDY_DATE_FIELD: &str = "StudyDate";
pub const STUDY_UID_FIELD: &str = "StudyInstanceUID";
pub const DEFAULT_TAG: &str = "AngioFlag";

/// The report being produced; one per run
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum StatisticKind {
    /// Documents per day on one prefix field
    RawCount,
    /// Path-field and date-field counts per day, summed across collections
    DualCount,
    /// Sorted distinct accession identifiers (last path segment) per day
    Accessions,
    /// Number of distinct StudyInstanceUIDs per day
    DistinctStudies,
    /// Total, tagged and tag-value counts per day
    TagProportion,
}

impl StatisticKind {
    pub fn name(&self) -> &'static str {
        match self {
            StatisticKind::RawCount => "raw-count",
            StatisticKind::DualCount => "dual-count",
            StatisticKind::Accessions => "accessions",
            StatisticKind::DistinctStudies => "distinct-studies",
            StatisticKind::TagProportion => "tag-proportion",
        }
    }

    /// Prefix field used when none is configured
    pub fn default_prefix_field(&self) -> PrefixField {
        match self {
            StatisticKind::Accessions => PrefixField::Path(FieldPath::known(DIRECTORY_PATH_FIELD)),
            _ => PrefixField::Path(FieldPath::known(DICOM_FILE_PATH_FIELD)),
        }
    }
}

impl fmt::Display for StatisticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A validated dotted document field path, e.g. `header.DicomFilePath`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FieldPath(String);

impl FieldPath {
    pub fn parse(field: &str) -> AppResult<Self> {
        if FIELD_PATH_PATTERN.is_match(field) {
            Ok(Self(field.to_string()))
        } else {
            Err(AppError::InvalidField {
                field: field.to_string(),
                reason: "expected dotted identifier segments such as header.DicomFilePath"
                    .to_string(),
            })
        }
    }

    /// For the compile-time constants above
    fn known(field: &'static str) -> Self {
        Self(field.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// SQLite JSON path, e.g. `$.header.DicomFilePath`
    pub fn json_path(&self) -> String {
        format!("$.{}", self.0)
    }
}

impl TryFrom<String> for FieldPath {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        FieldPath::parse(&value)
    }
}

impl From<FieldPath> for String {
    fn from(value: FieldPath) -> Self {
        value.0
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A prefix-matched field together with how its date prefix is rendered
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "style", content = "field", rename_all = "kebab-case")]
pub enum PrefixField {
    /// Hierarchical path such as `2016/01/05/E-123/...`, matched on `YYYY/MM/DD`
    Path(FieldPath),
    /// Flat date string such as `20160105`, matched on `YYYYMMDD`
    Date(FieldPath),
}

impl PrefixField {
    pub fn field(&self) -> &FieldPath {
        match self {
            PrefixField::Path(field) | PrefixField::Date(field) => field,
        }
    }

    pub fn prefix_for(&self, key: &DateKey) -> String {
        match self {
            PrefixField::Path(_) => key.path_prefix(),
            PrefixField::Date(_) => key.date_prefix(),
        }
    }
}

impl fmt::Display for PrefixField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrefixField::Path(field) => write!(f, "{} (YYYY/MM/DD)", field),
            PrefixField::Date(field) => write!(f, "{} (YYYYMMDD)", field),
        }
    }
}

/// The document fields a run queries, passed explicitly into leaf computations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSelector {
    /// Field every bucket is prefix-matched on
    pub prefix: PrefixField,
    /// Flat date field for the second dual-count query
    pub date_field: FieldPath,
    /// Field whose distinct values are counted for distinct-studies
    pub study_field: FieldPath,
    /// Tag examined by tag-proportion
    pub tag: FieldPath,
}

impl FieldSelector {
    pub fn defaults_for(kind: StatisticKind) -> Self {
        Self {
            prefix: kind.default_prefix_field(),
            date_field: FieldPath::known(STUDY_DATE_FIELD),
            study_field: FieldPath::known(STUDY_UID_FIELD),
            tag: FieldPath::known(DEFAULT_TAG),
        }
    }

    pub fn with_prefix(mut self, prefix: PrefixField) -> Self {
        self.prefix = prefix;
        self
    }

    pub fn with_tag(mut self, tag: FieldPath) -> Self {
        self.tag = tag;
        self
    }
}
