//! Accession gap check between an expected and an observed listing
//!
//! Both listings have the accession report layout, `year → month → day →
//! [accession]`, typically one produced by walking the storage tree and one by
//! an `accessions` report over the document store. Every expected accession
//! missing from the observed listing on the same day becomes one gap row.

use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::io::Write;
use std::path::Path;
use tracing::{debug, info, warn};

/// `year → month → day → accessions`, keys as rendered in reports
pub type AccessionListing = BTreeMap<String, BTreeMap<String, BTreeMap<String, Vec<String>>>>;

/// One accession present in the expected listing but not the observed one
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GapRecord {
    pub year: String,
    pub month: String,
    pub day: String,
    pub accession: String,
    pub path: String,
}

/// Compares accession listings and writes the differences as CSV
#[derive(Debug, Clone, Default)]
pub struct GapFinder {
    /// Storage root prepended to each gap path; empty for relative paths
    root: String,
}

impl GapFinder {
    pub fn new(root: impl Into<String>) -> Self {
        let root: String = root.into();
        Self {
            root: root.trim_end_matches('/').to_string(),
        }
    }

    /// Load a listing from a JSON file
    pub fn load_listing(path: &Path) -> AppResult<AccessionListing> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            AppError::InvalidData(format!(
                "{} is not an accession listing: {}",
                path.display(),
                e
            ))
        })
    }

    /// Expected accessions absent from `observed`, ordered by date then accession
    ///
    /// A day missing from `observed` counts as a day with no accessions.
    pub fn find_gaps(
        &self,
        expected: &AccessionListing,
        observed: &AccessionListing,
    ) -> Vec<GapRecord> {
        let mut gaps = Vec::new();

        for (year, months) in expected {
            for (month, days) in months {
                for (day, accessions) in days {
                    let seen: BTreeSet<&str> = observed
                        .get(year)
                        .and_then(|m| m.get(month))
                        .and_then(|d| d.get(day))
                        .map(|list| list.iter().map(String::as_str).collect())
                        .unwrap_or_default();

                    let missing: BTreeSet<&str> = accessions
                        .iter()
                        .map(String::as_str)
                        .filter(|accession| !seen.contains(accession))
                        .collect();

                    if !missing.is_empty() {
                        debug!("{}/{}/{}: {} missing", year, month, day, missing.len());
                    }

                    gaps.extend(missing.into_iter().map(|accession| GapRecord {
                        year: year.clone(),
                        month: month.clone(),
                        day: day.clone(),
                        accession: accession.to_string(),
                        path: self.gap_path(year, month, day, accession),
                    }));
                }
            }
        }

        info!("Found {} missing accessions", gaps.len());
        gaps
    }

    fn gap_path(&self, year: &str, month: &str, day: &str, accession: &str) -> String {
        if self.root.is_empty() {
            format!("{}/{}/{}/{}", year, month, day, accession)
        } else {
            format!("{}/{}/{}/{}/{}", self.root, year, month, day, accession)
        }
    }

    /// Write gap rows with a `year,month,day,accession,path` header
    pub fn write_csv<W: Write>(gaps: &[GapRecord], writer: W) -> AppResult<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        if gaps.is_empty() {
            warn!("No gaps to write; emitting header only");
            csv_writer.write_record(["year", "month", "day", "accession", "path"])?;
        }
        for gap in gaps {
            csv_writer.serialize(gap)?;
        }
        csv_writer.flush()?;
        Ok(())
    }
}
