//! Storage vs database comparison tables

use super::utils::{export_json, format_number, section_header};
use super::OutputFormat;
use crate::analysis::comparison::{
    CollectionYear, DayComparison, MonthComparison, StorageComparison, YearComparison,
};
use crate::errors::AppResult;
use crate::utils::time::report_timestamp;
use serde::Serialize;

#[derive(Serialize)]
struct ComparisonExport<'a> {
    months: Vec<MonthComparison>,
    years: Vec<YearComparison>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    collections: Vec<CollectionYear>,
    #[serde(skip_serializing_if = "Option::is_none")]
    days: Option<&'a [DayComparison]>,
}

/// Format a comparison; `daily` adds the day-level rows
pub fn format_comparison(
    comparison: &StorageComparison,
    daily: bool,
    format: &OutputFormat,
) -> AppResult<String> {
    match format {
        OutputFormat::Json => export_json(&ComparisonExport {
            months: comparison.months(),
            years: comparison.years(),
            collections: comparison.collections.clone(),
            days: daily.then_some(comparison.days.as_slice()),
        }),
        OutputFormat::Console => {
            let mut output = section_header("Storage vs Database Counts");
            output.push_str(&format!("Generated: {} UTC\n\n", report_timestamp()));

            format_monthly(&comparison.months(), &mut output);
            format_yearly(&comparison.years(), &mut output);
            if !comparison.collections.is_empty() {
                format_collections(&comparison.collections, &mut output);
            }
            if daily {
                format_daily(&comparison.days, &mut output);
            }

            let total = comparison.total();
            output.push_str(&format!(
                "Total: {} stored, {} by path ({}), {} by StudyDate ({})\n",
                format_number(total.storage),
                format_number(total.by_path),
                total.path_transfer(),
                format_number(total.by_date),
                total.date_transfer()
            ));
            Ok(output)
        }
    }
}

fn format_monthly(months: &[MonthComparison], output: &mut String) {
    output.push_str("Monthly counts:\n");
    output.push_str(&format!(
        "  {:<8} {:>14} {:>14} {:>14}\n",
        "Month", "Storage", "By Path", "By StudyDate"
    ));
    output.push_str(&format!("  {:-<8} {:->14} {:->14} {:->14}\n", "", "", "", ""));
    for month in months {
        output.push_str(&format!(
            "  {:<8} {:>14} {:>14} {:>14}\n",
            format!("{}/{}", month.year, month.month),
            format_number(month.counts.storage),
            format_number(month.counts.by_path),
            format_number(month.counts.by_date)
        ));
    }
    output.push('\n');
}

fn format_yearly(years: &[YearComparison], output: &mut String) {
    output.push_str("Yearly transfer:\n");
    output.push_str(&format!(
        "  {:<6} {:>14} {:>14} {:>10} {:>14} {:>10}\n",
        "Year", "Storage", "By Path", "Path %", "By StudyDate", "Date %"
    ));
    output.push_str(&format!(
        "  {:-<6} {:->14} {:->14} {:->10} {:->14} {:->10}\n",
        "", "", "", "", "", ""
    ));
    for year in years {
        output.push_str(&format!(
            "  {:<6} {:>14} {:>14} {:>10} {:>14} {:>10}\n",
            year.year,
            format_number(year.counts.storage),
            format_number(year.counts.by_path),
            year.path_transfer,
            format_number(year.counts.by_date),
            year.date_transfer
        ));
    }
    output.push('\n');
}

fn format_collections(rows: &[CollectionYear], output: &mut String) {
    output.push_str("Collection counts:\n");
    output.push_str(&format!(
        "  {:<16} {:<6} {:>14} {:>14}\n",
        "Collection", "Year", "By Path", "By StudyDate"
    ));
    output.push_str(&format!("  {:-<16} {:-<6} {:->14} {:->14}\n", "", "", "", ""));
    let mut previous: Option<&str> = None;
    for row in rows {
        // Collection name only on its first year
        let name = if previous == Some(row.collection.as_str()) {
            ""
        } else {
            row.collection.as_str()
        };
        previous = Some(row.collection.as_str());
        output.push_str(&format!(
            "  {:<16} {:<6} {:>14} {:>14}\n",
            name,
            row.year,
            format_number(row.by_path),
            format_number(row.by_date)
        ));
    }
    output.push('\n');
}

fn format_daily(days: &[DayComparison], output: &mut String) {
    output.push_str("Daily counts:\n");
    output.push_str(&format!(
        "  {:<10} {:>14} {:>14} {:>14}\n",
        "Day", "Storage", "By Path", "By StudyDate"
    ));
    output.push_str(&format!("  {:-<10} {:->14} {:->14} {:->14}\n", "", "", "", ""));
    for day in days {
        output.push_str(&format!(
            "  {:<10} {:>14} {:>14} {:>14}\n",
            format!("{}/{}/{}", day.year, day.month, day.day),
            format_number(day.counts.storage),
            format_number(day.counts.by_path),
            format_number(day.counts.by_date)
        ));
    }
    output.push('\n');
}
