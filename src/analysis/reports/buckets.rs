//! Console summaries of filled skeletons
//!
//! JSON output is the skeleton itself. The console view rolls days up into
//! monthly and yearly tables, since a full day-level listing of a decade is
//! unreadable in a terminal.

use super::utils::{export_json, format_number, section_header};
use super::OutputFormat;
use crate::analysis::{BucketReport, CollectionReports, ReportRequest};
use crate::errors::AppResult;
use crate::types::{AccessionSet, DualCount, LeafValue, Skeleton, StatisticKind, TagProportion};
use crate::utils::math::format_percentage;
use crate::utils::time::report_timestamp;
use indexmap::IndexMap;
use std::collections::BTreeSet;

/// Number of tag values listed in the tag-proportion summary
pub const TOP_TAG_VALUES: usize = 5;

/// Format a filled skeleton
pub fn format_bucket_report(
    report: &BucketReport,
    request: &ReportRequest,
    format: &OutputFormat,
) -> AppResult<String> {
    match format {
        OutputFormat::Json => report.to_json(),
        OutputFormat::Console => {
            let mut output = console_header(&title(request.kind), request);
            format_body(report, &mut output);
            Ok(output)
        }
    }
}

/// Format one filled skeleton per collection
pub fn format_collection_reports(
    reports: &CollectionReports,
    request: &ReportRequest,
    format: &OutputFormat,
) -> AppResult<String> {
    match format {
        OutputFormat::Json => export_json(reports),
        OutputFormat::Console => {
            let title = format!("{} by Collection", title(request.kind));
            let mut output = console_header(&title, request);
            for (collection, report) in reports {
                output.push_str(&format!("Collection: {}\n\n", collection));
                format_body(report, &mut output);
                output.push('\n');
            }
            Ok(output)
        }
    }
}

fn console_header(title: &str, request: &ReportRequest) -> String {
    let mut output = section_header(title);
    output.push_str(&format!("Generated: {} UTC\n", report_timestamp()));
    output.push_str(&format!(
        "Years: {}-{}  Months: {}\n",
        request.min_year, request.max_year, request.months
    ));
    if request.kind == StatisticKind::TagProportion {
        output.push_str(&format!("Tag: {}\n", request.fields.tag));
    }
    output.push('\n');
    output
}

fn format_body(report: &BucketReport, output: &mut String) {
    match report {
        BucketReport::Count(skeleton) => format_counts(skeleton, output),
        BucketReport::Dual(skeleton) => format_dual_counts(skeleton, output),
        BucketReport::Accessions(skeleton) => format_accessions(skeleton, output),
        BucketReport::Proportion(skeleton) => format_tag_proportion(skeleton, output),
    }
}

/// Format the collection listing
pub fn format_collections(names: &[String], format: &OutputFormat) -> AppResult<String> {
    match format {
        OutputFormat::Json => export_json(&names),
        OutputFormat::Console => {
            let mut output = section_header("Collections");
            if names.is_empty() {
                output.push_str("No collections found.\n");
            }
            for name in names {
                output.push_str(&format!("  {}\n", name));
            }
            Ok(output)
        }
    }
}

fn title(kind: StatisticKind) -> String {
    match kind {
        StatisticKind::RawCount => "Daily Document Counts".to_string(),
        StatisticKind::DualCount => "Path vs StudyDate Counts".to_string(),
        StatisticKind::Accessions => "Distinct Accessions".to_string(),
        StatisticKind::DistinctStudies => "Distinct Studies".to_string(),
        StatisticKind::TagProportion => "Tag Availability".to_string(),
    }
}

/// Fold every day of each month into one value
fn monthly<V: LeafValue>(skeleton: &Skeleton<V>) -> Vec<(i32, String, V)> {
    let mut rows = Vec::new();
    for (year, months) in skeleton.years() {
        for (month, days) in months {
            let mut total = V::default();
            for value in days.values() {
                total.absorb(value.clone());
            }
            rows.push((*year, month.clone(), total));
        }
    }
    rows
}

fn format_counts(skeleton: &Skeleton<u64>, output: &mut String) {
    output.push_str(&format!("  {:<8} {:>14}\n", "Month", "Total"));
    output.push_str(&format!("  {:-<8} {:->14}\n", "", ""));

    let mut current_year = None;
    let mut year_total = 0u64;
    let mut grand_total = 0u64;
    for (year, month, total) in monthly(skeleton) {
        if current_year.is_some() && current_year != Some(year) {
            output.push_str(&format!("  {:<8} {:>14}\n\n", "Year", format_number(year_total)));
            year_total = 0;
        }
        current_year = Some(year);
        year_total += total;
        grand_total += total;
        output.push_str(&format!(
            "  {:<8} {:>14}\n",
            format!("{:04}/{}", year, month),
            format_number(total)
        ));
    }
    if current_year.is_some() {
        output.push_str(&format!("  {:<8} {:>14}\n\n", "Year", format_number(year_total)));
    }
    output.push_str(&format!("Total: {}\n", format_number(grand_total)));
}

fn format_dual_counts(skeleton: &Skeleton<DualCount>, output: &mut String) {
    output.push_str(&format!(
        "  {:<8} {:>14} {:>14} {:>14}\n",
        "Month", "By Path", "By StudyDate", "Difference"
    ));
    output.push_str(&format!("  {:-<8} {:->14} {:->14} {:->14}\n", "", "", "", ""));

    let mut overall = DualCount::default();
    for (year, month, total) in monthly(skeleton) {
        overall.absorb(total);
        output.push_str(&format!(
            "  {:<8} {:>14} {:>14} {:>14}\n",
            format!("{:04}/{}", year, month),
            format_number(total.path_count()),
            format_number(total.date_count()),
            total.path_count() as i64 - total.date_count() as i64
        ));
    }
    output.push_str(&format!(
        "\nTotal: {} by path, {} by StudyDate\n",
        format_number(overall.path_count()),
        format_number(overall.date_count())
    ));
}

fn format_accessions(skeleton: &Skeleton<AccessionSet>, output: &mut String) {
    output.push_str(&format!(
        "  {:<8} {:>12} {:>12}\n",
        "Month", "Accessions", "Empty Days"
    ));
    output.push_str(&format!("  {:-<8} {:->12} {:->12}\n", "", "", ""));

    let mut overall: BTreeSet<&str> = BTreeSet::new();
    for (year, months) in skeleton.years() {
        for (month, days) in months {
            let distinct: BTreeSet<&str> = days
                .values()
                .flat_map(|accessions| accessions.iter().map(String::as_str))
                .collect();
            let empty_days = days.values().filter(|a| a.is_empty()).count();
            output.push_str(&format!(
                "  {:<8} {:>12} {:>12}\n",
                format!("{:04}/{}", year, month),
                format_number(distinct.len() as u64),
                empty_days
            ));
            overall.extend(distinct);
        }
    }
    output.push_str(&format!(
        "\nDistinct accessions: {}\n",
        format_number(overall.len() as u64)
    ));
}

fn format_tag_proportion(skeleton: &Skeleton<TagProportion>, output: &mut String) {
    output.push_str("Yearly proportion:\n");
    output.push_str(&format!(
        "  {:<6} {:>14} {:>14} {:>14}\n",
        "Year", "Total", "With Tag", "Availability"
    ));
    output.push_str(&format!("  {:-<6} {:->14} {:->14} {:->14}\n", "", "", "", ""));

    let mut overall = TagProportion::default();
    for (year, months) in skeleton.years() {
        let mut year_total = TagProportion::default();
        for days in months.values() {
            for leaf in days.values() {
                year_total.absorb(leaf.clone());
            }
        }
        output.push_str(&format!(
            "  {:<6} {:>14} {:>14} {:>14}\n",
            year,
            format_number(year_total.total_count),
            format_number(year_total.tag_count),
            format_percentage(year_total.tag_count, year_total.total_count)
        ));
        overall.absorb(year_total);
    }

    output.push_str("\nMost common values among tagged documents:\n");
    let top = top_values(overall.values.as_ref(), TOP_TAG_VALUES);
    if top.is_empty() {
        output.push_str("  No tagged documents in range.\n");
        return;
    }
    output.push_str(&format!("  {:<24} {:>14} {:>10}\n", "Value", "Documents", "Share"));
    output.push_str(&format!("  {:-<24} {:->14} {:->10}\n", "", "", ""));
    for (value, count) in top {
        output.push_str(&format!(
            "  {:<24} {:>14} {:>10}\n",
            value,
            format_number(count),
            format_percentage(count, overall.tag_count)
        ));
    }
}

/// Highest counts first; equal counts keep discovery order
pub fn top_values(values: Option<&IndexMap<String, u64>>, limit: usize) -> Vec<(String, u64)> {
    let mut sorted: Vec<(String, u64)> = values
        .map(|v| v.iter().map(|(k, c)| (k.clone(), *c)).collect())
        .unwrap_or_default();
    sorted.sort_by(|a, b| b.1.cmp(&a.1));
    sorted.truncate(limit);
    sorted
}
