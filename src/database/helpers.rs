//! Shared row-mapping helpers for document queries

use rusqlite::types::Value;
use rusqlite::Row;

/// Render a value extracted from a JSON document as a report key
///
/// `json_type` is needed alongside the extracted value because SQLite hands
/// JSON booleans back as integers 1/0.
///
/// # Examples
/// ```
/// use dicom_bucket_audit::database::helpers::render_json_value;
/// use rusqlite::types::Value;
///
/// assert_eq!(render_json_value(Some("text"), Value::Text("YES".into())), "YES");
/// assert_eq!(render_json_value(Some("integer"), Value::Integer(42)), "42");
/// assert_eq!(render_json_value(Some("true"), Value::Integer(1)), "true");
/// assert_eq!(render_json_value(Some("null"), Value::Null), "null");
/// ```
pub fn render_json_value(json_type: Option<&str>, value: Value) -> String {
    match (json_type, value) {
        (Some("true"), _) => "true".to_string(),
        (Some("false"), _) => "false".to_string(),
        (_, Value::Null) => "null".to_string(),
        (_, Value::Text(text)) => text,
        (_, Value::Integer(n)) => n.to_string(),
        (_, Value::Real(f)) => f.to_string(),
        (_, Value::Blob(bytes)) => String::from_utf8_lossy(&bytes).into_owned(),
    }
}

/// Map a `(value, json_type)` row to a rendered string
pub fn rendered_value_from_row(row: &Row) -> rusqlite::Result<String> {
    let value: Value = row.get(0)?;
    let json_type: Option<String> = row.get(1)?;
    Ok(render_json_value(json_type.as_deref(), value))
}

/// Substring after the last `/`; the whole string when there is none
///
/// # Examples
/// ```
/// use dicom_bucket_audit::database::helpers::last_path_segment;
/// assert_eq!(last_path_segment("2016/01/01/E-05452050"), "E-05452050");
/// assert_eq!(last_path_segment("E-1"), "E-1");
/// assert_eq!(last_path_segment("2016/01/01/"), "");
/// ```
pub fn last_path_segment(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}
