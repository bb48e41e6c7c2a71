//! Document seeding helpers
//!
//! Every collection is a `(doc TEXT)` table; documents are inserted in the
//! order given, which is also their discovery order for grouped tag values.

use rusqlite::Connection;
use serde_json::{json, Value};

/// Create `collection` if needed and insert `docs` in order
pub fn seed_collection(conn: &Connection, collection: &str, docs: &[Value]) -> anyhow::Result<()> {
    conn.execute_batch(&format!(
        "CREATE TABLE IF NOT EXISTS \"{}\" (doc TEXT NOT NULL);",
        collection
    ))?;
    let mut stmt = conn.prepare(&format!("INSERT INTO \"{}\" (doc) VALUES (?1)", collection))?;
    for doc in docs {
        stmt.execute([doc.to_string()])?;
    }
    Ok(())
}

/// Image document filed under `directory` (`YYYY/MM/DD/<accession>`)
pub fn image_doc(directory: &str, file: &str) -> Value {
    json!({
        "header": {
            "DirectoryPath": directory,
            "DicomFilePath": format!("{}/{}", directory, file),
        }
    })
}

/// Image document with a StudyDate and StudyInstanceUID
pub fn study_doc(directory: &str, file: &str, study_date: &str, study_uid: &str) -> Value {
    let mut doc = image_doc(directory, file);
    doc["StudyDate"] = json!(study_date);
    doc["StudyInstanceUID"] = json!(study_uid);
    doc
}

/// Image document carrying `tag` with `value`
pub fn tagged_doc(directory: &str, file: &str, tag: &str, value: Value) -> Value {
    let mut doc = image_doc(directory, file);
    doc[tag] = value;
    doc
}
