//! Accession report end to end: seeded store → engine → JSON

use crate::common::db_seeding::{image_doc, seed_collection};
use crate::common::store::TestStore;
use dicom_bucket_audit::analysis::{BucketReport, ReportEngine, ReportRequest};
use dicom_bucket_audit::types::{DateKey, MonthRange, StatisticKind};

fn january_2020(store: &TestStore) -> BucketReport {
    let engine = ReportEngine::new(|| store.open());
    let request = ReportRequest::new(StatisticKind::Accessions, 2020, 2020)
        .with_months(MonthRange::single(1).unwrap());
    engine.run(&request).unwrap()
}

#[test]
fn test_duplicate_accessions_collapse_per_day() -> anyhow::Result<()> {
    let store = TestStore::new()?;
    seed_collection(
        &store.writer()?,
        "series",
        &[
            image_doc("2020/01/05/A1", "1.dcm"),
            image_doc("2020/01/05/A2", "1.dcm"),
            image_doc("2020/01/05/A1", "2.dcm"),
        ],
    )?;

    let BucketReport::Accessions(skeleton) = january_2020(&store) else {
        panic!("expected accession report");
    };

    assert_eq!(skeleton.leaf_count(), 31);
    for (key, accessions) in skeleton.iter() {
        if key == DateKey::new(2020, 1, 5)? {
            assert_eq!(
                accessions.iter().collect::<Vec<_>>(),
                vec!["A1", "A2"]
            );
        } else {
            assert!(accessions.is_empty(), "{} should be empty", key);
        }
    }
    Ok(())
}

#[test]
fn test_report_json_layout() -> anyhow::Result<()> {
    let store = TestStore::new()?;
    seed_collection(
        &store.writer()?,
        "series",
        &[
            image_doc("2020/01/31/B7", "1.dcm"),
            // Other months and unanchored paths never match
            image_doc("2020/02/01/B8", "1.dcm"),
            image_doc("archive/2020/01/31/B9", "1.dcm"),
        ],
    )?;

    let json: serde_json::Value = serde_json::from_str(&january_2020(&store).to_json()?)?;
    let january = &json["2020"]["01"];
    assert_eq!(january.as_object().map(|days| days.len()), Some(31));
    assert_eq!(january["31"], serde_json::json!(["B7"]));
    assert_eq!(january["01"], serde_json::json!([]));
    assert!(json["2020"].get("02").is_none());
    Ok(())
}
