//! Tag-proportion reports: counts, value cap and empty buckets

use crate::common::db_seeding::{image_doc, seed_collection, tagged_doc};
use crate::common::store::TestStore;
use dicom_bucket_audit::analysis::{BucketReport, ReportEngine, ReportRequest};
use dicom_bucket_audit::types::{
    DateKey, DayRange, FieldPath, FieldSelector, MonthRange, Skeleton, StatisticKind,
    TagProportion,
};
use serde_json::json;

fn seeded_store() -> anyhow::Result<TestStore> {
    let store = TestStore::new()?;
    seed_collection(
        &store.writer()?,
        "image_MR",
        &[
            tagged_doc("2017/06/01/E-1", "1.dcm", "AngioFlag", json!("N")),
            tagged_doc("2017/06/01/E-1", "2.dcm", "AngioFlag", json!("Y")),
            tagged_doc("2017/06/01/E-2", "1.dcm", "AngioFlag", json!("N")),
            tagged_doc("2017/06/01/E-3", "1.dcm", "AngioFlag", json!("A")),
            tagged_doc("2017/06/01/E-4", "1.dcm", "AngioFlag", json!("B")),
            tagged_doc("2017/06/02/E-5", "1.dcm", "AngioFlag", json!(null)),
            image_doc("2017/06/02/E-6", "1.dcm"),
            image_doc("2017/06/03/E-7", "1.dcm"),
        ],
    )?;
    Ok(store)
}

fn run(store: &TestStore, request: ReportRequest) -> anyhow::Result<Skeleton<TagProportion>> {
    let engine = ReportEngine::new(|| store.open());
    match engine.run(&request)? {
        BucketReport::Proportion(skeleton) => Ok(skeleton),
        other => anyhow::bail!("unexpected report {:?}", other),
    }
}

fn june_request() -> anyhow::Result<ReportRequest> {
    Ok(ReportRequest::new(StatisticKind::TagProportion, 2017, 2017)
        .with_months(MonthRange::single(6)?)
        .with_days(Some(DayRange::new(1, 4)?)))
}

#[test]
fn test_values_capped_in_discovery_order() -> anyhow::Result<()> {
    let store = seeded_store()?;
    let skeleton = run(&store, june_request()?)?;

    let leaf = skeleton.get(&DateKey::new(2017, 6, 1)?).unwrap();
    assert_eq!(leaf.total_count, 5);
    assert_eq!(leaf.tag_count, 5);
    // "B" is the fourth distinct value and falls off; "N" keeps its full count
    assert_eq!(
        serde_json::to_value(leaf)?,
        json!({"total_count": 5, "tag_count": 5, "values": {"N": 2, "Y": 1, "A": 1}})
    );
    Ok(())
}

#[test]
fn test_unlimited_values() -> anyhow::Result<()> {
    let store = seeded_store()?;
    let skeleton = run(&store, june_request()?.with_value_limit(None))?;
    let leaf = skeleton.get(&DateKey::new(2017, 6, 1)?).unwrap();
    assert_eq!(leaf.values.as_ref().map(|v| v.len()), Some(4));
    Ok(())
}

#[test]
fn test_null_tag_counts_as_present() -> anyhow::Result<()> {
    let store = seeded_store()?;
    let skeleton = run(&store, june_request()?)?;
    let leaf = skeleton.get(&DateKey::new(2017, 6, 2)?).unwrap();
    assert_eq!(
        serde_json::to_value(leaf)?,
        json!({"total_count": 2, "tag_count": 1, "values": {"null": 1}})
    );
    Ok(())
}

#[test]
fn test_untagged_and_empty_buckets_have_no_values() -> anyhow::Result<()> {
    let store = seeded_store()?;
    let skeleton = run(&store, june_request()?)?;

    let untagged = skeleton.get(&DateKey::new(2017, 6, 3)?).unwrap();
    assert_eq!(untagged.total_count, 1);
    assert_eq!(untagged.tag_count, 0);
    assert!(untagged.values.is_none());

    let empty = skeleton.get(&DateKey::new(2017, 6, 4)?).unwrap();
    assert_eq!(empty, &TagProportion::default());
    Ok(())
}

#[test]
fn test_other_tag_field() -> anyhow::Result<()> {
    let store = seeded_store()?;
    let fields = FieldSelector::defaults_for(StatisticKind::TagProportion)
        .with_tag(FieldPath::parse("ContrastBolusAgent")?);
    let skeleton = run(&store, june_request()?.with_fields(fields))?;

    let leaf = skeleton.get(&DateKey::new(2017, 6, 1)?).unwrap();
    assert_eq!(leaf.total_count, 5);
    assert_eq!(leaf.tag_count, 0);
    assert!(leaf.values.is_none());
    Ok(())
}
