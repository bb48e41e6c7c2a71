//! Worker-pool fills produce the same report as sequential fills

use crate::common::db_seeding::{seed_collection, study_doc};
use crate::common::store::TestStore;
use dicom_bucket_audit::analysis::{CollectionSelection, ReportEngine, ReportRequest};
use dicom_bucket_audit::types::{MonthRange, StatisticKind};
use serde_json::{json, Value};

fn seeded_store() -> anyhow::Result<TestStore> {
    let store = TestStore::new()?;
    let conn = store.writer()?;

    let mut mr = Vec::new();
    let mut ct = Vec::new();
    for day in 1..=28u32 {
        for n in 0..(day % 4) {
            let directory = format!("2016/02/{:02}/E-{}{}", day, day, n);
            let date = format!("201602{:02}", (day % 28) + 1);
            let uid = format!("1.{}.{}", day, n % 2);
            let mut doc = study_doc(&directory, "1.dcm", &date, &uid);
            if n % 2 == 0 {
                doc["AngioFlag"] = json!(if day % 3 == 0 { "Y" } else { "N" });
            }
            mr.push(doc);
        }
        if day % 5 == 0 {
            let directory = format!("2016/02/{:02}/C-{}", day, day);
            ct.push(study_doc(&directory, "1.dcm", "20160229", "2.1"));
        }
    }
    seed_collection(&conn, "image_MR", &mr)?;
    seed_collection(&conn, "image_CT", &ct)?;
    Ok(store)
}

fn report_json(store: &TestStore, kind: StatisticKind, workers: usize) -> anyhow::Result<Value> {
    let engine = ReportEngine::new(|| store.open());
    let request = ReportRequest::new(kind, 2016, 2016)
        .with_months(MonthRange::new(2, 3)?)
        .with_collections(CollectionSelection::Named(vec![
            "image_MR".to_string(),
            "image_CT".to_string(),
        ]))
        .with_workers(workers);
    Ok(serde_json::from_str(&engine.run(&request)?.to_json()?)?)
}

#[test]
fn test_parallel_matches_sequential_for_every_kind() -> anyhow::Result<()> {
    let store = seeded_store()?;
    for kind in [
        StatisticKind::RawCount,
        StatisticKind::DualCount,
        StatisticKind::Accessions,
        StatisticKind::DistinctStudies,
        StatisticKind::TagProportion,
    ] {
        let sequential = report_json(&store, kind, 1)?;
        for workers in [2, 4, 7] {
            assert_eq!(
                report_json(&store, kind, workers)?,
                sequential,
                "{} with {} workers",
                kind,
                workers
            );
        }
    }
    Ok(())
}

#[test]
fn test_parallel_missing_collection_fails() -> anyhow::Result<()> {
    let store = seeded_store()?;
    let engine = ReportEngine::new(|| store.open());
    let request = ReportRequest::new(StatisticKind::RawCount, 2016, 2016)
        .with_collections(CollectionSelection::Named(vec!["image_US".to_string()]))
        .with_workers(3);
    assert!(engine.run(&request).is_err());
    Ok(())
}
