//! Gap check between a storage listing and an accession report

use crate::common::db_seeding::{image_doc, seed_collection};
use crate::common::store::TestStore;
use dicom_bucket_audit::analysis::{GapFinder, ReportEngine, ReportRequest};
use dicom_bucket_audit::types::{DayRange, MonthRange, StatisticKind};
use std::fs;

#[test]
fn test_report_output_feeds_gap_check() -> anyhow::Result<()> {
    let store = TestStore::new()?;
    seed_collection(
        &store.writer()?,
        "series",
        &[
            image_doc("2019/11/04/E-100", "1.dcm"),
            image_doc("2019/11/05/E-200", "1.dcm"),
        ],
    )?;

    let engine = ReportEngine::new(|| store.open());
    let request = ReportRequest::new(StatisticKind::Accessions, 2019, 2019)
        .with_months(MonthRange::single(11)?)
        .with_days(Some(DayRange::new(4, 6)?));
    let observed_json = engine.run(&request)?.to_json()?;

    let dir = tempfile::tempdir()?;
    let observed_path = dir.path().join("observed.json");
    let expected_path = dir.path().join("expected.json");
    fs::write(&observed_path, observed_json)?;
    // Storage walk: day 06 absent from the store entirely, day 07 outside the report
    fs::write(
        &expected_path,
        r#"{"2019": {"11": {
            "04": ["E-100", "E-101"],
            "05": ["E-200"],
            "06": ["E-300"],
            "07": ["E-400"]
        }}}"#,
    )?;

    let expected = GapFinder::load_listing(&expected_path)?;
    let observed = GapFinder::load_listing(&observed_path)?;
    let gaps = GapFinder::new("/pacs").find_gaps(&expected, &observed);

    let csv_path = dir.path().join("gaps.csv");
    GapFinder::write_csv(&gaps, fs::File::create(&csv_path)?)?;
    assert_eq!(
        fs::read_to_string(&csv_path)?,
        "year,month,day,accession,path\n\
         2019,11,04,E-101,/pacs/2019/11/04/E-101\n\
         2019,11,06,E-300,/pacs/2019/11/06/E-300\n\
         2019,11,07,E-400,/pacs/2019/11/07/E-400\n"
    );
    Ok(())
}

#[test]
fn test_malformed_listing_is_invalid_data() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("broken.json");
    fs::write(&path, r#"{"2019": ["not", "a", "listing"]}"#)?;
    assert!(matches!(
        GapFinder::load_listing(&path),
        Err(dicom_bucket_audit::errors::AppError::InvalidData(_))
    ));
    Ok(())
}
