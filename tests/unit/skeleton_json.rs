//! Report layout of each leaf type inside a skeleton

use dicom_bucket_audit::types::{
    AccessionSet, DateKey, DayRange, DualCount, MonthRange, Skeleton, TagProportion,
};
use indexmap::IndexMap;
use serde_json::json;

fn first_days<V: Default>() -> Skeleton<V> {
    Skeleton::build_with_days(
        2016,
        2016,
        MonthRange::single(2).unwrap(),
        Some(DayRange::new(1, 2).unwrap()),
    )
    .unwrap()
}

fn feb(day: u32) -> DateKey {
    DateKey::new(2016, 2, day).unwrap()
}

#[test]
fn test_zero_values_per_leaf_type() {
    assert_eq!(
        serde_json::to_value(first_days::<u64>()).unwrap(),
        json!({"2016": {"02": {"01": 0, "02": 0}}})
    );
    assert_eq!(
        serde_json::to_value(first_days::<DualCount>()).unwrap(),
        json!({"2016": {"02": {"01": [0, 0], "02": [0, 0]}}})
    );
    assert_eq!(
        serde_json::to_value(first_days::<AccessionSet>()).unwrap(),
        json!({"2016": {"02": {"01": [], "02": []}}})
    );
    assert_eq!(
        serde_json::to_value(first_days::<TagProportion>()).unwrap(),
        json!({"2016": {"02": {
            "01": {"total_count": 0, "tag_count": 0},
            "02": {"total_count": 0, "tag_count": 0}
        }}})
    );
}

#[test]
fn test_filled_tag_values_keep_discovery_order() {
    let mut skeleton = first_days::<TagProportion>();
    let values: IndexMap<String, u64> = [("Y".to_string(), 1), ("N".to_string(), 4)]
        .into_iter()
        .collect();
    skeleton
        .absorb(
            &feb(2),
            TagProportion {
                total_count: 6,
                tag_count: 5,
                values: Some(values),
            },
        )
        .unwrap();

    let text = serde_json::to_string(&skeleton).unwrap();
    assert!(text.contains(r#""values":{"Y":1,"N":4}"#));
}

#[test]
fn test_absorb_outside_skeleton_fails() {
    let mut skeleton = first_days::<u64>();
    let outside = DateKey::new(2016, 2, 3).unwrap();
    assert!(skeleton.absorb(&outside, 1).is_err());
    assert!(skeleton.absorb(&feb(1), 1).is_ok());
}
