use super::*;
use crate::rig::pose_rig::PoseRig;

fn rig(json: &str) -> PoseRig {
    PoseRig::from_json_str(json).unwrap()
}

const FULL: &str = r#"{
    "name": "R",
    "clips": [{ "name": "walk", "duration_secs": 1.0 }],
    "sub_objects": [{ "name": "Body", "rest": [[0.0, 0.0, 0.0]] }]
}"#;

#[test]
fn codes_and_severities_follow_the_taxonomy() {
    assert_eq!(Condition::MissingRigObject.code(), 0);
    assert_eq!(Condition::MissingTexture.code(), 6);
    assert_eq!(Condition::NoAnimationClips.code(), 100);
    assert_eq!(Condition::CurveOutOfRange.code(), 104);
    assert_eq!(Condition::NoAnimationClips.severity(), Severity::Error);
    assert_eq!(Condition::PixelOutOfRange.severity(), Severity::Warning);
}

#[test]
fn display_carries_severity_prefix() {
    assert!(
        Condition::MissingMesh
            .to_string()
            .starts_with("ERROR: A mesh is not assigned")
    );
    assert!(
        Condition::PixelOutOfRange
            .to_string()
            .starts_with("Warning: A pixel's value was out of range")
    );
}

#[test]
fn set_twice_does_not_duplicate_and_clear_removes() {
    let mut set = ConditionSet::new();
    assert!(set.set(Condition::PixelOutOfRange, true));
    assert!(set.set(Condition::PixelOutOfRange, true));
    assert_eq!(set.len(), 1);
    assert!(!set.has_errors());

    assert!(!set.set(Condition::PixelOutOfRange, false));
    assert!(set.is_empty());
}

#[test]
fn iteration_keeps_raise_order() {
    let mut set = ConditionSet::new();
    set.set(Condition::CurveOutOfRange, true);
    set.set(Condition::MissingTexture, true);
    set.set(Condition::CurveOutOfRange, true);
    let order: Vec<_> = set.iter().collect();
    assert_eq!(
        order,
        vec![Condition::CurveOutOfRange, Condition::MissingTexture]
    );
    assert!(set.has_errors());
    set.clear();
    assert!(set.is_empty());
}

#[test]
fn merge_unions_sets() {
    let mut a = ConditionSet::new();
    a.set(Condition::PixelOutOfRange, true);
    let mut b = ConditionSet::new();
    b.set(Condition::PixelOutOfRange, true);
    b.set(Condition::UvAlreadyExists, true);
    a.merge(&b);
    assert_eq!(a.len(), 2);
}

#[test]
fn missing_rig_stops_the_chain() {
    let mut set = ConditionSet::new();
    assert!(!check_bake_preconditions(&mut set, None, &[]));
    assert!(set.has(Condition::MissingRigObject));
    assert!(!set.has(Condition::NoAnimationsSelected));
}

#[test]
fn complete_rig_with_selection_passes_and_lowers_stale_conditions() {
    let r = rig(FULL);
    let mut set = ConditionSet::new();
    set.set(Condition::MissingRigObject, true);
    let ok = check_bake_preconditions(&mut set, Some(&r), &["walk".to_string()]);
    assert!(ok);
    assert!(set.is_empty());
}

#[test]
fn chain_reports_first_failure_only() {
    let r = rig(r#"{ "name": "R", "has_animator": false, "clips": [] }"#);
    let mut set = ConditionSet::new();
    assert!(!check_bake_preconditions(&mut set, Some(&r), &[]));
    assert!(set.has(Condition::MissingSkinnedMesh));
    assert!(!set.has(Condition::MissingAnimator));
    assert!(!set.has(Condition::NoAnimationClips));
}

#[test]
fn empty_selection_is_reported() {
    let r = rig(FULL);
    let mut set = ConditionSet::new();
    assert!(!check_bake_preconditions(&mut set, Some(&r), &[]));
    assert_eq!(
        set.iter().collect::<Vec<_>>(),
        vec![Condition::NoAnimationsSelected]
    );
}
