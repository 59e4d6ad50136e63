use super::*;
use crate::{foundation::core::Fps, rig::pose_rig::PoseRig};

fn rig() -> PoseRig {
    PoseRig::from_json_str(
        r#"{
            "name": "Knight",
            "clips": [
                { "name": "walk", "duration_secs": 1.0 },
                { "name": "run", "duration_secs": 0.5 },
                { "name": "blink", "duration_secs": 0.01 }
            ],
            "sub_objects": [
                { "name": "Body", "rest": [[0,0,0],[0,0,0],[0,0,0],[0,0,0]] },
                { "name": "Sword", "rest": [[0,0,0],[0,0,0]] }
            ]
        }"#,
    )
    .unwrap()
}

fn spec(mode: BakeMode) -> BakeSpec {
    BakeSpec {
        fps: Fps::new(30).unwrap(),
        bake_mode: mode,
        ..BakeSpec::default()
    }
}

#[test]
fn all_individual_plans_every_clip_per_sub_object() {
    let plan = BakePlan::new(&rig(), &spec(BakeMode::AllIndividual)).unwrap();
    assert_eq!(plan.sub_objects.len(), 2);
    let body = &plan.sub_objects[0];
    assert_eq!(body.name, "Body");
    assert_eq!(body.clips.len(), 2);
    assert_eq!(body.clips[0].dims, Dimensions::new(4, 30, 1).unwrap());
    assert_eq!(body.clips[1].dims, Dimensions::new(4, 15, 1).unwrap());
    assert_eq!(plan.skipped_clips, vec!["blink".to_string()]);
    assert_eq!(plan.animation_count(), 2);
    assert!(body.array_dims.is_none());

    let b = plan.bounds().unwrap();
    assert_eq!(b.min, Dimensions::new(2, 15, 1).unwrap());
    assert_eq!(b.max, Dimensions::new(4, 30, 1).unwrap());
}

#[test]
fn totals_follow_selected_clip_time() {
    let plan = BakePlan::new(&rig(), &spec(BakeMode::AllIndividual)).unwrap();
    assert!((plan.total_clip_secs - 1.51).abs() < 1e-5);
    assert_eq!(plan.total_frames, 45);
    assert!((plan.estimated_bake_secs - 1.51 * 30.0 / 60.0).abs() < 1e-4);
}

#[test]
fn array_mode_uses_max_dims_and_assigns_layers() {
    let plan = BakePlan::new(&rig(), &spec(BakeMode::ArrayAll)).unwrap();
    let body = &plan.sub_objects[0];
    assert_eq!(body.clips[1].layer, 1);
    assert_eq!(body.array_dims, Some(Dimensions::new(4, 30, 2).unwrap()));
}

#[test]
fn single_mode_uses_first_clip_and_frame_window() {
    let mut s = spec(BakeMode::Single);
    s.clips = vec!["walk".to_string(), "run".to_string()];
    s.min_frame = 10;
    s.max_frame = Some(20);
    let plan = BakePlan::new(&rig(), &s).unwrap();
    let c = &plan.sub_objects[0].clips;
    assert_eq!(c.len(), 1);
    assert_eq!(c[0].run_frames, 20);
    assert_eq!(c[0].first_encoded, 10);
    assert_eq!(c[0].encoded_frames(), 10);
    assert_eq!(c[0].dims, Dimensions::new(4, 10, 1).unwrap());
}

#[test]
fn single_mode_rejects_window_past_clip_end() {
    let mut s = spec(BakeMode::Single);
    s.clips = vec!["run".to_string()];
    s.max_frame = Some(16);
    assert!(matches!(
        BakePlan::new(&rig(), &s),
        Err(VatError::Validation(_))
    ));
    s.max_frame = None;
    s.min_frame = 15;
    assert!(BakePlan::new(&rig(), &s).is_err());
}

#[test]
fn unknown_clip_selection_is_rejected() {
    let mut s = spec(BakeMode::AllIndividual);
    s.clips = vec!["fly".to_string()];
    let err = BakePlan::new(&rig(), &s).unwrap_err();
    assert!(err.to_string().contains("fly"));
}

#[test]
fn report_lists_sizes() {
    let mut s = spec(BakeMode::AllIndividual);
    s.clips = vec!["walk".to_string()];
    let text = BakePlan::new(&rig(), &s).unwrap().to_string();
    assert!(text.contains("Frames to bake: 30"));
    assert!(text.contains("Result texture size: 2x30 (min), 4x30 (max)"));
    assert!(text.contains("walk: 30 frames -> 4x30"));
}
