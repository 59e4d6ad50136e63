use super::*;
use crate::foundation::core::Vec3;

fn mesh(vertices: usize) -> Mesh {
    let mut m = Mesh::new(
        "strip",
        (0..vertices).map(|i| Vec3::new(i as f32, 1.0, -2.0)).collect(),
    );
    m.normals = vec![Vec3::Y; vertices];
    m
}

#[test]
fn fresh_layout_uses_vertex_index_for_u() {
    let uvs = assign_uvs(4, &[], false).unwrap();
    assert_eq!(
        uvs,
        vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(2.0, 0.0),
            Vec2::new(3.0, 0.0),
        ]
    );
}

#[test]
fn replace_keeps_v_and_combine_adds_to_u() {
    let existing = vec![Vec2::new(0.5, 0.1), Vec2::new(0.25, 0.2), Vec2::new(0.0, 0.3)];

    let replaced = assign_uvs(3, &existing, false).unwrap();
    assert_eq!(replaced[1], Vec2::new(1.0, 0.2));

    let combined = assign_uvs(3, &existing, true).unwrap();
    assert_eq!(combined[0], Vec2::new(0.5, 0.1));
    assert_eq!(combined[1], Vec2::new(1.25, 0.2));
    assert_eq!(combined[2], Vec2::new(2.0, 0.3));
}

#[test]
fn mismatched_existing_uvs_are_rejected() {
    assert!(assign_uvs(3, &[Vec2::ZERO; 2], false).is_err());
}

#[test]
fn uv_mesh_scales_positions_and_preserves_other_data() {
    let mut src = mesh(3);
    let other = UvChannel::new(0).unwrap();
    src.set_uv(other, vec![Vec2::new(0.9, 0.9); 3]);
    src.indices = vec![0, 1, 2];

    let mut conditions = ConditionSet::new();
    let ch = UvChannel::new(2).unwrap();
    let out = build_uv_mesh(&src, ch, false, 2.0, &mut conditions).unwrap();

    assert_eq!(out.name, "strip UV");
    assert_eq!(out.positions[2], Vec3::new(4.0, 2.0, -4.0));
    assert_eq!(out.normals, src.normals);
    assert_eq!(out.indices, src.indices);
    assert_eq!(out.uv(other), src.uv(other));
    assert_eq!(out.uv(ch)[2], Vec2::new(2.0, 0.0));
    assert!(!conditions.has(Condition::UvAlreadyExists));
    // Source is untouched.
    assert!(src.uv(ch).is_empty());
    assert_eq!(src.positions[2], Vec3::new(2.0, 1.0, -2.0));
}

#[test]
fn occupied_channel_raises_warning() {
    let mut src = mesh(2);
    let ch = UvChannel::default();
    src.set_uv(ch, vec![Vec2::new(0.5, 0.5); 2]);

    let mut conditions = ConditionSet::new();
    let out = build_uv_mesh(&src, ch, true, 1.0, &mut conditions).unwrap();
    assert!(conditions.has(Condition::UvAlreadyExists));
    assert!(!conditions.has_errors());
    assert_eq!(out.uv(ch)[1], Vec2::new(1.5, 0.5));
}

#[test]
fn non_finite_scale_is_rejected() {
    let mut conditions = ConditionSet::new();
    assert!(build_uv_mesh(&mesh(2), UvChannel::default(), false, f32::NAN, &mut conditions).is_err());
}
