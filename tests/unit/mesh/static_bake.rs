use super::*;
use crate::{
    bake::encoder::decode_position,
    foundation::core::Vec3,
    texture::naming::BakeTarget,
};

fn five_vertex_mesh() -> Mesh {
    Mesh::new(
        "Rock",
        vec![
            Vec3::ZERO,
            Vec3::new(0.1, 0.0, 0.0),
            Vec3::new(0.0, 0.2, 0.0),
            Vec3::new(0.0, 0.0, 0.3),
            Vec3::new(-0.25, 0.25, -0.25),
        ],
    )
}

#[test]
fn static_dimensions_are_power_of_two() {
    assert_eq!(static_mesh_dimensions(4).unwrap(), Dimensions::new(2, 2, 1).unwrap());
    assert_eq!(static_mesh_dimensions(5).unwrap(), Dimensions::new(2, 4, 1).unwrap());
    assert_eq!(static_mesh_dimensions(3).unwrap(), Dimensions::new(1, 4, 1).unwrap());
    assert!(static_mesh_dimensions(0).is_err());
}

#[test]
fn rest_pose_is_encoded_in_vertex_order() {
    let mesh = five_vertex_mesh();
    let mut conditions = ConditionSet::new();
    let out = bake_static_mesh(&mesh, 1.0, ColorMode::Hdr, &mut conditions).unwrap();

    assert_eq!(out.name.to_string(), "Rock v5 s2x4.exr");
    assert_eq!(out.name.target, BakeTarget::StaticMesh);
    assert!(!out.range_violation);
    assert!(conditions.is_empty());

    for (i, p) in mesh.positions.iter().enumerate() {
        let px = out.texture.pixels()[i];
        assert!((decode_position(px, 1.0) - *p).length() < 1e-6);
        assert_eq!(px[3], 1.0);
    }
    // Unused tail stays clear.
    assert!(out.texture.pixels()[5..].iter().all(|p| *p == [0.0; 4]));
}

#[test]
fn ldr_name_and_range_warning() {
    let mesh = Mesh::new("Big", vec![Vec3::splat(3.0)]);
    let mut conditions = ConditionSet::new();
    let out = bake_static_mesh(&mesh, 1.0, ColorMode::Ldr, &mut conditions).unwrap();
    assert_eq!(out.name.to_string(), "Big v1 s1x1.png");
    assert!(out.range_violation);
    assert!(conditions.has(Condition::PixelOutOfRange));
}

#[test]
fn empty_mesh_raises_missing_mesh() {
    let mut conditions = ConditionSet::new();
    let err = bake_static_mesh(&Mesh::new("none", Vec::new()), 1.0, ColorMode::Hdr, &mut conditions);
    assert!(err.is_err());
    assert!(conditions.has(Condition::MissingMesh));
}
