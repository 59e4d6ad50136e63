use super::*;

fn quad() -> Mesh {
    let mut mesh = Mesh::new(
        "quad",
        vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        ],
    );
    mesh.indices = vec![0, 1, 2, 0, 2, 3];
    mesh
}

#[test]
fn json_document_round_trips() {
    let mut mesh = quad();
    mesh.set_uv(UvChannel::new(0).unwrap(), vec![Vec2::new(0.0, 0.25); 4]);
    let json = mesh.to_json_string().unwrap();
    let back = Mesh::from_json_str(&json).unwrap();
    assert_eq!(back, mesh);
}

#[test]
fn minimal_document_parses() {
    let json = r#"{ "name": "tri", "positions": [[0,0,0],[1,0,0],[0,1,0]] }"#;
    let mesh = Mesh::from_json_str(json).unwrap();
    assert_eq!(mesh.vertex_count(), 3);
    assert!(mesh.uv(UvChannel::default()).is_empty());
    assert!(mesh.normals.is_empty());
}

#[test]
fn validation_catches_mismatched_attributes() {
    let mut mesh = quad();
    mesh.normals = vec![Vec3::Z; 3];
    assert!(mesh.validate().is_err());

    let mut mesh = quad();
    mesh.uvs.insert(2, vec![Vec2::ZERO; 5]);
    assert!(mesh.validate().is_err());

    let mut mesh = quad();
    mesh.uvs.insert(9, vec![Vec2::ZERO; 4]);
    assert!(mesh.validate().is_err());

    let mut mesh = quad();
    mesh.indices = vec![0, 1, 4];
    assert!(mesh.validate().is_err());

    let mut mesh = quad();
    mesh.indices.pop();
    assert!(mesh.validate().is_err());
}

#[test]
fn setting_empty_uvs_clears_the_channel() {
    let mut mesh = quad();
    let ch = UvChannel::new(3).unwrap();
    mesh.set_uv(ch, vec![Vec2::ONE; 4]);
    assert_eq!(mesh.uv(ch).len(), 4);
    mesh.set_uv(ch, Vec::new());
    assert!(mesh.uvs.is_empty());
}
