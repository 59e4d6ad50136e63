use super::*;
use crate::foundation::core::Dimensions;

fn buffer(w: u32, h: u32, layers: u32) -> TextureBuffer {
    TextureBuffer::new(Dimensions::new(w, h, layers).unwrap()).unwrap()
}

#[test]
fn origin_vertices_encode_to_mid_grey() {
    let mut buf = buffer(4, 30, 1);
    let mut enc = VatEncoder::new(4, 1.0).unwrap();
    for f in 0..30 {
        let flag = enc.encode_frame(&mut buf, 0, f, &[Vec3::ZERO; 4]).unwrap();
        assert!(!flag);
    }
    assert!(buf.pixels().iter().all(|p| *p == [0.5, 0.5, 0.5, 1.0]));
}

#[test]
fn out_of_range_is_flagged_and_stored_unclamped() {
    let mut buf = buffer(2, 2, 1);
    let mut enc = VatEncoder::new(2, 1.0).unwrap();
    let flag = enc
        .encode_frame(&mut buf, 0, 0, &[Vec3::new(0.6, 0.0, 0.0), Vec3::ZERO])
        .unwrap();
    assert!(flag);
    let px = buf.get(0, 0, 0).unwrap();
    assert!((px[0] - 1.1).abs() < 1e-6);
    assert_eq!(px[3], 1.0);

    // sticky across later in-range frames
    assert!(enc.encode_frame(&mut buf, 0, 1, &[Vec3::ZERO; 2]).unwrap());
    assert!(enc.range_violation());
}

#[test]
fn frames_pack_across_row_boundaries() {
    // 3 vertices in a 4-wide texture: frame 1 starts at (3,0) and wraps to row 1.
    let mut buf = buffer(4, 4, 1);
    let mut enc = VatEncoder::new(3, 1.0).unwrap();
    let verts = [
        Vec3::new(0.1, 0.0, 0.0),
        Vec3::new(0.2, 0.0, 0.0),
        Vec3::new(0.3, 0.0, 0.0),
    ];
    enc.encode_frame(&mut buf, 0, 1, &verts).unwrap();
    assert_eq!(pixel_coords(3, 4, 1, 0), (3, 0));
    assert_eq!(pixel_coords(3, 4, 1, 2), (1, 1));
    assert!((buf.get(3, 0, 0).unwrap()[0] - 0.6).abs() < 1e-6);
    assert!((buf.get(1, 1, 0).unwrap()[0] - 0.8).abs() < 1e-6);
    assert_eq!(buf.get(2, 1, 0).unwrap(), [0.0; 4]);
}

#[test]
fn decode_recovers_written_positions() {
    let mut buf = buffer(8, 8, 1);
    let mut enc = VatEncoder::new(5, 0.5).unwrap();
    let verts: Vec<Vec3> = (0..5)
        .map(|i| Vec3::new(i as f32 * 0.1, -0.2, 0.3))
        .collect();
    enc.encode_frame(&mut buf, 0, 3, &verts).unwrap();
    for (j, v) in verts.iter().enumerate() {
        let (x, y) = pixel_coords(5, 8, 3, j);
        let px = buf.get(x as u32, y as u32, 0).unwrap();
        assert!(decode_position(px, 0.5).distance(*v) < 1e-5);
    }
}

#[test]
fn encoding_is_idempotent() {
    let mut a = buffer(4, 4, 1);
    let mut enc = VatEncoder::new(4, 1.0).unwrap();
    let verts = [Vec3::new(0.25, -0.1, 0.05); 4];
    enc.encode_frame(&mut a, 0, 2, &verts).unwrap();
    let once = a.clone();
    enc.encode_frame(&mut a, 0, 2, &verts).unwrap();
    assert_eq!(a, once);
}

#[test]
fn capacity_and_vertex_count_are_checked() {
    let mut buf = buffer(2, 2, 1);
    let mut enc = VatEncoder::new(2, 1.0).unwrap();
    assert!(matches!(
        enc.encode_frame(&mut buf, 0, 2, &[Vec3::ZERO; 2]),
        Err(VatError::Encode(_))
    ));
    assert!(matches!(
        enc.encode_frame(&mut buf, 0, 0, &[Vec3::ZERO; 3]),
        Err(VatError::Rig(_))
    ));
    assert!(matches!(
        enc.encode_frame(&mut buf, 1, 0, &[Vec3::ZERO; 2]),
        Err(VatError::Encode(_))
    ));
    assert!(VatEncoder::new(0, 1.0).is_err());
    assert!(VatEncoder::new(1, f32::INFINITY).is_err());
}

#[test]
fn layers_are_independent() {
    let mut buf = buffer(2, 1, 2);
    let mut enc = VatEncoder::new(2, 1.0).unwrap();
    enc.encode_frame(&mut buf, 1, 0, &[Vec3::ZERO; 2]).unwrap();
    assert_eq!(buf.layer(0).unwrap(), &[[0.0; 4]; 2]);
    assert_eq!(buf.layer(1).unwrap(), &[[0.5, 0.5, 0.5, 1.0]; 2]);
}
