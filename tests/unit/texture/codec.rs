use std::path::PathBuf;

use super::*;

fn out_dir(name: &str) -> PathBuf {
    let dir = PathBuf::from("target").join("unit_codec").join(name);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn sample_buffer(layers: u32) -> TextureBuffer {
    let dims = Dimensions::new(3, 2, layers).unwrap();
    let pixels = (0..dims.capacity())
        .map(|i| [i as f32 * 0.25 - 0.5, 0.5, 1.5, 1.0])
        .collect();
    TextureBuffer::from_pixels(dims, pixels).unwrap()
}

#[test]
fn rgba8_conversion_clamps() {
    let b = sample_buffer(1);
    let bytes = layer_rgba8(&b, 0).unwrap();
    assert_eq!(bytes.len(), 3 * 2 * 4);
    assert_eq!(&bytes[..4], &[0, 128, 255, 255]);
    assert!(layer_rgba8(&b, 1).is_err());
}

#[test]
fn png_roundtrip_is_clamped_8bit() {
    let path = out_dir("png").join("t.png");
    let b = sample_buffer(1);
    write_texture(&path, &b, ColorMode::Ldr, &[], ExrPrecision::Full).unwrap();
    let loaded = load_texture(&path).unwrap();
    assert_eq!(loaded.color_mode, ColorMode::Ldr);
    assert_eq!(loaded.buffer.dims(), b.dims());
    let px = loaded.buffer.get(0, 0, 0).unwrap();
    assert_eq!(px[0], 0.0);
    assert_eq!(px[2], 1.0);
    assert!((px[1] - 128.0 / 255.0).abs() < 1e-6);
}

#[test]
fn exr_roundtrip_keeps_unclamped_floats() {
    let path = out_dir("exr").join("t.exr");
    let b = sample_buffer(1);
    write_texture(&path, &b, ColorMode::Hdr, &[], ExrPrecision::Full).unwrap();
    let loaded = load_texture(&path).unwrap();
    assert_eq!(loaded.color_mode, ColorMode::Hdr);
    assert_eq!(loaded.buffer, b);
}

#[test]
fn multi_layer_exr_keeps_layer_names() {
    let path = out_dir("array").join("t.exr");
    let b = sample_buffer(3);
    let names = vec!["walk".to_string(), "run".to_string(), "idle".to_string()];
    write_texture(&path, &b, ColorMode::Hdr, &names, ExrPrecision::Full).unwrap();
    let loaded = load_texture(&path).unwrap();
    assert_eq!(loaded.buffer.layers(), 3);
    assert_eq!(loaded.layer_names, names);
    assert_eq!(loaded.buffer.layer(2), b.layer(2));
}

#[test]
fn ldr_arrays_are_clamped_exr() {
    let path = out_dir("ldr_array").join("t.exr");
    let b = sample_buffer(2);
    write_texture(&path, &b, ColorMode::Ldr, &[], ExrPrecision::Full).unwrap();
    let loaded = load_texture(&path).unwrap();
    assert!(!loaded.buffer.has_out_of_range());
    assert_eq!(loaded.layer_names, vec!["layer0", "layer1"]);
}

#[test]
fn single_layer_ldr_follows_the_exr_extension() {
    let path = out_dir("ldr_single_exr").join("t.exr");
    let b = sample_buffer(1);
    write_texture(&path, &b, ColorMode::Ldr, &["only".to_string()], ExrPrecision::Full).unwrap();
    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(&bytes[..4], &[0x76, 0x2f, 0x31, 0x01]);

    let loaded = load_texture(&path).unwrap();
    assert_eq!(loaded.layer_names, vec!["only"]);
    assert!(!loaded.buffer.has_out_of_range());
    assert_eq!(loaded.buffer.get(0, 0, 0).unwrap(), [0.0, 0.5, 1.0, 1.0]);
}

#[test]
fn png_rejects_layered_textures() {
    let path = out_dir("png_layers").join("t.png");
    let err = write_texture(&path, &sample_buffer(2), ColorMode::Ldr, &[], ExrPrecision::Full)
        .unwrap_err();
    assert!(matches!(err, VatError::Export(_)));
    assert!(!path.exists());
}

#[test]
fn half_precision_exr_is_close() {
    let path = out_dir("half").join("t.exr");
    let b = sample_buffer(1);
    write_exr(&path, &b, &[], ExrPrecision::Half, false).unwrap();
    let loaded = load_texture(&path).unwrap();
    for (a, e) in loaded.buffer.pixels().iter().zip(b.pixels()) {
        for c in 0..4 {
            assert!((a[c] - e[c]).abs() < 1e-3);
        }
    }
}

#[test]
fn missing_file_is_an_error() {
    assert!(load_texture(&PathBuf::from("target/does/not/exist.png")).is_err());
    assert!(load_texture(&PathBuf::from("target/does/not/exist.exr")).is_err());
}
