use super::*;
use crate::foundation::core::Dimensions;

fn cfg(rig: &str) -> SinkConfig {
    SinkConfig {
        rig_name: rig.to_string(),
        color_mode: ColorMode::Ldr,
        bake_mode: BakeMode::AllIndividual,
        expected_outputs: 1,
    }
}

fn output() -> BakeOutput {
    let dims = Dimensions::new(2, 2, 1).unwrap();
    BakeOutput {
        name: BakeFileName::for_clip("Rig", "walk", 2, 2, dims, "png"),
        texture: TextureBuffer::new(dims).unwrap(),
        color_mode: ColorMode::Ldr,
        layer_names: vec!["walk".to_string()],
        range_violation: false,
    }
}

#[test]
fn in_memory_sink_collects_outputs() {
    let mut sink = InMemorySink::new();
    assert!(sink.begin(&cfg("Rig")).unwrap());
    sink.write(output()).unwrap();
    sink.end().unwrap();
    assert!(sink.is_finished());
    assert_eq!(sink.config().unwrap().rig_name, "Rig");
    assert_eq!(sink.outputs().len(), 1);
}

#[test]
fn declining_sink_refuses() {
    let mut sink = InMemorySink::declining();
    assert!(!sink.begin(&cfg("Rig")).unwrap());
}

#[test]
fn directory_sink_without_root_declines() {
    let mut sink = DirectorySink::from_selection(None);
    assert!(!sink.begin(&cfg("Rig")).unwrap());
    assert!(sink.output_dir().is_none());
}

#[test]
fn directory_sink_writes_under_rig_folder() {
    let root = PathBuf::from("target").join("unit_sink");
    let mut sink = DirectorySink::new(&root);
    assert!(sink.begin(&cfg("Rig")).unwrap());
    sink.write(output()).unwrap();
    sink.end().unwrap();
    let expected = root.join("Rig").join("Rig@walk v2 f2 s2x2.png");
    assert_eq!(sink.written(), &[expected.clone()]);
    assert!(expected.exists());
}

#[test]
fn write_before_begin_is_an_export_error() {
    let mut sink = DirectorySink::new("target/unit_sink_unused");
    assert!(matches!(sink.write(output()), Err(VatError::Export(_))));
}
