use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        VatError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(VatError::rig("x").to_string().contains("rig error:"));
    assert!(VatError::encode("x").to_string().contains("encode error:"));
    assert!(VatError::export("x").to_string().contains("export error:"));
    assert!(
        VatError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = VatError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
