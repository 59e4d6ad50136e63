use super::*;

#[test]
fn new_buffer_is_cleared() {
    let b = TextureBuffer::new(Dimensions::new(3, 2, 2).unwrap()).unwrap();
    assert_eq!(b.pixels().len(), 12);
    assert!(b.pixels().iter().all(|p| *p == CLEAR));
    assert!(!b.has_out_of_range());
}

#[test]
fn set_get_addresses_layers_row_major() {
    let mut b = TextureBuffer::new(Dimensions::new(3, 2, 2).unwrap()).unwrap();
    b.set(2, 1, 1, [0.1, 0.2, 0.3, 1.0]).unwrap();
    assert_eq!(b.get(2, 1, 1), Some([0.1, 0.2, 0.3, 1.0]));
    assert_eq!(b.pixels()[6 + 3 + 2], [0.1, 0.2, 0.3, 1.0]);
    assert_eq!(b.layer(1).unwrap()[5], [0.1, 0.2, 0.3, 1.0]);
    assert_eq!(b.layer(0).unwrap()[5], CLEAR);
    assert!(b.layer(2).is_none());
}

#[test]
fn out_of_bounds_set_is_an_encode_error() {
    let mut b = TextureBuffer::new(Dimensions::new(2, 2, 1).unwrap()).unwrap();
    assert!(matches!(b.set(2, 0, 0, CLEAR), Err(VatError::Encode(_))));
    assert_eq!(b.get(0, 2, 0), None);
}

#[test]
fn out_of_range_ignores_alpha() {
    let mut b = TextureBuffer::new(Dimensions::new(1, 1, 1).unwrap()).unwrap();
    b.set(0, 0, 0, [0.5, 0.5, 0.5, 3.0]).unwrap();
    assert!(!b.has_out_of_range());
    b.set(0, 0, 0, [0.5, -0.1, 0.5, 1.0]).unwrap();
    assert!(b.has_out_of_range());
}

#[test]
fn from_pixels_checks_length_and_clear_resets() {
    let dims = Dimensions::new(2, 1, 1).unwrap();
    assert!(TextureBuffer::from_pixels(dims, vec![CLEAR]).is_err());
    let mut b = TextureBuffer::from_pixels(dims, vec![[1.0; 4]; 2]).unwrap();
    b.clear();
    assert!(b.pixels().iter().all(|p| *p == CLEAR));
}
