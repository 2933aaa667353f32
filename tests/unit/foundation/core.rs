use super::*;
use crate::foundation::error::AdrasterError;

#[test]
fn hex_parses_rgb_and_rgba() {
    assert_eq!(
        Rgba8::from_hex("#0369A1").unwrap(),
        Rgba8::opaque(0x03, 0x69, 0xA1)
    );
    assert_eq!(
        Rgba8::from_hex("8F978580").unwrap(),
        Rgba8::new(0x8F, 0x97, 0x85, 0x80)
    );
}

#[test]
fn hex_rejects_bad_input() {
    for bad in ["", "#fff", "#GGGGGG", "#12345", "#123456789"] {
        assert!(matches!(
            Rgba8::from_hex(bad),
            Err(AdrasterError::InvalidGeometry(_))
        ));
    }
}

#[test]
fn premultiply_scales_color_channels() {
    let p = Rgba8::new(200, 100, 0, 128).premultiply();
    assert_eq!(p.a, 128);
    // (200*128 + 127) / 255 == 100
    assert_eq!(p.r, 100);
    assert_eq!(p.g, 50);
    assert_eq!(p.b, 0);

    let opaque = Rgba8::opaque(10, 20, 30).premultiply();
    assert_eq!(opaque.to_array(), [10, 20, 30, 255]);
}

#[test]
fn canvas_validation_bounds() {
    assert!(
        Canvas {
            width: 1080,
            height: 1080
        }
        .validate()
        .is_ok()
    );
    assert!(Canvas { width: 0, height: 1 }.validate().is_err());
    assert!(
        Canvas {
            width: 70_000,
            height: 1
        }
        .validate()
        .is_err()
    );
}
