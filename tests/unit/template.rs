use super::*;
use crate::foundation::error::AdrasterError;

#[test]
fn sample_template_is_valid() {
    TemplateDescriptor::sample_square_1080().validate().unwrap();
}

#[test]
fn rejects_degenerate_geometry() {
    let mut t = TemplateDescriptor::sample_square_1080();
    t.canvas.width = 0;
    assert!(matches!(
        t.validate(),
        Err(AdrasterError::InvalidGeometry(_))
    ));

    let mut t = TemplateDescriptor::sample_square_1080();
    t.caption.font_size_px = 0.0;
    assert!(t.validate().is_err());

    let mut t = TemplateDescriptor::sample_square_1080();
    t.cta.height_px = -1.0;
    assert!(t.validate().is_err());

    let mut t = TemplateDescriptor::sample_square_1080();
    t.caption.max_width_px = 2000.0; // wider than the canvas
    assert!(t.validate().is_err());
}

#[test]
fn rejects_mask_region_outside_canvas() {
    let mut t = TemplateDescriptor::sample_square_1080();
    t.image = ImageMode::MaskCrop {
        region: MaskRegion {
            x: 56.0,
            y: 442.0,
            width: 970.0,
            height: 200.0,
        },
        urls: OverlayUrls {
            mask: "https://assets.example/mask.png".to_string(),
            stroke: "https://assets.example/stroke.png".to_string(),
        },
    };
    // 56 + 970 = 1026 <= 1080: fits.
    t.validate().unwrap();

    if let ImageMode::MaskCrop { region, .. } = &mut t.image {
        region.x = 200.0;
    }
    assert!(matches!(
        t.validate(),
        Err(AdrasterError::InvalidGeometry(_))
    ));
}

#[test]
fn json_roundtrip_preserves_variants() {
    let mut t = TemplateDescriptor::sample_square_1080();
    t.anchor = TextAnchor::Bottom {
        caption_offset_px: 100.0,
        cta_offset_px: 40.0,
    };
    let json = serde_json::to_string(&t).unwrap();
    let back = TemplateDescriptor::from_json(&json).unwrap();
    assert!(matches!(back.anchor, TextAnchor::Bottom { .. }));
    assert_eq!(back.canvas, t.canvas);
}

#[test]
fn from_json_validates() {
    let mut t = TemplateDescriptor::sample_square_1080();
    t.cta.width_px = 0.0;
    let json = serde_json::to_string(&t).unwrap();
    assert!(TemplateDescriptor::from_json(&json).is_err());
}
