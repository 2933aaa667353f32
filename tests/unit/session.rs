use super::*;
use crate::assets::decode::decode_image;
use crate::template::{ImageMode, MaskRegion, OverlayUrls};

fn system_font_bytes() -> Option<Vec<u8>> {
    let roots = ["/usr/share/fonts", "/usr/local/share/fonts"];
    fn walk(dir: &std::path::Path) -> Option<Vec<u8>> {
        for entry in std::fs::read_dir(dir).ok()?.flatten() {
            let path = entry.path();
            if path.is_dir() {
                if let Some(bytes) = walk(&path) {
                    return Some(bytes);
                }
            } else if matches!(
                path.extension().and_then(|e| e.to_str()),
                Some("ttf") | Some("otf")
            ) {
                if let Ok(bytes) = std::fs::read(&path) {
                    return Some(bytes);
                }
            }
        }
        None
    }
    roots.iter().find_map(|r| walk(std::path::Path::new(r)))
}

fn png_bytes(width: u32, height: u32, px: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba(px));
    let mut out = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut std::io::Cursor::new(&mut out), image::ImageFormat::Png)
        .unwrap();
    out
}

fn small_template() -> TemplateDescriptor {
    let mut t = TemplateDescriptor::sample_square_1080();
    t.canvas = crate::foundation::core::Canvas {
        width: 200,
        height: 200,
    };
    t.caption.max_width_px = 180.0;
    t.caption.font_size_px = 12.0;
    t.caption.box_height_px = 16.0;
    t.cta.font_size_px = 12.0;
    t.cta.width_px = 60.0;
    t.cta.height_px = 20.0;
    t.anchor = crate::template::TextAnchor::BelowImage {
        top_fallback_px: 20.0,
    };
    t
}

fn mask_template() -> TemplateDescriptor {
    let mut t = small_template();
    t.image = ImageMode::MaskCrop {
        region: MaskRegion {
            x: 10.0,
            y: 10.0,
            width: 100.0,
            height: 60.0,
        },
        urls: OverlayUrls {
            mask: "https://assets.example/mask.png".to_string(),
            stroke: "https://assets.example/stroke.png".to_string(),
        },
    };
    t
}

#[test]
fn initial_mount_paints_and_reaches_ready() {
    let Some(font) = system_font_bytes() else {
        eprintln!("no system font found; skipping");
        return;
    };
    let session = RenderSession::new(small_template(), font).unwrap();
    assert_eq!(session.state(), SessionState::Ready);
    let frame = session.frame();
    assert_eq!((frame.width, frame.height), (200, 200));
    // Default background is opaque white.
    assert_eq!(&frame.data[0..4], &[255, 255, 255, 255]);
}

#[test]
fn invalid_template_is_fatal_at_mount() {
    let Some(font) = system_font_bytes() else {
        eprintln!("no system font found; skipping");
        return;
    };
    let mut t = small_template();
    t.cta.width_px = 0.0;
    assert!(matches!(
        RenderSession::new(t, font),
        Err(AdrasterError::InvalidGeometry(_))
    ));
}

#[test]
fn superseded_image_load_never_overwrites_newer_result() {
    let Some(font) = system_font_bytes() else {
        eprintln!("no system font found; skipping");
        return;
    };
    let mut session = RenderSession::new(small_template(), font).unwrap();

    let red = decode_image(&png_bytes(40, 30, [255, 0, 0, 255])).unwrap();
    let blue = decode_image(&png_bytes(40, 30, [0, 0, 255, 255])).unwrap();

    let token_a = session.begin_image_load();
    let token_b = session.begin_image_load();
    assert_eq!(session.state(), SessionState::AwaitingImage);

    // B resolves first and wins.
    assert!(matches!(
        session.complete_image_load(token_b, Ok(blue)).unwrap(),
        LoadReport::Applied
    ));
    assert_eq!(session.state(), SessionState::Ready);
    let after_b = session.frame().clone();

    // A arrives late and must be dropped without touching the raster.
    assert!(matches!(
        session.complete_image_load(token_a, Ok(red)).unwrap(),
        LoadReport::Superseded
    ));
    assert_eq!(session.frame(), &after_b);
}

#[test]
fn decode_failure_keeps_the_previous_good_frame() {
    let Some(font) = system_font_bytes() else {
        eprintln!("no system font found; skipping");
        return;
    };
    let mut session = RenderSession::new(small_template(), font).unwrap();
    session.set_caption_text("hello").unwrap();
    let before = session.frame().clone();

    let token = session.begin_image_load();
    let report = session
        .complete_image_load(token, decode_image(b"not an image"))
        .unwrap();
    assert!(matches!(report, LoadReport::Failed(AdrasterError::Decode(_))));
    assert_eq!(session.state(), SessionState::Ready);
    assert_eq!(session.frame(), &before);
}

#[test]
fn mask_template_waits_for_overlays_then_composites() {
    let Some(font) = system_font_bytes() else {
        eprintln!("no system font found; skipping");
        return;
    };
    let mut session = RenderSession::new(mask_template(), font).unwrap();

    let img_token = session.begin_image_load();
    let ov_token = session.begin_overlay_load();
    // A pending photo takes precedence in the reported state.
    assert_eq!(session.state(), SessionState::AwaitingImage);

    let photo = decode_image(&png_bytes(40, 30, [0, 200, 0, 255])).unwrap();
    session.complete_image_load(img_token, Ok(photo)).unwrap();
    assert_eq!(session.state(), SessionState::AwaitingMaskAssets);
    let unmasked = session.frame().clone();

    let mask = decode_image(&png_bytes(20, 20, [255, 255, 255, 255])).unwrap();
    let stroke = decode_image(&png_bytes(20, 20, [0, 0, 0, 0])).unwrap();
    let report = session
        .complete_overlay_load(
            ov_token,
            Ok(crate::assets::store::OverlayImages { mask, stroke }),
        )
        .unwrap();
    assert!(matches!(report, LoadReport::Applied));
    assert_eq!(session.state(), SessionState::Ready);
    // Masked compositing crops to the template region, so pixels change.
    assert_ne!(session.frame(), &unmasked);
}

#[test]
fn overlay_load_is_inert_for_fit_templates() {
    let Some(font) = system_font_bytes() else {
        eprintln!("no system font found; skipping");
        return;
    };
    let mut session = RenderSession::new(small_template(), font).unwrap();
    let before = session.frame().clone();

    let token = session.begin_overlay_load();
    assert_eq!(session.state(), SessionState::Ready);

    let mask = decode_image(&png_bytes(20, 20, [255, 255, 255, 255])).unwrap();
    let stroke = decode_image(&png_bytes(20, 20, [0, 0, 0, 255])).unwrap();
    let report = session
        .complete_overlay_load(
            token,
            Ok(crate::assets::store::OverlayImages { mask, stroke }),
        )
        .unwrap();
    assert!(matches!(report, LoadReport::Applied));
    assert_eq!(session.state(), SessionState::Ready);
    assert_eq!(session.frame(), &before);
}

#[test]
fn overlay_failure_falls_back_to_unmasked_draw() {
    let Some(font) = system_font_bytes() else {
        eprintln!("no system font found; skipping");
        return;
    };
    let mut session = RenderSession::new(mask_template(), font).unwrap();

    let img_token = session.begin_image_load();
    let photo = decode_image(&png_bytes(40, 30, [0, 200, 0, 255])).unwrap();
    session.complete_image_load(img_token, Ok(photo)).unwrap();
    let unmasked = session.frame().clone();

    let ov_token = session.begin_overlay_load();
    let report = session
        .complete_overlay_load(ov_token, Err(AdrasterError::fetch("unreachable")))
        .unwrap();
    assert!(matches!(report, LoadReport::Failed(AdrasterError::Fetch(_))));
    assert_eq!(session.state(), SessionState::Ready);
    // The fallback keeps the unmasked fit-drawn photo on screen.
    assert_eq!(session.frame(), &unmasked);
}
