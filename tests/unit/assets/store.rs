use super::*;
use crate::foundation::error::AdrasterError;

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

#[test]
fn rejects_bytes_with_no_font_family() {
    assert!(matches!(
        TextLayoutEngine::new(&[]),
        Err(AdrasterError::InvalidGeometry(_))
    ));
    assert!(matches!(
        TextLayoutEngine::new(b"not a font"),
        Err(AdrasterError::InvalidGeometry(_))
    ));
}

#[test]
fn measure_is_monotonic_and_zero_for_empty() {
    let Some(bytes) = system_font_bytes() else {
        eprintln!("no system font found; skipping");
        return;
    };
    let mut engine = TextLayoutEngine::new(&bytes).unwrap();
    assert_eq!(engine.measure_px("", 44.0).unwrap(), 0.0);

    let short = engine.measure_px("hi", 44.0).unwrap();
    let long = engine.measure_px("hi there longer", 44.0).unwrap();
    assert!(short > 0.0);
    assert!(long > short);

    // Deterministic for identical input.
    assert_eq!(short, engine.measure_px("hi", 44.0).unwrap());
}

#[test]
fn rejects_nonpositive_text_size() {
    let Some(bytes) = system_font_bytes() else {
        eprintln!("no system font found; skipping");
        return;
    };
    let mut engine = TextLayoutEngine::new(&bytes).unwrap();
    assert!(
        engine
            .layout_line("x", 0.0, TextBrushRgba8::default())
            .is_err()
    );
}
