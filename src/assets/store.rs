use std::sync::Arc;

use crate::foundation::error::{AdrasterError, AdrasterResult};

#[derive(Clone, Debug)]
/// Decoded raster image in row-major premultiplied RGBA8 form.
///
/// A session owns at most one current photo; a newer load replaces it
/// wholesale, never patches it in place.
pub struct PreparedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes in premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
}

#[derive(Clone, Debug)]
/// The pair of remote overlay images a mask-crop template composites with.
pub struct OverlayImages {
    pub mask: PreparedImage,
    pub stroke: PreparedImage,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// RGBA8 brush color used by Parley text layout.
pub struct TextBrushRgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

/// Stateful helper for measuring and laying out single lines of text with
/// Parley, backed by caller-supplied font bytes.
///
/// Word-wrap line breaking is done by [`crate::layout::wrap_text`] against
/// [`TextLayoutEngine::measure_px`]; this engine never breaks lines itself.
pub struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    family_name: String,
}

impl TextLayoutEngine {
    /// Register `font_bytes` and construct fresh Parley contexts.
    ///
    /// Fails with `InvalidGeometry` when no usable font family can be
    /// registered (font metrics unavailable).
    pub fn new(font_bytes: &[u8]) -> AdrasterResult<Self> {
        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes.to_vec()), None);
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            AdrasterError::geometry("no font families registered from font bytes")
        })?;
        let family_name = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| AdrasterError::geometry("registered font family has no name"))?
            .to_string();

        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            family_name,
        })
    }

    /// Shape and lay out one line of text (no line breaking).
    pub fn layout_line(
        &mut self,
        text: &str,
        size_px: f32,
        brush: TextBrushRgba8,
    ) -> AdrasterResult<parley::Layout<TextBrushRgba8>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(AdrasterError::geometry("text size_px must be finite and > 0"));
        }

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(self.family_name.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);
        Ok(layout)
    }

    /// Measured advance width of `text` at `size_px`, in pixels.
    pub fn measure_px(&mut self, text: &str, size_px: f32) -> AdrasterResult<f32> {
        if text.is_empty() {
            return Ok(0.0);
        }
        let layout = self.layout_line(text, size_px, TextBrushRgba8::default())?;
        let mut w = 0.0f32;
        for line in layout.lines() {
            w = w.max(line.metrics().advance);
        }
        Ok(w)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/store.rs"]
mod tests;
