use crate::foundation::core::{Canvas, Rgba8};
use crate::foundation::error::{AdrasterError, AdrasterResult};

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
/// Static per-session description of one ad layout variant.
///
/// A template is a pure data model: geometry, fonts, colors and optional
/// remote overlay assets. It can be built programmatically or loaded from
/// JSON via Serde, and is immutable for the lifetime of a
/// [`crate::RenderSession`].
pub struct TemplateDescriptor {
    /// Output canvas dimensions.
    pub canvas: Canvas,
    /// Caption text styling and wrap budget.
    pub caption: CaptionStyle,
    /// Call-to-action button styling.
    pub cta: CtaStyle,
    /// How the user photo is composited.
    #[serde(default)]
    pub image: ImageMode,
    /// Where the text block is anchored.
    #[serde(default)]
    pub anchor: TextAnchor,
    /// Outer canvas padding in pixels.
    #[serde(default = "default_padding_px")]
    pub padding_px: f64,
    /// Gap between the fitted image and the caption block.
    #[serde(default = "default_image_text_gap_px")]
    pub image_text_gap_px: f64,
    /// Gap between the caption block and the CTA button.
    #[serde(default = "default_caption_cta_gap_px")]
    pub caption_cta_gap_px: f64,
}

fn default_padding_px() -> f64 {
    15.0
}

fn default_image_text_gap_px() -> f64 {
    15.0
}

fn default_caption_cta_gap_px() -> f64 {
    20.0
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
/// Caption styling.
pub struct CaptionStyle {
    pub font_size_px: f32,
    pub color: Rgba8,
    /// Pixel budget for greedy word wrap.
    pub max_width_px: f64,
    /// Line advance as a multiple of the font size.
    #[serde(default = "default_line_height")]
    pub line_height: f32,
    /// Vertical space the caption block reserves in the image fit box.
    pub box_height_px: f64,
    #[serde(default)]
    pub align: TextAlign,
}

fn default_line_height() -> f32 {
    1.2
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
/// Call-to-action button styling.
pub struct CtaStyle {
    pub font_size_px: f32,
    pub text_color: Rgba8,
    pub background_color: Rgba8,
    pub width_px: f64,
    pub height_px: f64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// Horizontal anchoring of caption lines.
pub enum TextAlign {
    /// Each line centered on the canvas midline.
    #[default]
    Center,
    /// Lines start at the left padding edge.
    Left,
}

#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
/// Photo compositing mode. The mask-crop variant is configuration, not a
/// separate engine.
pub enum ImageMode {
    /// Aspect-preserving scale-to-box, no cropping.
    #[default]
    Fit,
    /// Photo drawn behind a mask silhouette (source-in), with a stroke
    /// overlay on top.
    MaskCrop {
        region: MaskRegion,
        urls: OverlayUrls,
    },
}

impl ImageMode {
    pub fn is_mask_crop(&self) -> bool {
        matches!(self, ImageMode::MaskCrop { .. })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Canvas region the photo is cropped into for mask compositing.
pub struct MaskRegion {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// Remote overlay assets for mask compositing.
pub struct OverlayUrls {
    pub mask: String,
    pub stroke: String,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
/// Vertical anchoring of the caption/CTA block.
pub enum TextAnchor {
    /// Text stacks directly under the fitted image. `top_fallback_px` is the
    /// caption top when no image has been supplied yet.
    BelowImage { top_fallback_px: f64 },
    /// Text pinned to the bottom edge, offsets measured up from it.
    Bottom {
        caption_offset_px: f64,
        cta_offset_px: f64,
    },
}

impl Default for TextAnchor {
    fn default() -> Self {
        TextAnchor::BelowImage {
            top_fallback_px: 60.0,
        }
    }
}

impl TemplateDescriptor {
    /// A 1080x1080 auto-fit template with white centered text and a 250x60
    /// CTA button, matching the stock landscape creative.
    pub fn sample_square_1080() -> Self {
        Self {
            canvas: Canvas {
                width: 1080,
                height: 1080,
            },
            caption: CaptionStyle {
                font_size_px: 44.0,
                color: Rgba8::opaque(0xFF, 0xFF, 0xFF),
                max_width_px: 960.0,
                line_height: 1.2,
                box_height_px: 60.0,
                align: TextAlign::Center,
            },
            cta: CtaStyle {
                font_size_px: 44.0,
                text_color: Rgba8::opaque(0xFF, 0xFF, 0xFF),
                background_color: Rgba8::opaque(0x8F, 0x97, 0x85),
                width_px: 250.0,
                height_px: 60.0,
            },
            image: ImageMode::Fit,
            anchor: TextAnchor::default(),
            padding_px: default_padding_px(),
            image_text_gap_px: default_image_text_gap_px(),
            caption_cta_gap_px: default_caption_cta_gap_px(),
        }
    }

    /// Load a template from its JSON form.
    pub fn from_json(json: &str) -> AdrasterResult<Self> {
        let t: TemplateDescriptor = serde_json::from_str(json)
            .map_err(|e| AdrasterError::geometry(format!("template json: {e}")))?;
        t.validate()?;
        Ok(t)
    }

    /// Reject templates whose geometry can never produce a valid layout.
    ///
    /// Geometry defects are configuration errors: fatal to the render
    /// attempt, never retried.
    pub fn validate(&self) -> AdrasterResult<()> {
        self.canvas.validate()?;

        let w = f64::from(self.canvas.width);
        let h = f64::from(self.canvas.height);

        if !(self.caption.font_size_px.is_finite() && self.caption.font_size_px > 0.0) {
            return Err(AdrasterError::geometry("caption font size must be > 0"));
        }
        if !(self.caption.line_height.is_finite() && self.caption.line_height > 0.0) {
            return Err(AdrasterError::geometry("caption line height must be > 0"));
        }
        if !(self.caption.max_width_px > 0.0 && self.caption.max_width_px <= w) {
            return Err(AdrasterError::geometry(
                "caption max width must be > 0 and fit the canvas",
            ));
        }
        if self.caption.box_height_px < 0.0 {
            return Err(AdrasterError::geometry("caption box height must be >= 0"));
        }

        if !(self.cta.font_size_px.is_finite() && self.cta.font_size_px > 0.0) {
            return Err(AdrasterError::geometry("cta font size must be > 0"));
        }
        if self.cta.width_px <= 0.0 || self.cta.height_px <= 0.0 {
            return Err(AdrasterError::geometry("cta box must have positive size"));
        }

        if self.padding_px < 0.0 {
            return Err(AdrasterError::geometry("padding must be >= 0"));
        }

        if let ImageMode::MaskCrop { region, .. } = &self.image {
            if region.width <= 0.0 || region.height <= 0.0 {
                return Err(AdrasterError::geometry("mask region must have positive size"));
            }
            if region.x < 0.0
                || region.y < 0.0
                || region.x + region.width > w
                || region.y + region.height > h
            {
                return Err(AdrasterError::geometry("mask region exceeds the canvas"));
            }
        }

        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// Mutable render inputs, replaced wholesale on every user edit.
pub struct RenderParams {
    pub background: Rgba8,
    pub caption_text: String,
    pub cta_text: String,
}

impl Default for RenderParams {
    fn default() -> Self {
        Self {
            background: Rgba8::opaque(0xFF, 0xFF, 0xFF),
            caption_text: String::new(),
            cta_text: String::new(),
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/template.rs"]
mod tests;
