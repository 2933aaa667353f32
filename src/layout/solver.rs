use crate::foundation::core::{Point, Rect};
use crate::foundation::error::{AdrasterError, AdrasterResult};
use crate::template::{TemplateDescriptor, TextAlign, TextAnchor};

#[derive(Clone, Copy, Debug, PartialEq)]
/// Aspect-preserving size of an image scaled into a box.
pub struct FitSize {
    pub w: f64,
    pub h: f64,
}

/// Scale `(image_w, image_h)` into `(box_w, box_h)` preserving aspect ratio.
///
/// The relatively wider side is clamped to the box and the other side is
/// derived, so the result touches at least one box edge and never exceeds
/// either. Non-positive dimensions are a geometry defect.
pub fn fit_image(image_w: f64, image_h: f64, box_w: f64, box_h: f64) -> AdrasterResult<FitSize> {
    if !(image_w > 0.0 && image_h > 0.0) {
        return Err(AdrasterError::geometry("image dimensions must be > 0"));
    }
    if !(box_w > 0.0 && box_h > 0.0) {
        return Err(AdrasterError::geometry("fit box must have positive size"));
    }

    let image_ratio = image_w / image_h;
    let box_ratio = box_w / box_h;
    if image_ratio > box_ratio {
        Ok(FitSize {
            w: box_w,
            h: box_w / image_ratio,
        })
    } else {
        Ok(FitSize {
            w: box_h * image_ratio,
            h: box_h,
        })
    }
}

/// Greedy word wrap against a pixel-width budget.
///
/// Words are whitespace-separated and never split: a single word wider than
/// `max_width_px` is emitted alone on its own line. Always yields at least
/// one line (empty text wraps to one empty line). Deterministic for a
/// deterministic `measure`.
pub fn wrap_text<M>(text: &str, max_width_px: f32, mut measure: M) -> AdrasterResult<Vec<String>>
where
    M: FnMut(&str) -> AdrasterResult<f32>,
{
    let mut words = text.split_whitespace();
    let Some(first) = words.next() else {
        return Ok(vec![String::new()]);
    };

    let mut lines = Vec::new();
    let mut line = String::from(first);
    for word in words {
        let candidate = format!("{line} {word}");
        if measure(&candidate)? <= max_width_px {
            line = candidate;
        } else {
            lines.push(std::mem::replace(&mut line, word.to_string()));
        }
    }
    lines.push(line);
    Ok(lines)
}

#[derive(Clone, Debug, PartialEq)]
/// One wrapped caption line with its measured width and layout-box origin
/// (top-left of the line box; glyph baselines live inside it).
pub struct CaptionLine {
    pub text: String,
    pub width_px: f32,
    pub origin: Point,
}

#[derive(Clone, Debug, PartialEq)]
/// Fully derived placement for one repaint. Recomputed from scratch on every
/// parameter change; nothing in it survives between renders.
pub struct LayoutPlan {
    /// Aspect-fit placement of the photo, absent while no photo is loaded.
    pub image_rect: Option<Rect>,
    /// Wrapped caption lines in draw order.
    pub caption_lines: Vec<CaptionLine>,
    /// CTA button rectangle; the label is centered within it.
    pub cta_rect: Rect,
}

/// Compute the placement of every element for the current inputs.
///
/// Pure: the result is fully determined by the template, the caption text
/// and the photo dimensions (via `measure`, which must be deterministic).
pub fn solve<M>(
    template: &TemplateDescriptor,
    caption_text: &str,
    image_dims: Option<(u32, u32)>,
    mut measure: M,
) -> AdrasterResult<LayoutPlan>
where
    M: FnMut(&str) -> AdrasterResult<f32>,
{
    let canvas_w = f64::from(template.canvas.width);
    let canvas_h = f64::from(template.canvas.height);
    let pad = template.padding_px;

    let image_rect = match image_dims {
        None => None,
        Some((iw, ih)) => {
            let box_w = canvas_w - 2.0 * pad;
            let box_h = canvas_h
                - 2.0 * pad
                - template.caption.box_height_px
                - template.cta.height_px
                - template.image_text_gap_px
                - template.caption_cta_gap_px;
            let fit = fit_image(f64::from(iw), f64::from(ih), box_w, box_h)?;
            let x = (canvas_w - fit.w) / 2.0;
            Some(Rect::new(x, pad, x + fit.w, pad + fit.h))
        }
    };

    let caption_top = match &template.anchor {
        TextAnchor::BelowImage { top_fallback_px } => match &image_rect {
            Some(r) => r.y1 + template.image_text_gap_px,
            None => *top_fallback_px,
        },
        TextAnchor::Bottom {
            caption_offset_px, ..
        } => canvas_h - caption_offset_px,
    };

    let max_width = template.caption.max_width_px as f32;
    let line_texts = wrap_text(caption_text, max_width, &mut measure)?;
    let line_advance = f64::from(template.caption.font_size_px * template.caption.line_height);

    let mut caption_lines = Vec::with_capacity(line_texts.len());
    for (i, text) in line_texts.into_iter().enumerate() {
        let width_px = measure(&text)?;
        let x = match template.caption.align {
            TextAlign::Center => (canvas_w - f64::from(width_px)) / 2.0,
            TextAlign::Left => pad,
        };
        let y = caption_top + (i as f64) * line_advance;
        caption_lines.push(CaptionLine {
            text,
            width_px,
            origin: Point::new(x, y),
        });
    }

    let cta_center_y = match &template.anchor {
        TextAnchor::BelowImage { .. } => {
            caption_top
                + template.caption.box_height_px
                + template.caption_cta_gap_px
                + template.cta.height_px / 2.0
        }
        TextAnchor::Bottom { cta_offset_px, .. } => canvas_h - cta_offset_px,
    };
    let cta_rect = Rect::new(
        (canvas_w - template.cta.width_px) / 2.0,
        cta_center_y - template.cta.height_px / 2.0,
        (canvas_w + template.cta.width_px) / 2.0,
        cta_center_y + template.cta.height_px / 2.0,
    );

    Ok(LayoutPlan {
        image_rect,
        caption_lines,
        cta_rect,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/layout/solver.rs"]
mod tests;
