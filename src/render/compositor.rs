use std::sync::Arc;

use crate::assets::store::{OverlayImages, PreparedImage, TextBrushRgba8, TextLayoutEngine};
use crate::foundation::core::{Affine, Rect, Rgba8, Vec2};
use crate::foundation::error::{AdrasterError, AdrasterResult};
use crate::layout::solver::LayoutPlan;
use crate::render::composite::{mask_apply_source_in, over_in_place};
use crate::render::frame::FrameRGBA;
use crate::template::{ImageMode, RenderParams, TemplateDescriptor};

/// Paints one fully composited frame per call, in fixed z-order:
/// background fill, photo (fit or mask-crop), caption lines, CTA button.
///
/// The compositor owns the text engine and a reusable `vello_cpu` render
/// context; it never owns the frame it produces and never reads painted
/// pixels back into layout decisions.
pub struct Compositor {
    ctx: Option<vello_cpu::RenderContext>,
    text: TextLayoutEngine,
    font: vello_cpu::peniko::FontData,
}

impl Compositor {
    pub fn new(font_bytes: Vec<u8>) -> AdrasterResult<Self> {
        let text = TextLayoutEngine::new(&font_bytes)?;
        let font = vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(font_bytes), 0);
        Ok(Self {
            ctx: None,
            text,
            font,
        })
    }

    /// Measured advance width of one line of caption-style text.
    pub fn measure_px(&mut self, text: &str, size_px: f32) -> AdrasterResult<f32> {
        self.text.measure_px(text, size_px)
    }

    /// Composite one frame for the given snapshot of inputs.
    #[tracing::instrument(skip_all)]
    pub fn paint(
        &mut self,
        template: &TemplateDescriptor,
        params: &RenderParams,
        image: Option<&PreparedImage>,
        overlays: Option<&OverlayImages>,
        plan: &LayoutPlan,
    ) -> AdrasterResult<FrameRGBA> {
        let (w16, h16) = canvas_dims_u16(template)?;

        let mut base = self.render_pass(w16, h16, |this, ctx| {
            this.draw_background(ctx, template, params.background);

            match (&template.image, image, overlays) {
                // Masked composite is gated on both overlays; it runs below,
                // outside this pass.
                (ImageMode::MaskCrop { .. }, Some(_), Some(_)) => {}
                (_, Some(img), _) => {
                    if let Some(rect) = plan.image_rect {
                        this.draw_image(ctx, img, rect)?;
                    }
                }
                (_, None, _) => {}
            }
            Ok(())
        })?;

        if let (ImageMode::MaskCrop { region, .. }, Some(img), Some(ov)) =
            (&template.image, image, overlays)
        {
            let region_rect = Rect::new(
                region.x,
                region.y,
                region.x + region.width,
                region.y + region.height,
            );
            let full = Rect::new(0.0, 0.0, f64::from(w16), f64::from(h16));

            let photo = self.render_pass(w16, h16, |this, ctx| {
                this.draw_image(ctx, img, region_rect)
            })?;
            let mask = self.render_pass(w16, h16, |this, ctx| {
                this.draw_image(ctx, &ov.mask, full)
            })?;

            let mut masked = vec![0u8; photo.data_as_u8_slice().len()];
            mask_apply_source_in(
                photo.data_as_u8_slice(),
                mask.data_as_u8_slice(),
                &mut masked,
            )?;
            over_in_place(base.data_as_u8_slice_mut(), &masked)?;

            let stroke = self.render_pass(w16, h16, |this, ctx| {
                this.draw_image(ctx, &ov.stroke, full)
            })?;
            over_in_place(base.data_as_u8_slice_mut(), stroke.data_as_u8_slice())?;
        }

        let text_layer = self.render_pass(w16, h16, |this, ctx| {
            this.draw_caption(ctx, template, plan)?;
            this.draw_cta(ctx, template, &params.cta_text, plan.cta_rect)
        })?;
        over_in_place(base.data_as_u8_slice_mut(), text_layer.data_as_u8_slice())?;

        Ok(FrameRGBA {
            width: u32::from(w16),
            height: u32::from(h16),
            data: base.data_as_u8_slice().to_vec(),
        })
    }

    fn render_pass(
        &mut self,
        width: u16,
        height: u16,
        f: impl FnOnce(&mut Self, &mut vello_cpu::RenderContext) -> AdrasterResult<()>,
    ) -> AdrasterResult<vello_cpu::Pixmap> {
        let mut ctx = match self.ctx.take() {
            Some(ctx) if ctx.width() == width && ctx.height() == height => ctx,
            _ => vello_cpu::RenderContext::new(width, height),
        };
        ctx.reset();

        let mut pixmap = vello_cpu::Pixmap::new(width, height);
        let out = f(self, &mut ctx);
        if out.is_ok() {
            ctx.flush();
            ctx.render_to_pixmap(&mut pixmap);
        }
        self.ctx = Some(ctx);
        out.map(|()| pixmap)
    }

    fn draw_background(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        template: &TemplateDescriptor,
        color: Rgba8,
    ) {
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
            color.r, color.g, color.b, color.a,
        ));
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(template.canvas.width),
            f64::from(template.canvas.height),
        ));
    }

    fn draw_image(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        img: &PreparedImage,
        dst: Rect,
    ) -> AdrasterResult<()> {
        let paint = image_paint(img)?;
        let sx = dst.width() / f64::from(img.width);
        let sy = dst.height() / f64::from(img.height);
        let tr = Affine::translate(Vec2::new(dst.x0, dst.y0)) * Affine::scale_non_uniform(sx, sy);

        ctx.set_transform(affine_to_cpu(tr));
        ctx.set_paint(paint);
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(img.width),
            f64::from(img.height),
        ));
        Ok(())
    }

    fn draw_caption(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        template: &TemplateDescriptor,
        plan: &LayoutPlan,
    ) -> AdrasterResult<()> {
        let c = template.caption.color;
        let brush = TextBrushRgba8 {
            r: c.r,
            g: c.g,
            b: c.b,
            a: c.a,
        };
        for line in &plan.caption_lines {
            let layout = self
                .text
                .layout_line(&line.text, template.caption.font_size_px, brush)?;
            draw_text_layout(ctx, &self.font, &layout, line.origin.x, line.origin.y);
        }
        Ok(())
    }

    fn draw_cta(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        template: &TemplateDescriptor,
        label: &str,
        rect: Rect,
    ) -> AdrasterResult<()> {
        let bg = template.cta.background_color;
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(bg.r, bg.g, bg.b, bg.a));
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(rect.x0, rect.y0, rect.x1, rect.y1));

        let c = template.cta.text_color;
        let brush = TextBrushRgba8 {
            r: c.r,
            g: c.g,
            b: c.b,
            a: c.a,
        };
        let layout = self.text.layout_line(label, template.cta.font_size_px, brush)?;
        let (label_w, label_h) = layout_size(&layout);
        let x = rect.x0 + (rect.width() - label_w) / 2.0;
        let y = rect.y0 + (rect.height() - label_h) / 2.0;
        draw_text_layout(ctx, &self.font, &layout, x, y);
        Ok(())
    }
}

fn draw_text_layout(
    ctx: &mut vello_cpu::RenderContext,
    font: &vello_cpu::peniko::FontData,
    layout: &parley::Layout<TextBrushRgba8>,
    x: f64,
    y: f64,
) {
    ctx.set_transform(affine_to_cpu(Affine::translate(Vec2::new(x, y))));
    for line in layout.lines() {
        for item in line.items() {
            let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                continue;
            };
            let brush = run.style().brush;
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                brush.r, brush.g, brush.b, brush.a,
            ));
            let glyphs = run.glyphs().map(|g| vello_cpu::Glyph {
                id: g.id,
                x: g.x,
                y: g.y,
            });
            ctx.glyph_run(font)
                .font_size(run.run().font_size())
                .fill_glyphs(glyphs);
        }
    }
}

fn layout_size(layout: &parley::Layout<TextBrushRgba8>) -> (f64, f64) {
    let mut w = 0.0f64;
    let mut h = 0.0f64;
    for line in layout.lines() {
        let m = line.metrics();
        w = w.max(f64::from(m.advance));
        h += f64::from(m.ascent + m.descent + m.leading);
    }
    (w, h)
}

fn image_paint(img: &PreparedImage) -> AdrasterResult<vello_cpu::Image> {
    let pixmap = pixmap_from_premul_bytes(&img.rgba8_premul, img.width, img.height)?;
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> AdrasterResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| AdrasterError::geometry("pixmap width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| AdrasterError::geometry("pixmap height exceeds u16"))?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(AdrasterError::geometry("pixmap byte len mismatch"));
    }
    // Pixmap stores PremulRgba8; our bytes are already premultiplied.
    let mut pixels = Vec::<vello_cpu::peniko::color::PremulRgba8>::with_capacity(
        (width as usize) * (height as usize),
    );
    for px in bytes.chunks_exact(4) {
        pixels.push(vello_cpu::peniko::color::PremulRgba8::from_u8_array([
            px[0], px[1], px[2], px[3],
        ]));
    }
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels, w, h, true,
    ))
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn canvas_dims_u16(template: &TemplateDescriptor) -> AdrasterResult<(u16, u16)> {
    let w: u16 = template
        .canvas
        .width
        .try_into()
        .map_err(|_| AdrasterError::geometry("canvas width exceeds u16"))?;
    let h: u16 = template
        .canvas
        .height
        .try_into()
        .map_err(|_| AdrasterError::geometry("canvas height exceeds u16"))?;
    Ok((w, h))
}
