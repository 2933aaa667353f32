//! Adraster renders a parameterized ad creative onto a fixed-size raster
//! canvas: a background fill, a user photo (auto-fit or mask-cropped) and two
//! text layers (caption and call-to-action button), driven by a declarative
//! [`TemplateDescriptor`].
//!
//! # Pipeline overview
//!
//! 1. **Layout**: `TemplateDescriptor + RenderParams + photo dims ->
//!    LayoutPlan` (aspect-fit rect, word-wrapped caption lines, CTA rect)
//! 2. **Composite**: `LayoutPlan -> FrameRGBA` in fixed z-order on the CPU
//! 3. **Control**: [`RenderSession`] serializes repaints and gates them on
//!    asynchronous asset loads with last-requested-wins tokens
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic-by-default**: a repaint is a pure function of the
//!   template, the parameter snapshot and the current decoded photo.
//! - **No IO in the painter**: decode/fetch happen in [`assets`] loaders and
//!   hand values to the session; superseded loads are discarded, never
//!   applied.
//! - **Premultiplied RGBA8** end-to-end.
#![forbid(unsafe_code)]

mod assets;
mod foundation;
mod layout;
mod render;
mod session;
mod template;

pub use assets::decode::decode_image;
pub use assets::fetch::{fetch_image, fetch_overlays};
pub use assets::store::{OverlayImages, PreparedImage, TextBrushRgba8, TextLayoutEngine};
pub use foundation::core::{Canvas, Point, Rect, Rgba8, Rgba8Premul, Vec2};
pub use foundation::error::{AdrasterError, AdrasterResult};
pub use layout::solver::{CaptionLine, FitSize, LayoutPlan, fit_image, solve, wrap_text};
pub use render::composite::{mask_apply_source_in, over, over_in_place};
pub use render::compositor::Compositor;
pub use render::frame::FrameRGBA;
pub use session::{LoadReport, LoadToken, RenderSession, SessionState};
pub use template::{
    CaptionStyle, CtaStyle, ImageMode, MaskRegion, OverlayUrls, RenderParams, TemplateDescriptor,
    TextAlign, TextAnchor,
};
