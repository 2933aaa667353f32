use crate::assets::store::{OverlayImages, PreparedImage};
use crate::foundation::core::Rgba8;
use crate::foundation::error::{AdrasterError, AdrasterResult};
use crate::layout::solver::{self, LayoutPlan};
use crate::render::compositor::Compositor;
use crate::render::frame::FrameRGBA;
use crate::template::{RenderParams, TemplateDescriptor};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Controller states. `Ready` is the steady state, re-entered after every
/// completed repaint; there is no terminal state.
pub enum SessionState {
    Idle,
    AwaitingImage,
    AwaitingMaskAssets,
    Ready,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Identity of one asynchronous load request. Tokens increase monotonically;
/// only the most recently issued token for a slot may apply its result.
pub struct LoadToken(u64);

#[derive(Debug)]
/// Outcome of completing an asynchronous load against the session.
pub enum LoadReport {
    /// The result was current and has been applied; the frame is repainted.
    Applied,
    /// A newer load was requested first; the result was discarded and the
    /// frame left untouched.
    Superseded,
    /// The load failed. The session stays `Ready` with the previous valid
    /// content (or the documented fallback) rendered.
    Failed(AdrasterError),
}

/// One editing session over a fixed template: owns the current parameter
/// snapshot, the current photo/overlays, and the last painted frame.
///
/// The session is the single writer. Parameter edits repaint synchronously;
/// image and overlay loads are two-phase (`begin_*` hands out a token, the
/// host completes with the loader's result) so a superseded in-flight load
/// is a no-op regardless of completion order.
pub struct RenderSession {
    template: TemplateDescriptor,
    params: RenderParams,

    image: Option<PreparedImage>,
    overlays: Option<OverlayImages>,
    image_token: u64,
    overlay_token: u64,
    image_pending: bool,
    overlays_pending: bool,

    state: SessionState,
    compositor: Compositor,
    frame: FrameRGBA,
}

impl RenderSession {
    /// Validate the template, then paint the initial text-only frame
    /// (`Idle -> Ready`).
    pub fn new(template: TemplateDescriptor, font_bytes: Vec<u8>) -> AdrasterResult<Self> {
        template.validate()?;
        let mut session = Self {
            template,
            params: RenderParams::default(),
            image: None,
            overlays: None,
            image_token: 0,
            overlay_token: 0,
            image_pending: false,
            overlays_pending: false,
            state: SessionState::Idle,
            compositor: Compositor::new(font_bytes)?,
            frame: FrameRGBA {
                width: 0,
                height: 0,
                data: Vec::new(),
            },
        };
        session.repaint()?;
        session.state = SessionState::Ready;
        Ok(session)
    }

    /// The most recently painted frame. Always corresponds to the latest
    /// applied parameters and image, never to a superseded load.
    pub fn frame(&self) -> &FrameRGBA {
        &self.frame
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn template(&self) -> &TemplateDescriptor {
        &self.template
    }

    pub fn params(&self) -> &RenderParams {
        &self.params
    }

    pub fn set_background(&mut self, color: Rgba8) -> AdrasterResult<()> {
        self.params = RenderParams {
            background: color,
            ..self.params.clone()
        };
        self.repaint()
    }

    pub fn set_caption_text(&mut self, text: impl Into<String>) -> AdrasterResult<()> {
        self.params = RenderParams {
            caption_text: text.into(),
            ..self.params.clone()
        };
        self.repaint()
    }

    pub fn set_cta_text(&mut self, text: impl Into<String>) -> AdrasterResult<()> {
        self.params = RenderParams {
            cta_text: text.into(),
            ..self.params.clone()
        };
        self.repaint()
    }

    /// Begin a photo load. Any earlier in-flight photo load is superseded:
    /// its eventual completion will be discarded.
    pub fn begin_image_load(&mut self) -> LoadToken {
        self.image_token += 1;
        self.image_pending = true;
        self.refresh_state();
        LoadToken(self.image_token)
    }

    /// Complete a photo load with the loader's result.
    ///
    /// A stale token is silently dropped. A decode failure keeps the prior
    /// photo (or none) and the previous good frame; the error comes back as
    /// a value.
    pub fn complete_image_load(
        &mut self,
        token: LoadToken,
        result: AdrasterResult<PreparedImage>,
    ) -> AdrasterResult<LoadReport> {
        if token.0 != self.image_token {
            tracing::debug!(
                token = token.0,
                current = self.image_token,
                "stale image load dropped"
            );
            return Ok(LoadReport::Superseded);
        }
        self.image_pending = false;

        match result {
            Ok(img) => {
                self.image = Some(img);
                self.repaint()?;
                self.refresh_state();
                Ok(LoadReport::Applied)
            }
            Err(e) => {
                self.refresh_state();
                Ok(LoadReport::Failed(e))
            }
        }
    }

    /// Begin the mask/stroke overlay load for a mask-crop template.
    ///
    /// On a template without a mask-crop photo mode the token still advances
    /// but nothing is marked pending: the compositor never reads overlays
    /// there, so the load is inert and the session stays `Ready`.
    pub fn begin_overlay_load(&mut self) -> LoadToken {
        self.overlay_token += 1;
        self.overlays_pending = self.template.image.is_mask_crop();
        self.refresh_state();
        LoadToken(self.overlay_token)
    }

    /// Complete an overlay load.
    ///
    /// On failure the photo keeps rendering unmasked (the documented
    /// fallback); the repaint is never skipped and the error comes back as a
    /// value alongside the fallback frame.
    pub fn complete_overlay_load(
        &mut self,
        token: LoadToken,
        result: AdrasterResult<OverlayImages>,
    ) -> AdrasterResult<LoadReport> {
        if token.0 != self.overlay_token {
            tracing::debug!(
                token = token.0,
                current = self.overlay_token,
                "stale overlay load dropped"
            );
            return Ok(LoadReport::Superseded);
        }
        self.overlays_pending = false;

        match result {
            Ok(ov) => {
                self.overlays = Some(ov);
                self.repaint()?;
                self.refresh_state();
                Ok(LoadReport::Applied)
            }
            Err(e) => {
                self.overlays = None;
                self.repaint()?;
                self.refresh_state();
                Ok(LoadReport::Failed(e))
            }
        }
    }

    /// Recompute the layout from the current snapshot and repaint the frame.
    #[tracing::instrument(skip(self))]
    fn repaint(&mut self) -> AdrasterResult<()> {
        let plan = self.solve_layout()?;
        self.frame = self.compositor.paint(
            &self.template,
            &self.params,
            self.image.as_ref(),
            self.overlays.as_ref(),
            &plan,
        )?;
        Ok(())
    }

    fn solve_layout(&mut self) -> AdrasterResult<LayoutPlan> {
        let Self {
            template,
            params,
            image,
            compositor,
            ..
        } = self;
        let size = template.caption.font_size_px;
        solver::solve(
            template,
            &params.caption_text,
            image.as_ref().map(|i| (i.width, i.height)),
            |s: &str| compositor.measure_px(s, size),
        )
    }

    fn refresh_state(&mut self) {
        self.state = if self.image_pending {
            SessionState::AwaitingImage
        } else if self.overlays_pending && self.template.image.is_mask_crop() {
            SessionState::AwaitingMaskAssets
        } else {
            SessionState::Ready
        };
    }
}

#[cfg(test)]
#[path = "../tests/unit/session.rs"]
mod tests;
