//! Event-driven owner of all mutable comparison state.
//!
//! The controller is the only writer of slot pans and the divider; the compositor reads them
//! on each pass. Pointer moves and releases are routed to whichever gesture is active, not to
//! the element under the pointer.

use std::path::{Path, PathBuf};

use crate::{
    assets::decode::Bitmap,
    config::CompareSettings,
    export::encode::{ExportSettings, write_export},
    foundation::error::CompareResult,
    geometry::divider::DividerState,
    geometry::viewport::Viewport,
    interaction::divider_drag::{DividerDrag, SurfaceLayout},
    interaction::pan::PanGesture,
    model::slot::{ImageSlot, SlotSide},
    render::compositor::{CompositeReport, Compositor},
    render::surface::OutputSurface,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Element a pointer press lands on.
pub enum PointerTarget {
    /// Crop viewport of one slot.
    Slot(SlotSide),
    /// The generated comparison image.
    Output,
}

#[derive(Clone, Copy, Debug, PartialEq)]
/// Pointer input in UI coordinates. Only `Down` is tied to a target.
pub enum PointerEvent {
    /// Press over `target`.
    Down {
        /// Element pressed.
        target: PointerTarget,
        /// Pointer x.
        x: f64,
        /// Pointer y.
        y: f64,
    },
    /// Move anywhere.
    Move {
        /// Pointer x.
        x: f64,
        /// Pointer y.
        y: f64,
    },
    /// Release anywhere.
    Up,
}

#[derive(Clone, Debug, PartialEq)]
/// What handling an event changed.
pub enum Response {
    /// Nothing to update.
    Ignored,
    /// A slot pan moved; the crop view should follow.
    PanMoved {
        /// Slot that moved.
        side: SlotSide,
        /// New clamped offset.
        offset: f64,
    },
    /// The output surface was redrawn.
    Recomposed(CompositeReport),
    /// A gesture finished.
    GestureEnded,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
enum ActiveGesture {
    #[default]
    None,
    Pan(SlotSide),
    Divider,
}

/// Headless interaction controller for one before/after comparison.
#[derive(Debug)]
pub struct Controller {
    before: ImageSlot,
    after: ImageSlot,
    divider: DividerState,
    pan: PanGesture,
    active: ActiveGesture,
    layout: SurfaceLayout,
    result_visible: bool,
    compositor: Compositor,
    surface: OutputSurface,
}

impl Controller {
    /// Controller around `compositor`, with empty slots using the default viewport.
    pub fn new(compositor: Compositor) -> CompareResult<Self> {
        let canvas = compositor.settings().canvas;
        Ok(Self {
            before: ImageSlot::new(Viewport::default()),
            after: ImageSlot::new(Viewport::default()),
            divider: DividerState::default(),
            pan: PanGesture::default(),
            active: ActiveGesture::None,
            layout: SurfaceLayout::identity(canvas.width),
            result_visible: false,
            compositor,
            surface: OutputSurface::new(canvas)?,
        })
    }

    /// Controller with a compositor built from `settings` (font resolved from them).
    pub fn from_settings(settings: CompareSettings) -> CompareResult<Self> {
        Self::new(Compositor::from_settings(settings)?)
    }

    /// Slot state for `side`.
    pub fn slot(&self, side: SlotSide) -> &ImageSlot {
        match side {
            SlotSide::Before => &self.before,
            SlotSide::After => &self.after,
        }
    }

    fn slot_mut(&mut self, side: SlotSide) -> &mut ImageSlot {
        match side {
            SlotSide::Before => &mut self.before,
            SlotSide::After => &mut self.after,
        }
    }

    /// Divider state.
    pub fn divider(&self) -> &DividerState {
        &self.divider
    }

    /// Install a decoded bitmap in `side`; its pan resets to the top.
    pub fn load(&mut self, side: SlotSide, bitmap: Bitmap) {
        tracing::debug!(%side, width = bitmap.width, height = bitmap.height, "slot loaded");
        if self.active == ActiveGesture::Pan(side) {
            self.pan.end();
            self.active = ActiveGesture::None;
        }
        self.slot_mut(side).load(bitmap);
    }

    /// Record the crop viewport geometry of `side`.
    pub fn set_viewport(&mut self, side: SlotSide, viewport: Viewport) {
        self.slot_mut(side).set_viewport(viewport);
    }

    /// Record where the output surface is displayed.
    pub fn set_surface_layout(&mut self, layout: SurfaceLayout) {
        self.layout = layout;
    }

    /// Set the pan of `side` directly (clamped). Returns the stored offset.
    pub fn set_pan(&mut self, side: SlotSide, offset: f64) -> f64 {
        self.slot_mut(side).set_pan_offset(offset)
    }

    /// Set the divider directly (clamped, NaN ignored). Does not recompose.
    pub fn set_divider(&mut self, ratio: f64) -> f64 {
        self.divider.set_ratio(ratio)
    }

    /// True once both slots hold a bitmap.
    pub fn can_generate(&self) -> bool {
        self.before.is_loaded() && self.after.is_loaded()
    }

    /// Reset the divider to centre, reveal the result and compose once.
    ///
    /// Returns `Ok(None)` without side effects until both slots are loaded.
    #[tracing::instrument(skip(self))]
    pub fn generate(&mut self) -> CompareResult<Option<CompositeReport>> {
        if !self.can_generate() {
            tracing::debug!("generate ignored; a slot is still empty");
            return Ok(None);
        }
        self.divider.reset();
        self.result_visible = true;
        self.recompose().map(Some)
    }

    /// True once a generation has happened.
    pub fn result_visible(&self) -> bool {
        self.result_visible
    }

    /// Redraw the output from the current state.
    pub fn recompose(&mut self) -> CompareResult<CompositeReport> {
        self.compositor
            .compose(&self.before, &self.after, &self.divider, &mut self.surface)
    }

    /// Route one pointer event.
    pub fn handle(&mut self, event: PointerEvent) -> CompareResult<Response> {
        match event {
            PointerEvent::Down {
                target: PointerTarget::Slot(side),
                y,
                ..
            } => {
                if self.active != ActiveGesture::None {
                    return Ok(Response::Ignored);
                }
                let slot = match side {
                    SlotSide::Before => &self.before,
                    SlotSide::After => &self.after,
                };
                if self.pan.start(slot, y) {
                    tracing::debug!(%side, y, "pan started");
                    self.active = ActiveGesture::Pan(side);
                }
                Ok(Response::Ignored)
            }
            PointerEvent::Down {
                target: PointerTarget::Output,
                x,
                ..
            } => {
                if self.active != ActiveGesture::None {
                    return Ok(Response::Ignored);
                }
                self.active = ActiveGesture::Divider;
                let width = self.surface.canvas().width;
                DividerDrag::start(&mut self.divider, x, self.layout, width);
                self.recompose().map(Response::Recomposed)
            }
            PointerEvent::Move { x, y } => match self.active {
                ActiveGesture::None => Ok(Response::Ignored),
                ActiveGesture::Pan(side) => {
                    let pan = self.pan;
                    match pan.update(self.slot_mut(side), y) {
                        Some(offset) => Ok(Response::PanMoved { side, offset }),
                        None => Ok(Response::Ignored),
                    }
                }
                ActiveGesture::Divider => {
                    let width = self.surface.canvas().width;
                    if DividerDrag::update(&mut self.divider, x, self.layout, width).is_none() {
                        return Ok(Response::Ignored);
                    }
                    self.recompose().map(Response::Recomposed)
                }
            },
            PointerEvent::Up => {
                let ended = match std::mem::take(&mut self.active) {
                    ActiveGesture::None => false,
                    ActiveGesture::Pan(side) => {
                        tracing::debug!(%side, "pan ended");
                        self.pan.end()
                    }
                    ActiveGesture::Divider => DividerDrag::end(&mut self.divider),
                };
                Ok(if ended {
                    Response::GestureEnded
                } else {
                    Response::Ignored
                })
            }
        }
    }

    /// The output surface.
    pub fn surface(&self) -> &OutputSurface {
        &self.surface
    }

    /// Encode the current output into `dir`; returns the written path.
    pub fn export(&self, settings: &ExportSettings, dir: &Path) -> CompareResult<PathBuf> {
        write_export(&self.surface.frame(), settings, dir)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/interaction/controller.rs"]
mod tests;
