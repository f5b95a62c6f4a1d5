//! Mapping from an on-screen, vertically panned crop view to a source rectangle in bitmap
//! pixel space.
//!
//! The image is displayed scaled to fill the viewport width, so one displayed pixel covers
//! `natural_width / display_width` natural pixels. The sampled rectangle always has the
//! output aspect ratio and spans the full bitmap width; only vertical pan is supported.

use crate::foundation::core::{Canvas, Rect};

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Target aspect ratio `w:h`.
pub struct AspectRatio {
    /// Horizontal term.
    pub w: f64,
    /// Vertical term.
    pub h: f64,
}

impl AspectRatio {
    /// Construct an aspect ratio.
    pub fn new(w: f64, h: f64) -> Self {
        Self { w, h }
    }

    /// `w / h`, or `None` when either term is non-positive or non-finite.
    pub fn value(self) -> Option<f64> {
        let v = self.w / self.h;
        (self.w > 0.0 && self.h > 0.0 && v.is_finite()).then_some(v)
    }
}

impl From<Canvas> for AspectRatio {
    fn from(c: Canvas) -> Self {
        Self::new(f64::from(c.width), f64::from(c.height))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Displayed crop viewport of one image slot, as measured by the UI layer.
pub struct Viewport {
    /// Width at which the image is rendered (image is scaled to fill this width).
    pub display_width: f64,
    /// Visible height of the viewport.
    pub height: f64,
}

impl Viewport {
    /// Construct a viewport.
    pub fn new(display_width: f64, height: f64) -> Self {
        Self {
            display_width,
            height,
        }
    }
}

impl Default for Viewport {
    /// A viewport that shows the image at output resolution with a 3:2 window.
    fn default() -> Self {
        Self::new(1500.0, 1000.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
/// Source sampling rectangle in natural bitmap pixels.
pub struct SourceRect {
    /// Left edge (always 0).
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width (always the bitmap's natural width).
    pub width: f64,
    /// Height derived from the target aspect ratio; may exceed the bitmap height.
    pub height: f64,
    /// Natural pixels per displayed pixel.
    pub ratio: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
/// Portion of a [`SourceRect`] that actually exists in the bitmap, and where it lands.
pub struct Placement {
    /// Sampled area, intersected with the bitmap bounds.
    pub src: Rect,
    /// Destination area on the output, shrunk by the same proportion.
    pub dest: Rect,
}

/// Map a panned view to a source rectangle.
///
/// Returns `None` only for degenerate inputs: an empty bitmap, a non-positive or non-finite
/// display width, or an unusable aspect ratio.
pub fn map_view_to_source(
    natural_width: u32,
    natural_height: u32,
    display_width: f64,
    pan_offset: f64,
    aspect: AspectRatio,
) -> Option<SourceRect> {
    if natural_width == 0 || natural_height == 0 {
        return None;
    }
    if !display_width.is_finite() || display_width <= 0.0 {
        return None;
    }
    let aspect = aspect.value()?;

    let natural_width = f64::from(natural_width);
    let ratio = natural_width / display_width;
    let pan = if pan_offset.is_finite() { pan_offset } else { 0.0 };

    Some(SourceRect {
        x: 0.0,
        y: pan.abs() * ratio,
        width: natural_width,
        height: natural_width / aspect,
        ratio,
    })
}

/// Height of the image as displayed when scaled to fill `display_width`.
pub fn displayed_height(natural_width: u32, natural_height: u32, display_width: f64) -> f64 {
    if natural_width == 0 || !display_width.is_finite() || display_width <= 0.0 {
        return 0.0;
    }
    f64::from(natural_height) * display_width / f64::from(natural_width)
}

impl SourceRect {
    /// Requested rectangle as a [`Rect`].
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }

    /// Clip the sampled area to the bitmap and scale the destination with it.
    ///
    /// Mirrors the 2D canvas `drawImage` contract: source pixels outside the bitmap are never
    /// invented, so the destination shrinks proportionally and the remainder of `dest` is left
    /// untouched. Returns `None` when nothing of the bitmap is inside the rectangle.
    pub fn placement(&self, natural_width: u32, natural_height: u32, dest: Canvas) -> Option<Placement> {
        if self.width <= 0.0 || self.height <= 0.0 || dest.is_empty() {
            return None;
        }
        let bounds = Rect::new(0.0, 0.0, f64::from(natural_width), f64::from(natural_height));
        let src = self.rect().intersect(bounds);
        if src.width() <= 0.0 || src.height() <= 0.0 {
            return None;
        }

        let sx = f64::from(dest.width) / self.width;
        let sy = f64::from(dest.height) / self.height;
        let dest = Rect::new(
            (src.x0 - self.x) * sx,
            (src.y0 - self.y) * sy,
            (src.x1 - self.x) * sx,
            (src.y1 - self.y) * sy,
        );
        Some(Placement { src, dest })
    }
}

impl Placement {
    /// Affine transform mapping bitmap pixel space onto the destination.
    pub fn transform(&self) -> kurbo::Affine {
        let sx = self.dest.width() / self.src.width();
        let sy = self.dest.height() / self.src.height();
        kurbo::Affine::translate((self.dest.x0, self.dest.y0))
            * kurbo::Affine::scale_non_uniform(sx, sy)
            * kurbo::Affine::translate((-self.src.x0, -self.src.y0))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/viewport.rs"]
mod tests;
