//! Scratch-region rendering on top of `vello_cpu`.
//!
//! `vello_cpu` renders into a fresh pixmap, so every decoration pass (seam, label panels,
//! text) draws into a pixmap sized to its bounding region and is then composited over the
//! output surface. Shadows reuse the same path with a Gaussian blur in between.

use crate::{
    foundation::core::{Affine, BezPath, Canvas, Point, Rect},
    foundation::error::CompareResult,
    render::blend::{BufferSize, over_at},
    render::blur::{blur_rgba8_premul, kernel_radius},
    render::surface::{OutputSurface, cpu_dims},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Integer pixel box inside a canvas.
pub struct Region {
    /// Left edge in canvas pixels.
    pub x: i64,
    /// Top edge in canvas pixels.
    pub y: i64,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Region {
    /// Smallest pixel box containing `rect` grown by `margin`, clipped to `canvas`.
    pub fn around(rect: Rect, margin: f64, canvas: Canvas) -> Option<Self> {
        let grown = rect.inflate(margin.max(0.0), margin.max(0.0));
        let x0 = grown.x0.floor().max(0.0);
        let y0 = grown.y0.floor().max(0.0);
        let x1 = grown.x1.ceil().min(f64::from(canvas.width));
        let y1 = grown.y1.ceil().min(f64::from(canvas.height));
        if !(x1 > x0 && y1 > y0) {
            return None;
        }
        Some(Self {
            x: x0 as i64,
            y: y0 as i64,
            width: (x1 - x0) as u32,
            height: (y1 - y0) as u32,
        })
    }

    /// Transform from canvas space into this region's scratch pixmap.
    pub fn origin(&self) -> vello_cpu::kurbo::Affine {
        vello_cpu::kurbo::Affine::translate((-(self.x as f64), -(self.y as f64)))
    }

    fn size(&self) -> BufferSize {
        BufferSize {
            width: self.width,
            height: self.height,
        }
    }
}

/// Draw into a scratch pixmap covering `region` and composite it over `surface`.
///
/// The closure receives the region origin transform; canvas-space drawing must be
/// pre-multiplied by it.
pub fn paint_region(
    surface: &mut OutputSurface,
    region: Region,
    draw: impl FnOnce(&mut vello_cpu::RenderContext, vello_cpu::kurbo::Affine) -> CompareResult<()>,
) -> CompareResult<()> {
    let pixmap = render_region(region, draw)?;
    composite_region(surface, region, pixmap.data_as_u8_slice())
}

/// Like [`paint_region`], with the scratch pixmap blurred by `sigma` before compositing.
pub fn paint_shadow(
    surface: &mut OutputSurface,
    region: Region,
    sigma: f32,
    draw: impl FnOnce(&mut vello_cpu::RenderContext, vello_cpu::kurbo::Affine) -> CompareResult<()>,
) -> CompareResult<()> {
    let pixmap = render_region(region, draw)?;
    let radius = kernel_radius(sigma);
    if radius == 0 {
        return composite_region(surface, region, pixmap.data_as_u8_slice());
    }
    let blurred = blur_rgba8_premul(
        pixmap.data_as_u8_slice(),
        region.width,
        region.height,
        radius,
        sigma,
    )?;
    composite_region(surface, region, &blurred)
}

fn render_region(
    region: Region,
    draw: impl FnOnce(&mut vello_cpu::RenderContext, vello_cpu::kurbo::Affine) -> CompareResult<()>,
) -> CompareResult<vello_cpu::Pixmap> {
    let (w, h) = cpu_dims(Canvas::new(region.width, region.height))?;
    let mut ctx = vello_cpu::RenderContext::new(w, h);
    let mut pixmap = vello_cpu::Pixmap::new(w, h);
    draw(&mut ctx, region.origin())?;
    ctx.flush();
    ctx.render_to_pixmap(&mut pixmap);
    Ok(pixmap)
}

fn composite_region(surface: &mut OutputSurface, region: Region, src: &[u8]) -> CompareResult<()> {
    let canvas = surface.canvas();
    over_at(
        surface.data_mut(),
        BufferSize {
            width: canvas.width,
            height: canvas.height,
        },
        src,
        region.size(),
        region.x,
        region.y,
    )
}

pub(crate) fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

pub(crate) fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

pub(crate) fn rect_to_cpu(r: Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

pub(crate) fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

/// Two-point open path.
pub(crate) fn line_path(a: Point, b: Point) -> BezPath {
    let mut p = BezPath::new();
    p.move_to(a);
    p.line_to(b);
    p
}

#[cfg(test)]
#[path = "../../tests/unit/render/raster.rs"]
mod tests;
