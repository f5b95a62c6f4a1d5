use kurbo::Shape;

use crate::{
    assets::font::LabelLayout,
    config::{LabelStyle, ShadowStyle},
    foundation::core::{Affine, Canvas, Point, Rect},
    foundation::error::CompareResult,
    render::blur::{kernel_radius, shadow_sigma},
    render::raster::{Region, affine_to_cpu, bezpath_to_cpu, paint_region, paint_shadow},
    render::surface::OutputSurface,
};

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
/// Placed label panel, in canvas pixels.
pub struct LabelPanel {
    /// Label text.
    pub text: String,
    /// Panel centre.
    pub anchor: Point,
    /// Measured (or estimated) text advance.
    pub text_width: f64,
    /// Panel bounds.
    pub rect: Rect,
}

impl LabelPanel {
    /// Panel of `text_width + 2 * padding_x` by `panel_height`, centred on `anchor`.
    pub fn around(text: &str, anchor: Point, text_width: f64, style: &LabelStyle) -> Self {
        let w = text_width.max(0.0) + 2.0 * style.padding_x;
        let h = style.panel_height;
        Self {
            text: text.to_string(),
            anchor,
            text_width,
            rect: Rect::new(
                anchor.x - w / 2.0,
                anchor.y - h / 2.0,
                anchor.x + w / 2.0,
                anchor.y + h / 2.0,
            ),
        }
    }

    fn shape(&self, style: &LabelStyle) -> vello_cpu::kurbo::BezPath {
        let rr = kurbo::RoundedRect::from_rect(self.rect, style.corner_radius);
        bezpath_to_cpu(&rr.to_path(0.1))
    }
}

/// Shaped text plus the font it was shaped with.
pub(crate) struct LabelText<'a> {
    pub layout: &'a LabelLayout,
    pub font: &'a vello_cpu::peniko::FontData,
}

/// Draw one glass label: panel shadow, panel, border, text shadow, text.
pub(crate) fn draw_label(
    surface: &mut OutputSurface,
    panel: &LabelPanel,
    style: &LabelStyle,
    text: Option<LabelText<'_>>,
) -> CompareResult<()> {
    let canvas = surface.canvas();
    let shape = panel.shape(style);

    // Canvas shadows inherit the alpha of the fill that casts them.
    let panel_alpha = f32::from(style.panel_fill.a) / 255.0;
    draw_shadow(surface, canvas, panel.rect, style.panel_shadow, panel_alpha, |ctx, origin| {
        ctx.set_transform(origin);
        ctx.fill_path(&shape);
    })?;

    let border = style.border_width;
    if let Some(region) = Region::around(panel.rect, border + 1.0, canvas) {
        paint_region(surface, region, |ctx, origin| {
            ctx.set_transform(origin);
            ctx.set_paint(style.panel_fill.to_cpu());
            ctx.fill_path(&shape);
            if border > 0.0 {
                ctx.set_stroke(vello_cpu::kurbo::Stroke::new(border));
                ctx.set_paint(style.border_color.to_cpu());
                ctx.stroke_path(&shape);
            }
            Ok(())
        })?;
    }

    let Some(text) = text else {
        return Ok(());
    };
    let origin = Point::new(
        panel.anchor.x - f64::from(text.layout.width) / 2.0,
        panel.anchor.y - f64::from(text.layout.height) / 2.0,
    );
    let bounds = Rect::from_origin_size(
        origin,
        (
            f64::from(text.layout.width),
            f64::from(text.layout.height),
        ),
    );
    let to_text = Affine::translate(origin.to_vec2());
    let text_alpha = f32::from(style.text_color.a) / 255.0;

    draw_shadow(surface, canvas, bounds, style.text_shadow, text_alpha, |ctx, origin| {
        ctx.set_transform(origin * affine_to_cpu(to_text));
        fill_text(ctx, &text);
    })?;

    if let Some(region) = Region::around(bounds, 2.0, canvas) {
        paint_region(surface, region, |ctx, origin| {
            ctx.set_transform(origin * affine_to_cpu(to_text));
            ctx.set_paint(style.text_color.to_cpu());
            fill_text(ctx, &text);
            Ok(())
        })?;
    }
    Ok(())
}

/// Render `draw` in the shadow colour and blur it. Shadows have no offset.
///
/// `draw` receives the canvas-to-region transform; the paint is already set.
pub(crate) fn draw_shadow(
    surface: &mut OutputSurface,
    canvas: Canvas,
    bounds: Rect,
    shadow: ShadowStyle,
    caster_alpha: f32,
    draw: impl FnOnce(&mut vello_cpu::RenderContext, vello_cpu::kurbo::Affine),
) -> CompareResult<()> {
    let color = shadow.color.with_alpha_scaled(caster_alpha);
    if color.a == 0 {
        return Ok(());
    }
    let sigma = shadow_sigma(shadow.blur);
    let margin = kernel_radius(sigma) as f64 + 1.0;
    let Some(region) = Region::around(bounds, margin, canvas) else {
        return Ok(());
    };
    paint_shadow(surface, region, sigma, |ctx, origin| {
        ctx.set_paint(color.to_cpu());
        draw(ctx, origin);
        Ok(())
    })
}

/// Fill every glyph run of `text` with the current paint.
fn fill_text(ctx: &mut vello_cpu::RenderContext, text: &LabelText<'_>) {
    for line in text.layout.layout.lines() {
        for item in line.items() {
            let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                continue;
            };

            let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                id: g.id,
                x: g.x,
                y: g.y,
            });
            ctx.glyph_run(text.font)
                .font_size(run.run().font_size())
                .fill_glyphs(glyphs);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/label.rs"]
mod tests;
