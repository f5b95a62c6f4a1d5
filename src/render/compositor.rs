use std::{collections::HashMap, sync::Arc};

use crate::{
    assets::decode::Bitmap,
    assets::font::{LabelFont, LabelLayout, TextLayoutEngine, estimate_text_width},
    config::CompareSettings,
    foundation::core::{Canvas, Rect},
    foundation::error::{CompareError, CompareResult},
    geometry::divider::{DividerGeometry, DividerState},
    geometry::viewport::AspectRatio,
    model::slot::{ImageSlot, SlotSide},
    render::label::{LabelPanel, LabelText, draw_label, draw_shadow},
    render::raster::{
        Region, affine_to_cpu, bezpath_to_cpu, line_path, paint_region, rect_to_cpu,
    },
    render::surface::{OutputSurface, cpu_dims},
};

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
/// What a composite pass drew.
pub struct CompositeReport {
    /// Output size.
    pub canvas: Canvas,
    /// Seam geometry for the ratio that was drawn.
    pub divider: DividerGeometry,
    /// True when the "before" layer contributed pixels.
    pub before_drawn: bool,
    /// True when the "after" layer contributed pixels.
    pub after_drawn: bool,
    /// Label panels, before first; empty when nothing was composed.
    pub labels: Vec<LabelPanel>,
    /// False when labels were drawn without text for lack of a font.
    pub text_rendered: bool,
}

impl CompositeReport {
    /// True when neither slot had a bitmap and the surface was left empty.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

struct CachedImage {
    bytes: Arc<Vec<u8>>,
    paint: vello_cpu::Image,
}

/// Renders the slanted before/after comparison into an [`OutputSurface`].
///
/// Holds no reference to the inputs between passes; each call redraws the whole surface
/// from the slots and divider it is given.
pub struct Compositor {
    settings: CompareSettings,
    font: Option<(LabelFont, vello_cpu::peniko::FontData)>,
    text: TextLayoutEngine,
    images: HashMap<SlotSide, CachedImage>,
}

impl std::fmt::Debug for Compositor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Compositor")
            .field("settings", &self.settings)
            .field("font", &self.font.as_ref().map(|(f, _)| f))
            .finish()
    }
}

impl Compositor {
    /// Build a compositor. Without a font, labels keep their panels but skip the text.
    pub fn new(settings: CompareSettings, font: Option<LabelFont>) -> Self {
        if font.is_none() {
            tracing::warn!("no label font available; labels will render without text");
        }
        Self {
            settings,
            font: font.map(|f| {
                let cpu = f.to_cpu();
                (f, cpu)
            }),
            text: TextLayoutEngine::new(),
            images: HashMap::new(),
        }
    }

    /// Build a compositor, resolving the font from `settings.font`.
    pub fn from_settings(settings: CompareSettings) -> CompareResult<Self> {
        settings.validate()?;
        let font = settings.font.resolve()?;
        Ok(Self::new(settings, font))
    }

    /// Active settings.
    pub fn settings(&self) -> &CompareSettings {
        &self.settings
    }

    /// Redraw `surface` from both slots and the divider.
    ///
    /// Empty slots are skipped silently; with both empty the surface is only cleared.
    #[tracing::instrument(skip_all, fields(ratio = divider.ratio()))]
    pub fn compose(
        &mut self,
        before: &ImageSlot,
        after: &ImageSlot,
        divider: &DividerState,
        surface: &mut OutputSurface,
    ) -> CompareResult<CompositeReport> {
        let canvas = surface.canvas();
        let geometry = DividerGeometry::new(canvas, divider.ratio(), self.settings.slant_offset);
        surface.clear();

        let mut report = CompositeReport {
            canvas,
            divider: geometry,
            before_drawn: false,
            after_drawn: false,
            labels: Vec::new(),
            text_rendered: false,
        };
        if !before.is_loaded() && !after.is_loaded() {
            tracing::debug!("both slots empty; surface left blank");
            return Ok(report);
        }

        self.draw_layers(before, after, &geometry, surface, &mut report)?;
        self.draw_seam(&geometry, surface)?;
        self.draw_labels(&geometry, surface, &mut report)?;

        tracing::debug!(
            before = report.before_drawn,
            after = report.after_drawn,
            "composite pass finished"
        );
        Ok(report)
    }

    /// Background layer over the full canvas, then the clipped "after" layer.
    fn draw_layers(
        &mut self,
        before: &ImageSlot,
        after: &ImageSlot,
        geometry: &DividerGeometry,
        surface: &mut OutputSurface,
        report: &mut CompositeReport,
    ) -> CompareResult<()> {
        let canvas = surface.canvas();
        let (w, h) = cpu_dims(canvas)?;
        let mut ctx = vello_cpu::RenderContext::new(w, h);

        report.before_drawn = self.draw_layer(&mut ctx, SlotSide::Before, before, canvas)?;

        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.push_clip_layer(&bezpath_to_cpu(&geometry.clip_path()));
        report.after_drawn = self.draw_layer(&mut ctx, SlotSide::After, after, canvas)?;
        ctx.pop_layer();

        ctx.flush();
        ctx.render_to_pixmap(surface.pixmap_mut());
        Ok(())
    }

    fn draw_layer(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        side: SlotSide,
        slot: &ImageSlot,
        canvas: Canvas,
    ) -> CompareResult<bool> {
        let Some(bitmap) = slot.bitmap() else {
            return Ok(false);
        };
        let Some(placement) = slot
            .source_rect(AspectRatio::from(canvas))
            .and_then(|src| src.placement(bitmap.width, bitmap.height, canvas))
        else {
            return Ok(false);
        };

        let paint = self.image_paint(side, bitmap)?;
        ctx.set_transform(affine_to_cpu(placement.transform()));
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint(paint);
        ctx.fill_rect(&rect_to_cpu(placement.src));
        Ok(true)
    }

    /// Image paint for `bitmap`, reused while the slot keeps the same pixel buffer.
    fn image_paint(&mut self, side: SlotSide, bitmap: &Bitmap) -> CompareResult<vello_cpu::Image> {
        if let Some(cached) = self.images.get(&side)
            && Arc::ptr_eq(&cached.bytes, &bitmap.rgba8_premul)
        {
            return Ok(cached.paint.clone());
        }
        let paint = bitmap_to_image(bitmap)?;
        self.images.insert(
            side,
            CachedImage {
                bytes: Arc::clone(&bitmap.rgba8_premul),
                paint: paint.clone(),
            },
        );
        Ok(paint)
    }

    fn draw_seam(&self, geometry: &DividerGeometry, surface: &mut OutputSurface) -> CompareResult<()> {
        let seam = self.settings.seam;
        let canvas = surface.canvas();
        let (top, bottom) = geometry.seam();
        let path = bezpath_to_cpu(&line_path(top, bottom));
        let half = seam.width / 2.0;
        let bounds = Rect::from_points(top, bottom).inflate(half, half);
        let stroke = vello_cpu::kurbo::Stroke::new(seam.width).with_caps(vello_cpu::kurbo::Cap::Round);

        let seam_alpha = f32::from(seam.color.a) / 255.0;
        draw_shadow(surface, canvas, bounds, seam.shadow, seam_alpha, |ctx, origin| {
            ctx.set_transform(origin);
            ctx.set_stroke(stroke.clone());
            ctx.stroke_path(&path);
        })?;

        let Some(region) = Region::around(bounds, 1.0, canvas) else {
            return Ok(());
        };
        paint_region(surface, region, |ctx, origin| {
            ctx.set_transform(origin);
            ctx.set_stroke(stroke.clone());
            ctx.set_paint(seam.color.to_cpu());
            ctx.stroke_path(&path);
            Ok(())
        })
    }

    fn draw_labels(
        &mut self,
        geometry: &DividerGeometry,
        surface: &mut OutputSurface,
        report: &mut CompositeReport,
    ) -> CompareResult<()> {
        let style = self.settings.labels.clone();
        let (before_at, after_at) = geometry.label_anchors(style.inset);

        let mut text_rendered = true;
        for (text, anchor) in [(&style.before_text, before_at), (&style.after_text, after_at)] {
            let layout = self.shape(text);
            let width = layout.as_ref().map_or_else(
                || f64::from(estimate_text_width(text, style.font_size)),
                |l| f64::from(l.width),
            );
            let panel = LabelPanel::around(text, anchor, width, &style);
            let label_text = match (&layout, &self.font) {
                (Some(layout), Some((_, font))) => Some(LabelText { layout, font }),
                _ => None,
            };
            text_rendered &= label_text.is_some();
            draw_label(surface, &panel, &style, label_text)?;
            report.labels.push(panel);
        }
        report.text_rendered = text_rendered;
        Ok(())
    }

    fn shape(&mut self, text: &str) -> Option<LabelLayout> {
        let (font, _) = self.font.as_ref()?;
        let style = &self.settings.labels;
        match self
            .text
            .layout_line(text, font, style.font_size, style.text_color)
        {
            Ok(layout) => Some(layout),
            Err(err) => {
                tracing::warn!(%err, text, "label shaping failed; drawing panel only");
                None
            }
        }
    }
}

/// Wrap premultiplied bitmap bytes as a `vello_cpu` image paint.
fn bitmap_to_image(bitmap: &Bitmap) -> CompareResult<vello_cpu::Image> {
    let w: u16 = bitmap
        .width
        .try_into()
        .map_err(|_| CompareError::render("bitmap width exceeds u16"))?;
    let h: u16 = bitmap
        .height
        .try_into()
        .map_err(|_| CompareError::render("bitmap height exceeds u16"))?;
    if bitmap.rgba8_premul.len() != usize::from(w) * usize::from(h) * 4 {
        return Err(CompareError::render("bitmap byte len mismatch"));
    }

    let pixels = bitmap
        .rgba8_premul
        .chunks_exact(4)
        .map(|px| vello_cpu::peniko::color::PremulRgba8::from_u8_array([px[0], px[1], px[2], px[3]]))
        .collect::<Vec<_>>();
    let opaque = bitmap.rgba8_premul.chunks_exact(4).all(|px| px[3] == 255);
    let pixmap = vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, !opaque);
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
