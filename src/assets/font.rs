use std::{path::Path, sync::Arc};

use anyhow::Context;

use crate::{
    foundation::core::Rgba8,
    foundation::error::{CompareError, CompareResult},
};

#[derive(Clone)]
/// Font face used for the "Before"/"After" labels.
pub struct LabelFont {
    /// Raw font file bytes (TTF/OTF/TTC).
    pub bytes: Arc<Vec<u8>>,
    /// Face index inside a collection; 0 for single-face files.
    pub index: u32,
}

impl std::fmt::Debug for LabelFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LabelFont")
            .field("bytes_len", &self.bytes.len())
            .field("index", &self.index)
            .finish()
    }
}

impl LabelFont {
    /// Wrap font bytes already in memory.
    pub fn from_bytes(bytes: Vec<u8>) -> CompareResult<Self> {
        if bytes.is_empty() {
            return Err(CompareError::validation("font bytes must be non-empty"));
        }
        Ok(Self {
            bytes: Arc::new(bytes),
            index: 0,
        })
    }

    /// Load a font file from disk.
    pub fn from_path(path: impl AsRef<Path>) -> CompareResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .with_context(|| format!("read font bytes from '{}'", path.display()))?;
        Self::from_bytes(bytes)
    }

    /// Look up an installed font, trying `families` first and generic sans-serif last.
    ///
    /// Returns `None` on hosts without any usable system font.
    pub fn from_system(families: &[String], weight: u16) -> Option<Self> {
        let mut db = usvg::fontdb::Database::new();
        db.load_system_fonts();

        let mut query_families = families
            .iter()
            .map(|f| usvg::fontdb::Family::Name(f.as_str()))
            .collect::<Vec<_>>();
        query_families.push(usvg::fontdb::Family::SansSerif);

        let query = usvg::fontdb::Query {
            families: &query_families,
            weight: usvg::fontdb::Weight(weight),
            stretch: usvg::fontdb::Stretch::Normal,
            style: usvg::fontdb::Style::Normal,
        };
        let id = db.query(&query).or_else(|| db.faces().next().map(|f| f.id))?;
        db.with_face_data(id, |data, index| Self {
            bytes: Arc::new(data.to_vec()),
            index,
        })
    }

    pub(crate) fn to_cpu(&self) -> vello_cpu::peniko::FontData {
        vello_cpu::peniko::FontData::new(
            vello_cpu::peniko::Blob::from(self.bytes.as_ref().clone()),
            self.index,
        )
    }
}

/// Shaped single-line label text.
pub struct LabelLayout {
    /// Parley layout ready for glyph rendering.
    pub layout: parley::Layout<Rgba8>,
    /// Advance width of the line in pixels.
    pub width: f32,
    /// Line box height in pixels.
    pub height: f32,
}

/// Stateful helper for building Parley text layouts from raw font bytes.
pub struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<Rgba8>,
    family_name: Option<String>,
}

impl Default for TextLayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TextLayoutEngine {
    /// Construct a new layout engine with fresh Parley contexts.
    pub fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            family_name: None,
        }
    }

    /// Register `font` and return its family name. Registration happens once per engine.
    fn family_for(&mut self, font: &LabelFont) -> CompareResult<String> {
        if let Some(name) = &self.family_name {
            return Ok(name.clone());
        }
        let families = self.font_ctx.collection.register_fonts(
            parley::fontique::Blob::from(font.bytes.as_ref().clone()),
            None,
        );
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            CompareError::validation("no font families registered from font bytes")
        })?;
        let name = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| CompareError::validation("registered font family has no name"))?
            .to_string();
        self.family_name = Some(name.clone());
        Ok(name)
    }

    /// Shape `text` on a single line.
    pub fn layout_line(
        &mut self,
        text: &str,
        font: &LabelFont,
        size_px: f32,
        brush: Rgba8,
    ) -> CompareResult<LabelLayout> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(CompareError::validation(
                "label font size must be finite and > 0",
            ));
        }

        let family_name = self.family_for(font)?;
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family_name)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<Rgba8> = builder.build(text);
        layout.break_all_lines(None);

        let width = layout.width();
        let height = layout.height();
        Ok(LabelLayout {
            layout,
            width,
            height,
        })
    }
}

/// Width estimate used when no font is available (roughly a heavy sans at `size_px`).
pub fn estimate_text_width(text: &str, size_px: f32) -> f32 {
    text.chars().count() as f32 * size_px * 0.6
}

#[cfg(test)]
#[path = "../../tests/unit/assets/font.rs"]
mod tests;
