//! Serializable settings for the compositor and export.
//!
//! Every field has a default equal to the fixed constants of the comparison layout, so an
//! empty JSON object is a valid configuration.

use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::{
    assets::font::LabelFont,
    export::encode::ExportSettings,
    foundation::core::{Canvas, Rgba8},
    foundation::error::{CompareError, CompareResult},
    geometry::divider::SLANT_OFFSET,
};

/// Environment variable naming a font file for the labels.
pub const FONT_ENV: &str = "SLASH_COMPARE_FONT";

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Drop shadow in 2D-canvas terms: a colour plus a `shadowBlur` amount.
pub struct ShadowStyle {
    /// Shadow colour (alpha included).
    pub color: Rgba8,
    /// Canvas-style blur; the Gaussian sigma is half of this.
    pub blur: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Stroke drawn along the slanted divider.
pub struct SeamStyle {
    /// Stroke width in pixels.
    pub width: f64,
    /// Stroke colour.
    pub color: Rgba8,
    /// Halo behind the stroke.
    pub shadow: ShadowStyle,
}

impl Default for SeamStyle {
    fn default() -> Self {
        Self {
            width: 10.0,
            color: Rgba8::WHITE,
            shadow: ShadowStyle {
                color: Rgba8::black_alpha(0.5),
                blur: 20.0,
            },
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Frosted-glass label panels.
pub struct LabelStyle {
    /// Text of the left label.
    pub before_text: String,
    /// Text of the right label.
    pub after_text: String,
    /// Font size in pixels.
    pub font_size: f32,
    /// Distance from the bottom edge to the label centre.
    pub inset: f64,
    /// Horizontal padding on each side of the text.
    pub padding_x: f64,
    /// Panel height.
    pub panel_height: f64,
    /// Panel corner radius.
    pub corner_radius: f64,
    /// Panel fill.
    pub panel_fill: Rgba8,
    /// Panel shadow.
    pub panel_shadow: ShadowStyle,
    /// Panel border colour.
    pub border_color: Rgba8,
    /// Panel border width.
    pub border_width: f64,
    /// Text colour.
    pub text_color: Rgba8,
    /// Text shadow.
    pub text_shadow: ShadowStyle,
}

impl Default for LabelStyle {
    fn default() -> Self {
        Self {
            before_text: "Before".to_string(),
            after_text: "After".to_string(),
            font_size: 60.0,
            inset: 100.0,
            padding_x: 30.0,
            panel_height: 100.0,
            corner_radius: 15.0,
            panel_fill: Rgba8::black_alpha(0.3),
            panel_shadow: ShadowStyle {
                color: Rgba8::black_alpha(0.2),
                blur: 10.0,
            },
            border_color: Rgba8::white_alpha(0.2),
            border_width: 2.0,
            text_color: Rgba8::WHITE,
            text_shadow: ShadowStyle {
                color: Rgba8::black_alpha(0.5),
                blur: 4.0,
            },
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Where the label font comes from.
pub struct FontSettings {
    /// Explicit font file; wins over the environment and system lookup.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    /// Preferred installed families, in order.
    pub families: Vec<String>,
    /// Preferred weight (CSS scale).
    pub weight: u16,
}

impl Default for FontSettings {
    fn default() -> Self {
        Self {
            path: None,
            families: vec!["Inter".to_string()],
            weight: 800,
        }
    }
}

impl FontSettings {
    /// Resolve the label font: explicit path, then `SLASH_COMPARE_FONT`, then system fonts.
    ///
    /// A configured path that cannot be read is an error; an empty system is not.
    pub fn resolve(&self) -> CompareResult<Option<LabelFont>> {
        if let Some(path) = &self.path {
            return LabelFont::from_path(path).map(Some);
        }
        if let Some(path) = std::env::var_os(FONT_ENV).filter(|v| !v.is_empty()) {
            return LabelFont::from_path(PathBuf::from(path)).map(Some);
        }
        Ok(LabelFont::from_system(&self.families, self.weight))
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Full compositor configuration.
pub struct CompareSettings {
    /// Output size.
    pub canvas: Canvas,
    /// Horizontal lean of the divider: `top_x = center_x + slant_offset`.
    pub slant_offset: f64,
    /// Seam stroke.
    pub seam: SeamStyle,
    /// Label panels.
    pub labels: LabelStyle,
    /// Label font source.
    pub font: FontSettings,
    /// Export encoding.
    pub export: ExportSettings,
}

impl Default for CompareSettings {
    fn default() -> Self {
        Self {
            canvas: Canvas::default(),
            slant_offset: SLANT_OFFSET,
            seam: SeamStyle::default(),
            labels: LabelStyle::default(),
            font: FontSettings::default(),
            export: ExportSettings::default(),
        }
    }
}

impl CompareSettings {
    /// Parse settings from JSON; missing fields take defaults.
    pub fn from_json_str(s: &str) -> CompareResult<Self> {
        let settings: Self =
            serde_json::from_str(s).map_err(|e| CompareError::serde(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Read and parse a JSON settings file.
    pub fn from_path(path: impl AsRef<Path>) -> CompareResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read settings from '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    /// Serialize to pretty JSON.
    pub fn to_json_string(&self) -> CompareResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| CompareError::serde(e.to_string()))
    }

    /// Reject values the renderer cannot honour.
    pub fn validate(&self) -> CompareResult<()> {
        if self.canvas.is_empty() {
            return Err(CompareError::validation("canvas width/height must be > 0"));
        }
        if self.canvas.width > u32::from(u16::MAX) || self.canvas.height > u32::from(u16::MAX) {
            return Err(CompareError::validation(
                "canvas width/height must fit in u16",
            ));
        }
        if !self.slant_offset.is_finite() {
            return Err(CompareError::validation("slant_offset must be finite"));
        }
        if !(self.seam.width.is_finite() && self.seam.width > 0.0) {
            return Err(CompareError::validation("seam width must be finite and > 0"));
        }

        let l = &self.labels;
        if !(l.font_size.is_finite() && l.font_size > 0.0) {
            return Err(CompareError::validation(
                "label font_size must be finite and > 0",
            ));
        }
        if !(l.panel_height.is_finite() && l.panel_height > 0.0) {
            return Err(CompareError::validation(
                "label panel_height must be finite and > 0",
            ));
        }
        for (name, v) in [
            ("inset", l.inset),
            ("padding_x", l.padding_x),
            ("corner_radius", l.corner_radius),
            ("border_width", l.border_width),
        ] {
            if !(v.is_finite() && v >= 0.0) {
                return Err(CompareError::validation(format!(
                    "label {name} must be finite and >= 0"
                )));
            }
        }
        for (name, s) in [
            ("seam shadow", self.seam.shadow),
            ("panel shadow", l.panel_shadow),
            ("text shadow", l.text_shadow),
        ] {
            if !(s.blur.is_finite() && s.blur >= 0.0) {
                return Err(CompareError::validation(format!(
                    "{name} blur must be finite and >= 0"
                )));
            }
        }

        self.export.validate()
    }
}

impl Default for ShadowStyle {
    fn default() -> Self {
        Self {
            color: Rgba8::TRANSPARENT,
            blur: 0.0,
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
