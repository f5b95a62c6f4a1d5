use std::path::{Path, PathBuf};

use anyhow::Context;
use image::ImageEncoder;

use crate::{
    foundation::error::{CompareError, CompareResult},
    foundation::math::unpremultiply_rgba8_in_place,
    render::surface::FrameRgba,
};

/// File stem used for downloads when no explicit name is configured.
pub const DEFAULT_FILE_STEM: &str = "slash-compare";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
/// Encoded output format.
pub enum ExportFormat {
    /// Lossy JPEG; transparency is flattened onto black.
    #[default]
    Jpeg,
    /// Lossless PNG with straight alpha.
    Png,
}

impl ExportFormat {
    /// MIME type.
    pub fn mime(self) -> &'static str {
        match self {
            ExportFormat::Jpeg => "image/jpeg",
            ExportFormat::Png => "image/png",
        }
    }

    /// File extension without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Jpeg => "jpg",
            ExportFormat::Png => "png",
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = CompareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "jpeg" | "jpg" => Ok(ExportFormat::Jpeg),
            "png" => Ok(ExportFormat::Png),
            other => Err(CompareError::validation(format!(
                "unknown export format '{other}' (expected jpeg or png)"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// How the finished surface is serialized.
pub struct ExportSettings {
    /// Encoded format.
    pub format: ExportFormat,
    /// JPEG quality in `1..=100`; ignored for PNG.
    pub quality: u8,
    /// Output file name; defaults to `slash-compare.<ext>`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            format: ExportFormat::Jpeg,
            quality: 90,
            file_name: None,
        }
    }
}

impl ExportSettings {
    /// Effective file name.
    pub fn file_name(&self) -> String {
        self.file_name
            .clone()
            .unwrap_or_else(|| format!("{DEFAULT_FILE_STEM}.{}", self.format.extension()))
    }

    /// Check quality bounds and the file name.
    pub fn validate(&self) -> CompareResult<()> {
        if !(1..=100).contains(&self.quality) {
            return Err(CompareError::validation("export quality must be in 1..=100"));
        }
        if let Some(name) = &self.file_name
            && (name.trim().is_empty() || name.contains(['/', '\\']))
        {
            return Err(CompareError::validation(
                "export file_name must be a bare, non-empty file name",
            ));
        }
        Ok(())
    }
}

/// Encode a read-back frame.
pub fn encode_frame(frame: &FrameRgba, settings: &ExportSettings) -> CompareResult<Vec<u8>> {
    settings.validate()?;
    let expected = (frame.width as usize)
        .checked_mul(frame.height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| CompareError::export("frame size overflow"))?;
    if frame.data.len() != expected {
        return Err(CompareError::export(
            "frame data length does not match width*height*4",
        ));
    }

    let mut out = Vec::new();
    match settings.format {
        ExportFormat::Jpeg => {
            let rgb = flatten_on_black(frame);
            image::codecs::jpeg::JpegEncoder::new_with_quality(&mut out, settings.quality)
                .write_image(&rgb, frame.width, frame.height, image::ExtendedColorType::Rgb8)
                .context("encode jpeg")?;
        }
        ExportFormat::Png => {
            let mut rgba = frame.data.clone();
            if frame.premultiplied {
                unpremultiply_rgba8_in_place(&mut rgba);
            }
            image::codecs::png::PngEncoder::new(&mut out)
                .write_image(&rgba, frame.width, frame.height, image::ExtendedColorType::Rgba8)
                .context("encode png")?;
        }
    }
    Ok(out)
}

/// Encode `frame` and write it to `path`, creating parent directories.
#[tracing::instrument(skip(frame, settings), fields(format = ?settings.format))]
pub fn write_export_to(
    frame: &FrameRgba,
    settings: &ExportSettings,
    path: &Path,
) -> CompareResult<()> {
    let bytes = encode_frame(frame, settings)?;
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(path, &bytes).with_context(|| format!("write '{}'", path.display()))?;
    tracing::debug!(bytes = bytes.len(), "export written");
    Ok(())
}

/// Encode `frame` into `dir` under the configured file name; returns the written path.
pub fn write_export(
    frame: &FrameRgba,
    settings: &ExportSettings,
    dir: &Path,
) -> CompareResult<PathBuf> {
    let path = dir.join(settings.file_name());
    write_export_to(frame, settings, &path)?;
    Ok(path)
}

/// Drop alpha the way a JPEG encoder of a canvas does: composite over opaque black.
fn flatten_on_black(frame: &FrameRgba) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(frame.data.len() / 4 * 3);
    for px in frame.data.chunks_exact(4) {
        if frame.premultiplied {
            rgb.extend_from_slice(&px[..3]);
        } else {
            let a = u16::from(px[3]);
            rgb.extend(
                px[..3]
                    .iter()
                    .map(|&c| crate::foundation::math::mul_div255_u8(u16::from(c), a)),
            );
        }
    }
    rgb
}

#[cfg(test)]
#[path = "../../tests/unit/export/encode.rs"]
mod tests;
