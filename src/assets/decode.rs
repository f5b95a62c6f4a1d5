use std::{path::Path, sync::Arc};

use anyhow::Context;

use crate::{
    foundation::core::Rgba8,
    foundation::error::{CompareError, CompareResult},
    foundation::math::premultiply_rgba8_in_place,
};

#[derive(Clone, PartialEq, Eq)]
/// Decoded raster image in premultiplied RGBA8 form.
///
/// This is the "ready bitmap" handed from ingestion to the core; cloning is cheap.
pub struct Bitmap {
    /// Natural width in pixels.
    pub width: u32,
    /// Natural height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl std::fmt::Debug for Bitmap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bitmap")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.rgba8_premul.len())
            .finish()
    }
}

impl Bitmap {
    /// Build a bitmap from straight-alpha RGBA8 bytes.
    pub fn from_rgba8(width: u32, height: u32, mut rgba8: Vec<u8>) -> CompareResult<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|v| v.checked_mul(4))
            .ok_or_else(|| CompareError::validation("bitmap size overflow"))?;
        if rgba8.len() != expected {
            return Err(CompareError::validation(format!(
                "bitmap byte length {} does not match {width}x{height}x4",
                rgba8.len()
            )));
        }
        premultiply_rgba8_in_place(&mut rgba8);
        Ok(Self {
            width,
            height,
            rgba8_premul: Arc::new(rgba8),
        })
    }

    /// Single-colour bitmap.
    pub fn solid(width: u32, height: u32, color: Rgba8) -> Self {
        let px = color.premultiplied();
        Self {
            width,
            height,
            rgba8_premul: Arc::new(px.repeat(width as usize * height as usize)),
        }
    }

    /// True when the bitmap has no pixels to sample.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Premultiplied pixel at `(x, y)`, if in bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        let px = self.rgba8_premul.get(idx..idx + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }
}

/// Decode encoded image bytes (any format the `image` crate knows) into a [`Bitmap`].
pub fn decode_bitmap(bytes: &[u8]) -> CompareResult<Bitmap> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Ok(Bitmap {
        width,
        height,
        rgba8_premul: Arc::new(rgba8_premul),
    })
}

/// Read and decode an image file.
pub fn read_bitmap(path: impl AsRef<Path>) -> CompareResult<Bitmap> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)
        .with_context(|| format!("read image bytes from '{}'", path.display()))?;
    decode_bitmap(&bytes)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
