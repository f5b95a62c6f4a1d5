use crate::{
    foundation::core::Canvas,
    foundation::error::{CompareError, CompareResult},
};

#[derive(Clone, Debug, PartialEq, Eq)]
/// Read-back copy of a surface.
pub struct FrameRgba {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Row-major RGBA8 pixels.
    pub data: Vec<u8>,
    /// True when `data` holds premultiplied alpha.
    pub premultiplied: bool,
}

/// Fixed-size drawable target for the comparison image.
///
/// Fully redrawn on every composite pass; never patched incrementally.
pub struct OutputSurface {
    canvas: Canvas,
    pixmap: vello_cpu::Pixmap,
}

impl std::fmt::Debug for OutputSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutputSurface")
            .field("canvas", &self.canvas)
            .finish()
    }
}

impl OutputSurface {
    /// Allocate a transparent surface of `canvas` size.
    pub fn new(canvas: Canvas) -> CompareResult<Self> {
        let (w, h) = cpu_dims(canvas)?;
        Ok(Self {
            canvas,
            pixmap: vello_cpu::Pixmap::new(w, h),
        })
    }

    /// Logical size.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Reset every pixel to transparent black.
    pub fn clear(&mut self) {
        self.pixmap.data_as_u8_slice_mut().fill(0);
    }

    /// Premultiplied pixel at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.canvas.width || y >= self.canvas.height {
            return None;
        }
        let idx = (y as usize * self.canvas.width as usize + x as usize) * 4;
        let px = self.pixmap.data_as_u8_slice().get(idx..idx + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Premultiplied pixel bytes.
    pub fn data(&self) -> &[u8] {
        self.pixmap.data_as_u8_slice()
    }

    pub(crate) fn data_mut(&mut self) -> &mut [u8] {
        self.pixmap.data_as_u8_slice_mut()
    }

    pub(crate) fn pixmap_mut(&mut self) -> &mut vello_cpu::Pixmap {
        &mut self.pixmap
    }

    /// Copy the current pixels out.
    pub fn frame(&self) -> FrameRgba {
        FrameRgba {
            width: self.canvas.width,
            height: self.canvas.height,
            data: self.data().to_vec(),
            premultiplied: true,
        }
    }
}

/// `vello_cpu` addresses pixmaps with `u16` sides.
pub(crate) fn cpu_dims(canvas: Canvas) -> CompareResult<(u16, u16)> {
    if canvas.is_empty() {
        return Err(CompareError::validation("surface width/height must be > 0"));
    }
    let w: u16 = canvas
        .width
        .try_into()
        .map_err(|_| CompareError::render("surface width exceeds u16"))?;
    let h: u16 = canvas
        .height
        .try_into()
        .map_err(|_| CompareError::render("surface height exceeds u16"))?;
    Ok((w, h))
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
