use crate::{
    foundation::error::{CompareError, CompareResult},
    foundation::math::mul_div255_u8,
};

/// Premultiplied RGBA8 pixel.
pub type PremulRgba8 = [u8; 4];

/// Porter-Duff source-over for premultiplied pixels.
pub fn over(dst: PremulRgba8, src: PremulRgba8) -> PremulRgba8 {
    match src[3] {
        0 => dst,
        255 => src,
        sa => {
            let inv = 255u16 - u16::from(sa);
            let mut out = [0u8; 4];
            for i in 0..4 {
                out[i] = src[i].saturating_add(mul_div255_u8(u16::from(dst[i]), inv));
            }
            out
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Pixel dimensions of a tightly packed RGBA8 buffer.
pub struct BufferSize {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl BufferSize {
    fn byte_len(self) -> CompareResult<usize> {
        (self.width as usize)
            .checked_mul(self.height as usize)
            .and_then(|v| v.checked_mul(4))
            .ok_or_else(|| CompareError::render("rgba8 buffer size overflow"))
    }
}

/// Composite `src` over `dst` with `src`'s top-left placed at `(x, y)` in `dst`.
///
/// Parts of `src` that fall outside `dst` are dropped.
pub fn over_at(
    dst: &mut [u8],
    dst_size: BufferSize,
    src: &[u8],
    src_size: BufferSize,
    x: i64,
    y: i64,
) -> CompareResult<()> {
    if dst.len() != dst_size.byte_len()? || src.len() != src_size.byte_len()? {
        return Err(CompareError::render(
            "over_at expects buffers matching width*height*4",
        ));
    }

    let dw = i64::from(dst_size.width);
    let dh = i64::from(dst_size.height);
    let sw = i64::from(src_size.width);
    let sh = i64::from(src_size.height);

    let x0 = x.max(0);
    let y0 = y.max(0);
    let x1 = (x + sw).min(dw);
    let y1 = (y + sh).min(dh);
    if x0 >= x1 || y0 >= y1 {
        return Ok(());
    }

    for dy in y0..y1 {
        let sy = dy - y;
        for dx in x0..x1 {
            let sx = dx - x;
            let si = ((sy * sw + sx) * 4) as usize;
            let di = ((dy * dw + dx) * 4) as usize;
            let s = [src[si], src[si + 1], src[si + 2], src[si + 3]];
            if s[3] == 0 {
                continue;
            }
            let d = [dst[di], dst[di + 1], dst[di + 2], dst[di + 3]];
            dst[di..di + 4].copy_from_slice(&over(d, s));
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/render/blend.rs"]
mod tests;
