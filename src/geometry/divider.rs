use crate::foundation::core::{BezPath, Canvas, Point};

/// Lowest stored divider ratio; keeps the "before" side visible.
pub const DIVIDER_MIN: f64 = 0.1;
/// Highest stored divider ratio; keeps the "after" side visible.
pub const DIVIDER_MAX: f64 = 0.9;
/// Ratio after a reset (centre of the output).
pub const DIVIDER_DEFAULT: f64 = 0.5;
/// Horizontal pixel offset giving the seam its slant.
pub const SLANT_OFFSET: f64 = 100.0;

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
/// Where the diagonal seam sits, as a fraction of the output width.
pub struct DividerState {
    ratio: f64,
    dragging: bool,
}

impl Default for DividerState {
    fn default() -> Self {
        Self {
            ratio: DIVIDER_DEFAULT,
            dragging: false,
        }
    }
}

impl DividerState {
    /// Current ratio, always within `[DIVIDER_MIN, DIVIDER_MAX]`.
    pub fn ratio(&self) -> f64 {
        self.ratio
    }

    /// True while a divider drag gesture is active.
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub(crate) fn set_dragging(&mut self, dragging: bool) {
        self.dragging = dragging;
    }

    /// Clamp `raw` into `[DIVIDER_MIN, DIVIDER_MAX]` and store it. NaN is ignored.
    pub fn set_ratio(&mut self, raw: f64) -> f64 {
        if !raw.is_nan() {
            self.ratio = raw.clamp(DIVIDER_MIN, DIVIDER_MAX);
        }
        self.ratio
    }

    /// Move the divider back to the centre.
    pub fn reset(&mut self) {
        self.ratio = DIVIDER_DEFAULT;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
/// Seam geometry for one divider ratio on one canvas.
pub struct DividerGeometry {
    /// Output width.
    pub width: f64,
    /// Output height.
    pub height: f64,
    /// `width * ratio`.
    pub center_x: f64,
    /// Seam x at the top edge (`center_x + slant`).
    pub top_x: f64,
    /// Seam x at the bottom edge (`center_x - slant`).
    pub bottom_x: f64,
}

impl DividerGeometry {
    /// Compute the seam for `ratio` on `canvas`.
    pub fn new(canvas: Canvas, ratio: f64, slant_offset: f64) -> Self {
        let width = f64::from(canvas.width);
        let center_x = width * ratio;
        Self {
            width,
            height: f64::from(canvas.height),
            center_x,
            top_x: center_x + slant_offset,
            bottom_x: center_x - slant_offset,
        }
    }

    /// Vertices of the "after" clip region: `(top_x,0) (W,0) (W,H) (bottom_x,H)`.
    pub fn clip_quad(&self) -> [Point; 4] {
        [
            Point::new(self.top_x, 0.0),
            Point::new(self.width, 0.0),
            Point::new(self.width, self.height),
            Point::new(self.bottom_x, self.height),
        ]
    }

    /// Closed path over [`Self::clip_quad`].
    pub fn clip_path(&self) -> BezPath {
        let [a, b, c, d] = self.clip_quad();
        let mut p = BezPath::new();
        p.move_to(a);
        p.line_to(b);
        p.line_to(c);
        p.line_to(d);
        p.close_path();
        p
    }

    /// Seam endpoints, top then bottom.
    pub fn seam(&self) -> (Point, Point) {
        (
            Point::new(self.top_x, 0.0),
            Point::new(self.bottom_x, self.height),
        )
    }

    /// Label centres for "before" and "after", `inset` pixels above the bottom edge.
    ///
    /// These are midpoints of `[0, center_x]` and `[center_x, W]`, not of the slanted halves.
    pub fn label_anchors(&self, inset: f64) -> (Point, Point) {
        let y = self.height - inset;
        let before = Point::new(self.center_x * 0.5, y);
        let after = Point::new(self.center_x + (self.width - self.center_x) / 2.0, y);
        (before, after)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/divider.rs"]
mod tests;
