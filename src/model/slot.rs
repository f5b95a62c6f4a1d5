use crate::{
    assets::decode::Bitmap,
    geometry::viewport::{AspectRatio, SourceRect, Viewport, displayed_height, map_view_to_source},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
/// Which side of the comparison a slot feeds.
pub enum SlotSide {
    /// Left / background image.
    Before,
    /// Right / clipped image.
    After,
}

impl SlotSide {
    /// Both sides, before first.
    pub const ALL: [SlotSide; 2] = [SlotSide::Before, SlotSide::After];

    /// Lowercase name, as used in logs and file names.
    pub fn as_str(self) -> &'static str {
        match self {
            SlotSide::Before => "before",
            SlotSide::After => "after",
        }
    }
}

impl std::fmt::Display for SlotSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, Default)]
/// One input image plus its vertical pan within the crop viewport.
pub struct ImageSlot {
    bitmap: Option<Bitmap>,
    pan_offset: f64,
    viewport: Viewport,
}

impl ImageSlot {
    /// An empty slot using `viewport` for its crop view.
    pub fn new(viewport: Viewport) -> Self {
        Self {
            bitmap: None,
            pan_offset: 0.0,
            viewport,
        }
    }

    /// Install a decoded bitmap and reset the pan to the top.
    pub fn load(&mut self, bitmap: Bitmap) {
        self.bitmap = Some(bitmap);
        self.pan_offset = 0.0;
    }

    /// Loaded bitmap, if any.
    pub fn bitmap(&self) -> Option<&Bitmap> {
        self.bitmap.as_ref()
    }

    /// True once a bitmap is present.
    pub fn is_loaded(&self) -> bool {
        self.bitmap.is_some()
    }

    /// Vertical pan in display pixels, `<= 0`.
    pub fn pan_offset(&self) -> f64 {
        self.pan_offset
    }

    /// Crop viewport geometry.
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Update the viewport geometry (e.g. after a UI resize) and re-clamp the pan.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.pan_offset = self.clamp(self.pan_offset);
    }

    /// Height of the bitmap as displayed in the viewport; 0 when empty.
    pub fn displayed_height(&self) -> f64 {
        self.bitmap.as_ref().map_or(0.0, |b| {
            displayed_height(b.width, b.height, self.viewport.display_width)
        })
    }

    /// Clamp a candidate offset against this slot's current geometry.
    pub fn clamp(&self, candidate: f64) -> f64 {
        clamp_pan(candidate, self.viewport.height, self.displayed_height())
    }

    /// Store `candidate` after clamping; returns the stored offset.
    pub(crate) fn set_pan_offset(&mut self, candidate: f64) -> f64 {
        self.pan_offset = self.clamp(candidate);
        self.pan_offset
    }

    /// Source rectangle for the current pan, or `None` when empty or degenerate.
    pub fn source_rect(&self, aspect: AspectRatio) -> Option<SourceRect> {
        let b = self.bitmap.as_ref()?;
        map_view_to_source(
            b.width,
            b.height,
            self.viewport.display_width,
            self.pan_offset,
            aspect,
        )
    }
}

/// Clamp a pan offset so the displayed image always covers the viewport.
///
/// When the displayed image is taller than the viewport the offset lies in
/// `[viewport_height - displayed_height, 0]`; otherwise it is pinned to 0. Non-finite
/// candidates are treated as no pan.
pub fn clamp_pan(candidate: f64, viewport_height: f64, displayed_height: f64) -> f64 {
    let pannable = displayed_height > viewport_height;
    if !pannable || !candidate.is_finite() {
        return 0.0;
    }
    candidate.clamp(viewport_height - displayed_height, 0.0)
}

#[cfg(test)]
#[path = "../../tests/unit/model/slot.rs"]
mod tests;
