use crate::model::slot::ImageSlot;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
/// Vertical pan of one image slot, driven by pointer down/move/up.
///
/// Once started, moves and the release are accepted from anywhere; callers forward global
/// pointer events rather than only those over the viewport.
pub enum PanGesture {
    /// No pan in progress.
    #[default]
    Idle,
    /// Pointer held since `start_y`; `initial_offset` is the slot pan at that moment.
    Panning {
        /// Pointer y at gesture start.
        start_y: f64,
        /// Slot pan offset at gesture start.
        initial_offset: f64,
    },
}

impl PanGesture {
    /// Begin panning `slot` at pointer `y`. Ignored (returns false) when the slot is empty.
    pub fn start(&mut self, slot: &ImageSlot, y: f64) -> bool {
        if !slot.is_loaded() {
            return false;
        }
        *self = PanGesture::Panning {
            start_y: y,
            initial_offset: slot.pan_offset(),
        };
        true
    }

    /// Apply a pointer move; returns the new clamped offset, or `None` while idle.
    pub fn update(&self, slot: &mut ImageSlot, y: f64) -> Option<f64> {
        let PanGesture::Panning {
            start_y,
            initial_offset,
        } = *self
        else {
            return None;
        };
        Some(slot.set_pan_offset(initial_offset + (y - start_y)))
    }

    /// Finish the gesture; returns true when one was active.
    pub fn end(&mut self) -> bool {
        std::mem::take(self).is_active()
    }

    /// True while panning.
    pub fn is_active(&self) -> bool {
        matches!(self, PanGesture::Panning { .. })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/interaction/pan.rs"]
mod tests;
