use crate::geometry::divider::DividerState;

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// On-screen box of the output surface, as laid out by the UI.
pub struct SurfaceLayout {
    /// Left edge in pointer coordinates.
    pub left: f64,
    /// Displayed width in pointer coordinates (may differ from the logical width).
    pub displayed_width: f64,
}

impl SurfaceLayout {
    /// Layout showing the surface 1:1 at the origin.
    pub fn identity(logical_width: u32) -> Self {
        Self {
            left: 0.0,
            displayed_width: f64::from(logical_width),
        }
    }
}

/// Divider ratio under pointer `client_x`, before clamping.
///
/// `None` when the displayed or logical width is not positive.
pub fn pointer_to_ratio(client_x: f64, layout: SurfaceLayout, logical_width: u32) -> Option<f64> {
    let logical = f64::from(logical_width);
    if !(layout.displayed_width > 0.0 && logical > 0.0) {
        return None;
    }
    let scale_x = logical / layout.displayed_width;
    let canvas_x = (client_x - layout.left) * scale_x;
    Some(canvas_x / logical)
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// Divider drag over the output surface. Always allowed to start.
pub struct DividerDrag;

impl DividerDrag {
    /// Press on the surface: begin dragging and jump the divider under the pointer.
    ///
    /// Returns the stored ratio, or `None` when the layout is degenerate (the drag still
    /// starts so a later move can recover).
    pub fn start(
        divider: &mut DividerState,
        client_x: f64,
        layout: SurfaceLayout,
        logical_width: u32,
    ) -> Option<f64> {
        divider.set_dragging(true);
        tracing::debug!(client_x, "divider drag started");
        Self::apply(divider, client_x, layout, logical_width)
    }

    /// Pointer move; no-op (`None`) unless a drag is active.
    pub fn update(
        divider: &mut DividerState,
        client_x: f64,
        layout: SurfaceLayout,
        logical_width: u32,
    ) -> Option<f64> {
        if !divider.is_dragging() {
            return None;
        }
        Self::apply(divider, client_x, layout, logical_width)
    }

    /// Release anywhere; returns true when a drag was active.
    pub fn end(divider: &mut DividerState) -> bool {
        let was = divider.is_dragging();
        divider.set_dragging(false);
        if was {
            tracing::debug!(ratio = divider.ratio(), "divider drag ended");
        }
        was
    }

    fn apply(
        divider: &mut DividerState,
        client_x: f64,
        layout: SurfaceLayout,
        logical_width: u32,
    ) -> Option<f64> {
        let raw = pointer_to_ratio(client_x, layout, logical_width)?;
        Some(divider.set_ratio(raw))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/interaction/divider_drag.rs"]
mod tests;
