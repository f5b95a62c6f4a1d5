//! slash-compare renders before/after comparison images split by a slanted divider.
//!
//! Two input bitmaps are each shown through a vertically pannable crop view. A composite
//! pass draws the "before" image across the whole output, the "after" image clipped to the
//! right of a diagonal seam, a glowing seam stroke and a frosted label under each half.
//!
//! # Pipeline overview
//!
//! 1. **Ingest**: decode files into premultiplied [`Bitmap`]s and load them into the
//!    [`Controller`].
//! 2. **Interact**: pointer events pan each crop view and drag the divider; the controller
//!    is the only writer of that state.
//! 3. **Compose**: [`Compositor::compose`] redraws the [`OutputSurface`] from scratch.
//! 4. **Export**: [`encode_frame`] / [`write_export`] serialize the surface (JPEG by default).
//!
//! Rendering is CPU-only and deterministic: identical inputs produce identical pixels.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod config;
mod export;
mod foundation;
mod geometry;
mod interaction;
mod model;
mod render;

pub use crate::assets::decode::{Bitmap, decode_bitmap, read_bitmap};
pub use crate::assets::font::{LabelFont, LabelLayout, TextLayoutEngine, estimate_text_width};
pub use crate::config::{
    CompareSettings, FONT_ENV, FontSettings, LabelStyle, SeamStyle, ShadowStyle,
};
pub use crate::export::encode::{
    DEFAULT_FILE_STEM, ExportFormat, ExportSettings, encode_frame, write_export, write_export_to,
};
pub use crate::foundation::core::{
    Affine, BezPath, Canvas, OUTPUT_CANVAS, Point, Rect, Rgba8, Vec2,
};
pub use crate::foundation::error::{CompareError, CompareResult};
pub use crate::geometry::divider::{
    DIVIDER_DEFAULT, DIVIDER_MAX, DIVIDER_MIN, DividerGeometry, DividerState, SLANT_OFFSET,
};
pub use crate::geometry::viewport::{
    AspectRatio, Placement, SourceRect, Viewport, displayed_height, map_view_to_source,
};
pub use crate::interaction::controller::{Controller, PointerEvent, PointerTarget, Response};
pub use crate::interaction::divider_drag::{DividerDrag, SurfaceLayout, pointer_to_ratio};
pub use crate::interaction::pan::PanGesture;
pub use crate::model::slot::{ImageSlot, SlotSide, clamp_pan};
pub use crate::render::compositor::{CompositeReport, Compositor};
pub use crate::render::label::LabelPanel;
pub use crate::render::surface::{FrameRgba, OutputSurface};
