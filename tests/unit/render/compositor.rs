use super::*;
use crate::foundation::core::Rgba8;
use crate::geometry::viewport::Viewport;

const RED: Rgba8 = Rgba8::new(255, 0, 0, 255);
const BLUE: Rgba8 = Rgba8::new(0, 0, 255, 255);
const GREEN: Rgba8 = Rgba8::new(0, 255, 0, 255);

fn small_settings() -> CompareSettings {
    let mut s = CompareSettings::default();
    s.canvas = Canvas::new(300, 200);
    s.slant_offset = 60.0;
    s.seam.width = 4.0;
    s.labels.inset = 10.0;
    s.labels.panel_height = 10.0;
    s.labels.padding_x = 5.0;
    s.labels.font_size = 6.0;
    s
}

fn slot(bitmap: Option<Bitmap>) -> ImageSlot {
    let mut slot = ImageSlot::new(Viewport::new(300.0, 200.0));
    if let Some(b) = bitmap {
        slot.load(b);
    }
    slot
}

fn setup() -> (Compositor, OutputSurface) {
    let settings = small_settings();
    let surface = OutputSurface::new(settings.canvas).unwrap();
    (Compositor::new(settings, None), surface)
}

fn assert_near(px: [u8; 4], expected: Rgba8) {
    let want = expected.premultiplied();
    for (got, want) in px.iter().zip(want) {
        assert!(
            (i32::from(*got) - i32::from(want)).abs() <= 3,
            "pixel {px:?} != {want:?}"
        );
    }
}

#[test]
fn both_slots_empty_leaves_surface_blank() {
    let (mut c, mut surface) = setup();
    let report = c
        .compose(&slot(None), &slot(None), &DividerState::default(), &mut surface)
        .unwrap();
    assert!(report.is_empty());
    assert!(!report.before_drawn && !report.after_drawn);
    assert!(surface.data().iter().all(|&b| b == 0));
}

#[test]
fn before_left_after_right_and_white_seam() {
    let (mut c, mut surface) = setup();
    let before = slot(Some(Bitmap::solid(300, 200, RED)));
    let after = slot(Some(Bitmap::solid(300, 200, BLUE)));
    let report = c
        .compose(&before, &after, &DividerState::default(), &mut surface)
        .unwrap();

    assert!(report.before_drawn && report.after_drawn);
    assert_eq!(report.divider.center_x, 150.0);
    assert_eq!(report.divider.top_x, 210.0);
    assert_eq!(report.divider.bottom_x, 90.0);

    assert_near(surface.pixel(20, 50).unwrap(), RED);
    assert_near(surface.pixel(280, 50).unwrap(), BLUE);
    // Seam x at y = 100 is 150.
    let seam = surface.pixel(150, 100).unwrap();
    assert!(seam.iter().all(|&c| c > 245), "seam pixel {seam:?}");
}

#[test]
fn seam_leans_right_at_the_top() {
    let (mut c, mut surface) = setup();
    let before = slot(Some(Bitmap::solid(300, 200, RED)));
    let after = slot(Some(Bitmap::solid(300, 200, BLUE)));
    c.compose(&before, &after, &DividerState::default(), &mut surface)
        .unwrap();

    // Between the seam's bottom x (90) and top x (210): after-side near the bottom,
    // before-side near the top.
    assert_near(surface.pixel(150, 2).unwrap(), RED);
    assert_near(surface.pixel(150, 180).unwrap(), BLUE);
}

#[test]
fn missing_after_skips_layer_but_keeps_decorations() {
    let (mut c, mut surface) = setup();
    let before = slot(Some(Bitmap::solid(300, 200, RED)));
    let report = c
        .compose(&before, &slot(None), &DividerState::default(), &mut surface)
        .unwrap();

    assert!(report.before_drawn);
    assert!(!report.after_drawn);
    assert_eq!(report.labels.len(), 2);
    assert!(!report.text_rendered);
    assert_near(surface.pixel(280, 50).unwrap(), RED);
    let seam = surface.pixel(150, 100).unwrap();
    assert!(seam[1] > 245);
}

#[test]
fn missing_before_leaves_left_side_transparent() {
    let (mut c, mut surface) = setup();
    let after = slot(Some(Bitmap::solid(300, 200, BLUE)));
    c.compose(&slot(None), &after, &DividerState::default(), &mut surface)
        .unwrap();
    assert_eq!(surface.pixel(20, 50), Some([0, 0, 0, 0]));
    assert_near(surface.pixel(280, 50).unwrap(), BLUE);
}

#[test]
fn pan_selects_lower_part_of_tall_image() {
    let (mut c, mut surface) = setup();
    let mut px = RED.premultiplied().repeat(300 * 200);
    px.extend(GREEN.premultiplied().repeat(300 * 200));
    let tall = Bitmap::from_rgba8(300, 400, px).unwrap();

    let mut before = slot(Some(tall));
    assert_eq!(before.set_pan_offset(-200.0), -200.0);
    c.compose(&before, &slot(None), &DividerState::default(), &mut surface)
        .unwrap();
    assert_near(surface.pixel(20, 50).unwrap(), GREEN);

    before.set_pan_offset(0.0);
    c.compose(&before, &slot(None), &DividerState::default(), &mut surface)
        .unwrap();
    assert_near(surface.pixel(20, 50).unwrap(), RED);
}

#[test]
fn short_after_image_is_letterboxed_over_before() {
    let (mut c, mut surface) = setup();
    let before = slot(Some(Bitmap::solid(300, 200, RED)));
    let after = slot(Some(Bitmap::solid(300, 100, BLUE)));
    let report = c
        .compose(&before, &after, &DividerState::default(), &mut surface)
        .unwrap();
    assert!(report.after_drawn);
    assert_near(surface.pixel(280, 50).unwrap(), BLUE);
    assert_near(surface.pixel(280, 150).unwrap(), RED);
}

#[test]
fn divider_ratio_moves_the_split() {
    let (mut c, mut surface) = setup();
    let before = slot(Some(Bitmap::solid(300, 200, RED)));
    let after = slot(Some(Bitmap::solid(300, 200, BLUE)));
    let mut divider = DividerState::default();
    divider.set_ratio(0.9);
    let report = c.compose(&before, &after, &divider, &mut surface).unwrap();
    assert_eq!(report.divider.center_x, 270.0);
    assert_near(surface.pixel(200, 50).unwrap(), RED);
}

#[test]
fn label_panels_follow_divider_halves() {
    let (mut c, mut surface) = setup();
    let before = slot(Some(Bitmap::solid(300, 200, RED)));
    let report = c
        .compose(&before, &slot(None), &DividerState::default(), &mut surface)
        .unwrap();
    let [b, a] = [&report.labels[0], &report.labels[1]];
    assert_eq!(b.anchor, crate::foundation::core::Point::new(75.0, 190.0));
    assert_eq!(a.anchor, crate::foundation::core::Point::new(225.0, 190.0));
    assert_eq!(b.text, "Before");
    assert_eq!(a.text, "After");
    // Estimated widths: 6 and 5 characters at 0.6 * 6px.
    assert!((b.text_width - 21.6).abs() < 1e-3);
    assert!((a.text_width - 18.0).abs() < 1e-3);
}

#[test]
fn composing_twice_is_deterministic() {
    let (mut c, mut surface) = setup();
    let before = slot(Some(Bitmap::solid(300, 200, RED)));
    let after = slot(Some(Bitmap::solid(300, 200, BLUE)));
    let divider = DividerState::default();
    c.compose(&before, &after, &divider, &mut surface).unwrap();
    let first = surface.frame();
    c.compose(&before, &after, &divider, &mut surface).unwrap();
    assert_eq!(surface.frame(), first);
}

#[test]
fn oversized_bitmap_is_a_render_error() {
    let (mut c, mut surface) = setup();
    let huge = Bitmap {
        width: 70_000,
        height: 1,
        rgba8_premul: Arc::new(vec![0; 70_000 * 4]),
    };
    let err = c
        .compose(&slot(Some(huge)), &slot(None), &DividerState::default(), &mut surface)
        .unwrap_err();
    assert!(matches!(err, CompareError::Render(_)));
}

#[test]
fn label_text_spans_its_panel_at_full_size() {
    let Some(font) = LabelFont::from_system(&["Inter".to_string()], 800) else {
        return;
    };
    let settings = CompareSettings::default();
    let canvas = settings.canvas;
    let mut surface = OutputSurface::new(canvas).unwrap();
    let mut c = Compositor::new(settings, Some(font));

    let black = Rgba8::new(0, 0, 0, 255);
    let full = Viewport::new(f64::from(canvas.width), f64::from(canvas.height));
    let mut before = ImageSlot::new(full);
    before.load(Bitmap::solid(canvas.width, canvas.height, black));
    let mut after = ImageSlot::new(full);
    after.load(Bitmap::solid(canvas.width, canvas.height, black));

    let report = c
        .compose(&before, &after, &DividerState::default(), &mut surface)
        .unwrap();
    assert!(report.text_rendered);
    assert_eq!(report.labels.len(), 2);

    for panel in &report.labels {
        let (x0, y0, x1, y1) = bright_extent(&surface, panel.rect)
            .unwrap_or_else(|| panic!("no text pixels in '{}' panel", panel.text));
        let spread = f64::from(x1 - x0 + 1);
        assert!(
            spread >= 0.8 * panel.text_width,
            "'{}' glyphs span {spread}px of {}",
            panel.text,
            panel.text_width
        );
        assert!(f64::from(y0) < panel.anchor.y && panel.anchor.y < f64::from(y1));
    }
}

fn bright_extent(surface: &OutputSurface, rect: Rect) -> Option<(u32, u32, u32, u32)> {
    let mut extent: Option<(u32, u32, u32, u32)> = None;
    for y in (rect.y0 as u32 + 5)..(rect.y1 as u32 - 5) {
        for x in (rect.x0 as u32 + 5)..(rect.x1 as u32 - 5) {
            if surface.pixel(x, y).unwrap()[0] <= 200 {
                continue;
            }
            extent = Some(match extent {
                None => (x, y, x, y),
                Some((a, b, c, d)) => (a.min(x), b.min(y), c.max(x), d.max(y)),
            });
        }
    }
    extent
}
