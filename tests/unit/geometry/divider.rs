use super::*;

#[test]
fn default_is_centred_and_idle() {
    let d = DividerState::default();
    assert_eq!(d.ratio(), 0.5);
    assert!(!d.is_dragging());
}

#[test]
fn set_ratio_clamps_into_band() {
    let mut d = DividerState::default();
    for raw in [-5.0, 0.0, 0.05, 0.1, 0.37, 0.9, 0.95, 1.0, 42.0, f64::INFINITY, f64::NEG_INFINITY] {
        let stored = d.set_ratio(raw);
        assert!((DIVIDER_MIN..=DIVIDER_MAX).contains(&stored), "raw {raw} -> {stored}");
        assert_eq!(stored, d.ratio());
    }
    assert_eq!(d.set_ratio(0.37), 0.37);
    assert_eq!(d.set_ratio(0.0), 0.1);
    assert_eq!(d.set_ratio(1.0), 0.9);
}

#[test]
fn nan_leaves_ratio_unchanged() {
    let mut d = DividerState::default();
    d.set_ratio(0.3);
    assert_eq!(d.set_ratio(f64::NAN), 0.3);
}

#[test]
fn reset_always_returns_to_centre() {
    let mut d = DividerState::default();
    for raw in [0.1, 0.2, 0.5, 0.9] {
        d.set_ratio(raw);
        d.reset();
        assert_eq!(d.ratio(), 0.5);
    }
}

#[test]
fn geometry_for_centred_divider() {
    let g = DividerGeometry::new(Canvas::new(1500, 1000), 0.5, SLANT_OFFSET);
    assert_eq!(g.center_x, 750.0);
    assert_eq!(g.top_x, 850.0);
    assert_eq!(g.bottom_x, 650.0);
    assert_eq!(
        g.clip_quad(),
        [
            Point::new(850.0, 0.0),
            Point::new(1500.0, 0.0),
            Point::new(1500.0, 1000.0),
            Point::new(650.0, 1000.0),
        ]
    );
    assert_eq!(g.seam(), (Point::new(850.0, 0.0), Point::new(650.0, 1000.0)));
}

#[test]
fn clip_path_is_closed_quad() {
    let g = DividerGeometry::new(Canvas::new(1500, 1000), 0.5, SLANT_OFFSET);
    let path = g.clip_path();
    assert_eq!(path.elements().len(), 5);
    assert!(matches!(path.elements()[4], kurbo::PathEl::ClosePath));
}

#[test]
fn label_anchors_are_half_midpoints() {
    let g = DividerGeometry::new(Canvas::new(1500, 1000), 0.4, SLANT_OFFSET);
    let (before, after) = g.label_anchors(100.0);
    assert_eq!(before, Point::new(300.0, 900.0));
    assert_eq!(after, Point::new(600.0 + 450.0, 900.0));
}
