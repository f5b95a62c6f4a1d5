use super::*;

#[test]
fn empty_json_yields_defaults() {
    let s = CompareSettings::from_json_str("{}").unwrap();
    assert_eq!(s, CompareSettings::default());
    assert_eq!(s.canvas, Canvas::new(1500, 1000));
    assert_eq!(s.slant_offset, 100.0);
    assert_eq!(s.seam.width, 10.0);
    assert_eq!(s.labels.font_size, 60.0);
    assert_eq!(s.labels.panel_fill, Rgba8::new(0, 0, 0, 77));
    assert_eq!(s.export.quality, 90);
    assert_eq!(s.font.weight, 800);
}

#[test]
fn partial_json_overrides_single_fields() {
    let s = CompareSettings::from_json_str(
        r#"{"canvas":{"width":300,"height":200},"labels":{"before_text":"Old"},"export":{"format":"png"}}"#,
    )
    .unwrap();
    assert_eq!(s.canvas, Canvas::new(300, 200));
    assert_eq!(s.labels.before_text, "Old");
    assert_eq!(s.labels.after_text, "After");
    assert_eq!(s.export.file_name(), "slash-compare.png");
}

#[test]
fn colors_serialize_as_arrays() {
    let s = CompareSettings::from_json_str(r#"{"seam":{"color":[255,0,0,128]}}"#).unwrap();
    assert_eq!(s.seam.color, Rgba8::new(255, 0, 0, 128));
    assert_eq!(s.seam.shadow.blur, 20.0);
}

#[test]
fn round_trips_through_json() {
    let mut s = CompareSettings::default();
    s.slant_offset = 40.0;
    let back = CompareSettings::from_json_str(&s.to_json_string().unwrap()).unwrap();
    assert_eq!(back, s);
}

#[test]
fn invalid_values_are_rejected() {
    let err = CompareSettings::from_json_str(r#"{"canvas":{"width":0,"height":10}}"#).unwrap_err();
    assert!(err.to_string().contains("canvas"));
    assert!(CompareSettings::from_json_str(r#"{"canvas":{"width":70000,"height":10}}"#).is_err());
    assert!(CompareSettings::from_json_str(r#"{"seam":{"width":0}}"#).is_err());
    assert!(CompareSettings::from_json_str(r#"{"labels":{"padding_x":-1}}"#).is_err());
    assert!(CompareSettings::from_json_str(r#"{"export":{"quality":101}}"#).is_err());
}

#[test]
fn malformed_json_is_a_serde_error() {
    let err = CompareSettings::from_json_str("{not json").unwrap_err();
    assert!(matches!(err, CompareError::Serde(_)));
}

#[test]
fn missing_font_path_is_an_error() {
    let font = FontSettings {
        path: Some(PathBuf::from("does/not/exist.ttf")),
        ..FontSettings::default()
    };
    assert!(font.resolve().is_err());
}
