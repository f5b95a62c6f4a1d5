use super::*;

fn frame(width: u32, height: u32, px: [u8; 4]) -> FrameRgba {
    FrameRgba {
        width,
        height,
        data: px.repeat((width * height) as usize),
        premultiplied: true,
    }
}

#[test]
fn defaults_match_download_contract() {
    let s = ExportSettings::default();
    assert_eq!(s.format, ExportFormat::Jpeg);
    assert_eq!(s.quality, 90);
    assert_eq!(s.file_name(), "slash-compare.jpg");
    assert_eq!(s.format.mime(), "image/jpeg");
}

#[test]
fn png_default_name_follows_format() {
    let s = ExportSettings {
        format: ExportFormat::Png,
        ..ExportSettings::default()
    };
    assert_eq!(s.file_name(), "slash-compare.png");
}

#[test]
fn format_parses_case_insensitively() {
    assert_eq!("JPG".parse::<ExportFormat>().unwrap(), ExportFormat::Jpeg);
    assert_eq!("png".parse::<ExportFormat>().unwrap(), ExportFormat::Png);
    assert!("gif".parse::<ExportFormat>().is_err());
}

#[test]
fn validate_rejects_bad_quality_and_paths() {
    let mut s = ExportSettings::default();
    s.quality = 0;
    assert!(s.validate().is_err());
    s.quality = 90;
    s.file_name = Some("../escape.jpg".to_string());
    assert!(s.validate().is_err());
    s.file_name = Some("out.jpg".to_string());
    assert!(s.validate().is_ok());
}

#[test]
fn jpeg_round_trips_dimensions() {
    let f = frame(8, 6, [200, 40, 40, 255]);
    let bytes = encode_frame(&f, &ExportSettings::default()).unwrap();
    assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
    let decoded = image::load_from_memory(&bytes).unwrap().to_rgb8();
    assert_eq!(decoded.dimensions(), (8, 6));
    let p = decoded.get_pixel(4, 3);
    assert!((i32::from(p[0]) - 200).abs() < 12);
}

#[test]
fn jpeg_flattens_transparency_to_black() {
    let f = frame(4, 4, [0, 0, 0, 0]);
    let bytes = encode_frame(&f, &ExportSettings::default()).unwrap();
    let decoded = image::load_from_memory(&bytes).unwrap().to_rgb8();
    assert!(decoded.pixels().all(|p| p[0] < 8 && p[1] < 8 && p[2] < 8));
}

#[test]
fn png_unpremultiplies() {
    let f = frame(1, 1, [64, 0, 0, 128]);
    let s = ExportSettings {
        format: ExportFormat::Png,
        ..ExportSettings::default()
    };
    let bytes = encode_frame(&f, &s).unwrap();
    let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
    let p = decoded.get_pixel(0, 0);
    assert_eq!(p[3], 128);
    assert!((i32::from(p[0]) - 128).abs() <= 1);
}

#[test]
fn mismatched_frame_is_rejected() {
    let mut f = frame(2, 2, [0, 0, 0, 255]);
    f.data.pop();
    assert!(encode_frame(&f, &ExportSettings::default()).is_err());
}

#[test]
fn write_export_uses_file_name() {
    let dir = std::path::PathBuf::from("target").join("unit_export");
    let f = frame(4, 4, [10, 20, 30, 255]);
    let path = write_export(&f, &ExportSettings::default(), &dir).unwrap();
    assert!(path.ends_with("slash-compare.jpg"));
    assert!(std::fs::metadata(&path).unwrap().len() > 0);
}
