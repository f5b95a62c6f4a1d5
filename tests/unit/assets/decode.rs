use std::io::Cursor;

use super::*;

#[test]
fn decode_png_dimensions_and_premul() {
    let src_rgba = vec![100u8, 50u8, 200u8, 128u8];
    let img = image::RgbaImage::from_raw(1, 1, src_rgba).unwrap();

    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();

    let bitmap = decode_bitmap(&buf).unwrap();
    assert_eq!(bitmap.width, 1);
    assert_eq!(bitmap.height, 1);
    assert_eq!(
        bitmap.rgba8_premul.as_slice(),
        &[
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128u8
        ]
    );
}

#[test]
fn decode_rejects_garbage() {
    assert!(decode_bitmap(b"definitely not an image").is_err());
}

#[test]
fn from_rgba8_checks_length() {
    assert!(Bitmap::from_rgba8(2, 2, vec![0; 15]).is_err());
    let b = Bitmap::from_rgba8(2, 1, vec![255, 0, 0, 255, 0, 255, 0, 255]).unwrap();
    assert_eq!(b.pixel(1, 0), Some([0, 255, 0, 255]));
    assert_eq!(b.pixel(2, 0), None);
}

#[test]
fn solid_fills_every_pixel() {
    let b = Bitmap::solid(3, 2, Rgba8::new(10, 20, 30, 255));
    assert_eq!(b.rgba8_premul.len(), 3 * 2 * 4);
    assert!(b.rgba8_premul.chunks_exact(4).all(|px| px == [10, 20, 30, 255]));
    assert!(!b.is_empty());
    assert!(Bitmap::solid(0, 4, Rgba8::WHITE).is_empty());
}

#[test]
fn read_bitmap_reports_missing_file() {
    let err = read_bitmap("target/does-not-exist/nothing.png").unwrap_err();
    assert!(err.to_string().contains("nothing.png"));
}
