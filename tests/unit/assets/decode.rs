use std::io::Cursor;

use super::*;
use crate::raster::Channels;

#[test]
fn decode_image_png_dimensions_and_values() {
    let src_rgba = vec![100u8, 50u8, 200u8, 128u8];
    let img = image::RgbaImage::from_raw(1, 1, src_rgba).unwrap();

    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();

    let decoded = decode_image(&buf).unwrap();
    assert_eq!(decoded.dimensions(), (1, 1));
    assert_eq!(decoded.channels(), Channels::Rgba);
    let px = decoded.pixel(0, 0);
    assert!((px[0] - 100.0 / 255.0).abs() < 1e-6);
    assert!((px[3] - 128.0 / 255.0).abs() < 1e-6);
}

#[test]
fn decode_rgb_png_has_no_alpha() {
    let img = image::RgbImage::from_raw(2, 1, vec![1, 2, 3, 4, 5, 6]).unwrap();
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();

    let decoded = decode_image(&buf).unwrap();
    assert_eq!(decoded.channels(), Channels::Rgb);
}

#[test]
fn decode_garbage_is_an_error() {
    assert!(decode_image(b"not an image").is_err());
    assert!(read_image(std::path::Path::new("target/definitely/missing.png")).is_err());
}
