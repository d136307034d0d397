use super::*;

fn ramp(w: u32, h: u32) -> ImageF32 {
    let mut data = Vec::new();
    for _y in 0..h {
        for x in 0..w {
            let v = x as f32 / (w - 1) as f32;
            data.extend_from_slice(&[v, 0.0, 1.0 - v, 1.0]);
        }
    }
    ImageF32::from_raw(w, h, Channels::Rgba, data).unwrap()
}

#[test]
fn integer_translate_shifts_and_extends_edges() {
    let img = ramp(5, 2);
    let out = translate(&img, 2.0, 0.0).unwrap();
    assert_eq!(out.dimensions(), img.dimensions());
    // Content moved right by two pixels.
    assert_eq!(out.pixel(4, 0), img.pixel(2, 0));
    assert_eq!(out.pixel(2, 1), img.pixel(0, 1));
    // Revealed columns repeat the old left edge.
    assert_eq!(out.pixel(0, 0), img.pixel(0, 0));
    assert_eq!(out.pixel(1, 0), img.pixel(0, 0));
}

#[test]
fn fractional_translate_interpolates() {
    let img = ramp(5, 1);
    let out = translate(&img, 0.5, 0.0).unwrap();
    let expected = (img.pixel(1, 0)[0] + img.pixel(2, 0)[0]) / 2.0;
    assert!((out.pixel(2, 0)[0] - expected).abs() < 1e-6);
}

#[test]
fn translate_moves_alpha_too() {
    let mut img = ImageF32::transparent(crate::foundation::core::Canvas {
        width: 4,
        height: 1,
    });
    img.pixel_mut(0, 0).copy_from_slice(&[1.0, 1.0, 1.0, 1.0]);
    let out = translate(&img, 0.0, 0.0).unwrap();
    assert_eq!(out, img);
    let shifted = translate(&img, 3.0, 0.0).unwrap();
    assert_eq!(shifted.pixel(3, 0)[3], 1.0);
}

#[test]
fn resize_scales_dimensions() {
    let img = ramp(8, 4);
    let out = resize(&img, 0.5).unwrap();
    assert_eq!(out.dimensions(), (4, 2));
    assert!(out.as_slice().iter().all(|v| (0.0..=1.0).contains(v)));
    assert!(resize(&img, 0.01).is_err());
    assert!(resize(&img, -1.0).is_err());
}

#[test]
fn pixelize_keeps_shape_and_makes_blocks() {
    let img = ramp(8, 2);
    let out = pixelize(&img, 4).unwrap();
    assert_eq!(out.dimensions(), img.dimensions());
    assert_eq!(out.pixel(0, 0), out.pixel(3, 1));
    assert_eq!(out.pixel(4, 0), out.pixel(7, 0));
    assert!(pixelize(&img, 0).is_err());
}
