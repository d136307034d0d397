use super::*;

fn sample() -> ImageF32 {
    ImageF32::from_raw(
        2,
        2,
        Channels::Rgba,
        vec![
            0.2, 0.4, 0.6, 1.0, //
            0.9, 0.1, 0.3, 0.5, //
            0.0, 0.0, 0.0, 0.0, //
            0.5, 0.5, 0.5, 0.25,
        ],
    )
    .unwrap()
}

fn assert_close(a: &ImageF32, b: &ImageF32, tol: f32) {
    assert_eq!(a.dimensions(), b.dimensions());
    assert_eq!(a.channels(), b.channels());
    for (x, y) in a.as_slice().iter().zip(b.as_slice()) {
        assert!((x - y).abs() <= tol, "{x} vs {y}");
    }
}

fn alpha(img: &ImageF32) -> Vec<f32> {
    img.pixels().map(|p| p[3]).collect()
}

#[test]
fn identity_parameters_leave_image_unchanged() {
    let img = sample();
    assert_close(&gamma(&img, 1.0).unwrap(), &img, 1e-6);
    assert_close(&red_tint(&img, 1.0).unwrap(), &img, 1e-6);
    assert_close(&saturate(&img, 1.0).unwrap(), &img, 1e-5);
    assert_close(&brightness(&img, 1.0).unwrap(), &img, 1e-6);
    assert_close(&brighten(&img, 0.0).unwrap(), &img, 1e-6);
    assert_close(&color_enhance(&img, 1.0).unwrap(), &img, 1e-5);
    assert_close(&scale_darken(&img, 1.0).unwrap(), &img, 1e-6);
}

#[test]
fn gamma_darkens_above_one_and_keeps_alpha() {
    let img = sample();
    let out = gamma(&img, 2.0).unwrap();
    assert!((out.pixel(0, 0)[0] - 0.04).abs() < 1e-6);
    assert_eq!(alpha(&out), alpha(&img));
}

#[test]
fn red_tint_scales_channels_and_clamps() {
    let img = sample();
    let out = red_tint(&img, 1.5).unwrap();
    let px = out.pixel(0, 0);
    assert!((px[0] - 0.3).abs() < 1e-6);
    assert!((px[1] - 0.4 * 0.75).abs() < 1e-6);
    assert!((px[2] - 0.6 * 0.75).abs() < 1e-6);

    let strong = red_tint(&img, 4.0).unwrap();
    let px = strong.pixel(1, 0);
    assert_eq!(px[0], 1.0);
    assert_eq!(px[1], 0.0);
    assert_eq!(alpha(&strong), alpha(&img));
}

#[test]
fn negative_parameters_raise() {
    let img = sample();
    assert!(red_tint(&img, -0.1).is_err());
    assert!(saturate(&img, -1.0).is_err());
    assert!(gamma(&img, -2.0).is_err());
    assert!(brightness(&img, -1.0).is_err());
    assert!(color_enhance(&img, -0.5).is_err());
}

#[test]
fn rgba_only_filters_reject_rgb() {
    let rgb = ImageF32::filled(1, 1, Channels::Rgb, &[0.5, 0.5, 0.5]).unwrap();
    assert!(red_tint(&rgb, 1.2).is_err());
    assert!(saturate(&rgb, 1.2).is_err());
    assert!(gamma(&rgb, 2.0).is_err());
    assert!(brightness(&rgb, 1.2).is_ok());
}

#[test]
fn saturate_zero_produces_gray() {
    let img = sample();
    let out = saturate(&img, 0.0).unwrap();
    for px in out.pixels() {
        assert!((px[0] - px[1]).abs() < 1e-6);
        assert!((px[1] - px[2]).abs() < 1e-6);
    }
}

#[test]
fn hsv_roundtrip_matches_primaries() {
    assert_eq!(rgb_to_hsv([1.0, 0.0, 0.0]), [0.0, 1.0, 1.0]);
    let [h, s, v] = rgb_to_hsv([0.0, 0.0, 1.0]);
    assert!((h - 2.0 / 3.0).abs() < 1e-6);
    assert_eq!((s, v), (1.0, 1.0));
    let back = hsv_to_rgb([h, s, v]);
    assert!((back[2] - 1.0).abs() < 1e-6 && back[0].abs() < 1e-6);
}

#[test]
fn contrast_stretch_remaps_range() {
    let img = sample();
    let out = contrast_stretch(&img, [0.0, 1.0], [0.2, 0.8]).unwrap();
    let px = out.pixel(1, 1);
    assert!((px[0] - 0.5).abs() < 1e-6);
    let px = out.pixel(1, 0);
    assert!((px[0] - (0.9 * 0.6 + 0.2)).abs() < 1e-6);
    assert_eq!(alpha(&out), alpha(&img));

    let clipped = contrast_stretch(&img, [0.4, 0.6], [0.0, 1.0]).unwrap();
    assert_eq!(clipped.pixel(0, 0)[0], 0.0);
    assert!((clipped.pixel(0, 0)[2] - 1.0).abs() < 1e-6);

    assert!(contrast_stretch(&img, [0.8, 0.2], [0.0, 1.0]).is_err());
}

#[test]
fn brighten_is_additive_and_clamped() {
    let img = sample();
    let out = brighten(&img, 0.5).unwrap();
    assert!((out.pixel(0, 0)[0] - 0.7).abs() < 1e-6);
    assert_eq!(out.pixel(1, 0)[0], 1.0);
    let darker = brighten(&img, -0.3).unwrap();
    assert_eq!(darker.pixel(0, 0)[0], 0.0);
}

#[test]
fn color_key_clears_alpha_inside_box() {
    let rgb = ImageF32::from_raw(2, 1, Channels::Rgb, vec![0.05, 0.1, 0.0, 0.9, 0.9, 0.9]).unwrap();
    let out = color_key(&rgb, [0.0, 0.0, 0.0], [0.2, 0.2, 0.2], KeySpace::Rgb).unwrap();
    assert_eq!(out.channels(), Channels::Rgba);
    assert_eq!(out.pixel(0, 0)[3], 0.0);
    assert_eq!(out.pixel(1, 0)[3], 1.0);
}

#[test]
fn hsv_key_selects_a_hue_band() {
    let px = [
        0.1, 0.2, 0.9, 1.0, // blue
        0.05, 0.1, 0.4, 1.0, // darker blue, same hue family
        0.9, 0.1, 0.1, 1.0, // red
        0.5, 0.5, 0.5, 1.0, // gray, zero saturation
    ];
    let img = ImageF32::from_raw(4, 1, Channels::Rgba, px.to_vec()).unwrap();
    let out = color_key(&img, [0.55, 0.5, 0.2], [0.75, 1.0, 1.0], KeySpace::Hsv).unwrap();
    let alpha: Vec<f32> = out.pixels().map(|p| p[3]).collect();
    assert_eq!(alpha, vec![0.0, 0.0, 1.0, 1.0]);

    // The same numbers read as RGB bounds key nothing here.
    let rgb = color_key(&img, [0.55, 0.5, 0.2], [0.75, 1.0, 1.0], KeySpace::Rgb).unwrap();
    assert!(rgb.pixels().all(|p| p[3] == 1.0));
}
