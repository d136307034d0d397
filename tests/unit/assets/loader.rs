use std::path::PathBuf;

use super::*;
use crate::raster::Channels;

fn scratch_dir(name: &str) -> PathBuf {
    let dir = PathBuf::from("target").join("unit_loader").join(name);
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn write_rgba(dir: &std::path::Path, name: &str, px: [u8; 4]) {
    let img = image::RgbaImage::from_pixel(2, 2, image::Rgba(px));
    img.save(dir.join(name)).unwrap();
}

#[test]
fn missing_layers_are_skipped_in_order() {
    let dir = scratch_dir("skip");
    write_rgba(&dir, "a.png", [255, 0, 0, 255]);
    write_rgba(&dir, "c.png", [0, 0, 255, 255]);

    let order = vec!["a.png".to_string(), "b.png".to_string(), "c.png".to_string()];
    let set = load_layers(&dir, &order, LoadOptions::default()).unwrap();
    assert_eq!(set.names().collect::<Vec<_>>(), vec!["a.png", "c.png"]);
    assert!(set.get("b.png").is_err());
    assert_eq!(set.get("a.png").unwrap().image.channels(), Channels::Rgba);
}

#[test]
fn strict_mode_fails_on_missing_file() {
    let dir = scratch_dir("strict");
    write_rgba(&dir, "a.png", [1, 2, 3, 4]);
    let order = vec!["a.png".to_string(), "b.png".to_string()];
    let opts = LoadOptions {
        strict: true,
        ..LoadOptions::default()
    };
    let err = load_layers(&dir, &order, opts).unwrap_err();
    assert!(err.to_string().contains("b.png"));
}

#[test]
fn force_rgba_adds_alpha_to_rgb_inputs() {
    let dir = scratch_dir("force_rgba");
    image::RgbImage::from_pixel(1, 1, image::Rgb([9, 9, 9]))
        .save(dir.join("bg.png"))
        .unwrap();
    let order = vec!["bg.png".to_string()];

    let plain = load_layers(&dir, &order, LoadOptions::default()).unwrap();
    assert_eq!(plain.get("bg.png").unwrap().image.channels(), Channels::Rgb);

    let opts = LoadOptions {
        force_rgba: true,
        ..LoadOptions::default()
    };
    let forced = load_layers(&dir, &order, opts).unwrap();
    let layer = forced.get("bg.png").unwrap();
    assert_eq!(layer.image.channels(), Channels::Rgba);
    assert_eq!(layer.image.pixel(0, 0)[3], 1.0);
}

#[test]
fn duplicate_names_are_rejected() {
    let dir = scratch_dir("dupes");
    write_rgba(&dir, "a.png", [1, 2, 3, 4]);
    let order = vec!["a.png".to_string(), "a.png".to_string()];
    assert!(load_layers(&dir, &order, LoadOptions::default()).is_err());
}
