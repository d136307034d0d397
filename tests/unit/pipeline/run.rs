use std::path::PathBuf;

use super::*;
use crate::foundation::core::{Anchor, Placement};
use crate::raster::Channels;

fn scratch(name: &str) -> PathBuf {
    let dir = PathBuf::from("target").join("unit_pipeline").join(name);
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn write_png(path: &Path, w: u32, h: u32, px: [f32; 4]) {
    let img = ImageF32::filled(w, h, Channels::Rgba, &px).unwrap();
    export_image(&img, path, ExportOptions::default()).unwrap();
}

fn config(dir: &Path, order: &[&str]) -> PipelineConfig {
    let mut cfg = PipelineConfig::from_json(r#"{"layers_dir": ".", "layer_order": []}"#).unwrap();
    cfg.layers_dir = dir.to_path_buf();
    cfg.layer_order = order.iter().map(|s| s.to_string()).collect();
    cfg
}

#[test]
fn missing_layers_are_skipped_unless_strict() {
    let dir = scratch("missing");
    write_png(&dir.join("a.png"), 4, 4, [0.2, 0.4, 0.6, 1.0]);

    let p = Pipeline::load(config(&dir, &["a.png", "b.png"])).unwrap();
    assert_eq!(p.animator().base().len(), 1);
    let still = p.render_still().unwrap();
    assert_eq!(still.dimensions(), (4, 4));
    assert!((still.pixel(3, 3)[1] - 0.4).abs() <= 1.0 / 255.0);

    let mut strict = config(&dir, &["a.png", "b.png"]);
    strict.strict = true;
    assert!(matches!(
        Pipeline::load(strict),
        Err(LayercastError::Input(_))
    ));
}

#[test]
fn placements_and_layer_filters_are_applied_once() {
    let dir = scratch("placed");
    write_png(&dir.join("bg.png"), 4, 4, [0.0, 0.0, 0.0, 1.0]);
    write_png(&dir.join("dot.png"), 1, 1, [0.5, 0.5, 0.5, 1.0]);

    let mut cfg = config(&dir, &["bg.png", "dot.png"]);
    cfg.placements.insert("dot.png".into(), Placement::at(2, 1));
    cfg.filters.insert(
        "dot.png".into(),
        vec![crate::effects::fx::Filter::Brighten { offset: 0.25 }],
    );
    let p = Pipeline::load(cfg).unwrap();
    let still = p.render_still().unwrap();
    assert!((still.pixel(2, 1)[0] - (128.0 / 255.0 + 0.25)).abs() < 1e-5);
    assert_eq!(still.pixel(0, 0)[0], 0.0);
}

#[test]
fn centered_translucent_placement_lands_mid_canvas() {
    let dir = scratch("centered");
    write_png(&dir.join("bg.png"), 6, 6, [0.0, 0.0, 0.0, 1.0]);
    write_png(&dir.join("dot.png"), 2, 2, [1.0, 1.0, 1.0, 1.0]);

    let mut cfg = config(&dir, &["bg.png", "dot.png"]);
    cfg.placements.insert(
        "dot.png".into(),
        Placement::default()
            .with_anchor(Anchor::Center)
            .with_opacity(0.5),
    );
    let p = Pipeline::load(cfg).unwrap();
    let dot = p.animator().base().get("dot.png").unwrap();
    assert_eq!((dot.offset.x, dot.offset.y), (2, 2));
    assert_eq!(dot.opacity, 0.5);

    let still = p.render_still().unwrap();
    for (x, y) in [(2, 2), (3, 2), (2, 3), (3, 3)] {
        assert!((still.pixel(x, y)[0] - 0.5).abs() < 1e-6, "({x}, {y})");
    }
    assert_eq!(still.pixel(1, 1)[0], 0.0);
    assert_eq!(still.pixel(4, 4)[0], 0.0);
}

#[test]
fn sequence_layers_cycle_through_their_frames() {
    let dir = scratch("sequence");
    let frames = dir.join("frames");
    write_png(&frames.join("frame_2.png"), 2, 2, [0.0, 0.0, 1.0, 1.0]);
    write_png(&frames.join("frame_1.png"), 2, 2, [1.0, 0.0, 0.0, 1.0]);

    let mut cfg = config(&dir, &["clip"]);
    cfg.sequences.insert("clip".into(), frames);
    let p = Pipeline::load(cfg).unwrap();
    let seq = p.render_frames(Some(3)).unwrap();
    assert_eq!(seq.frames()[0].pixel(0, 0)[0], 1.0);
    assert_eq!(seq.frames()[1].pixel(0, 0)[2], 1.0);
    assert_eq!(seq.frames()[2], seq.frames()[0]);
}

#[test]
fn animation_needs_a_frame_count_and_target() {
    let dir = scratch("no_anim");
    write_png(&dir.join("a.png"), 2, 2, [0.0, 0.0, 0.0, 1.0]);
    let p = Pipeline::load(config(&dir, &["a.png"])).unwrap();
    assert!(matches!(
        p.render_frames(None),
        Err(LayercastError::Validation(_))
    ));
    assert!(
        p.export_animation(Some(2), None, ExportOptions::default())
            .is_err()
    );
}

#[test]
fn nothing_loaded_and_no_canvas_is_an_input_error() {
    let dir = scratch("empty");
    let err = Pipeline::load(config(&dir, &["ghost.png"])).unwrap_err();
    assert!(matches!(err, LayercastError::Input(_)));
}
