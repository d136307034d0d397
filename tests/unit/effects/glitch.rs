use super::*;
use crate::raster::Channels;

fn checker(w: u32, h: u32) -> ImageF32 {
    let mut data = Vec::new();
    for y in 0..h {
        for x in 0..w {
            let v = ((x * 7 + y * 13) % 17) as f32 / 16.0;
            data.extend_from_slice(&[v, 1.0 - v, 0.5, 1.0]);
        }
    }
    ImageF32::from_raw(w, h, Channels::Rgba, data).unwrap()
}

fn params(seed: u64) -> GlitchParams {
    GlitchParams {
        blocks: 20,
        block_size: 8,
        max_offset: 6,
        seed,
    }
}

#[test]
fn glitch_is_deterministic_for_a_seed() {
    let img = checker(32, 24);
    let a = glitch(&img, params(3)).unwrap();
    let b = glitch(&img, params(3)).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.dimensions(), img.dimensions());
    assert_ne!(a, img);
}

#[test]
fn different_seeds_differ() {
    let img = checker(32, 24);
    let a = glitch(&img, params(1)).unwrap();
    let b = glitch(&img, params(2)).unwrap();
    assert_ne!(a, b);
}

#[test]
fn zero_blocks_is_identity() {
    let img = checker(16, 16);
    let out = glitch(
        &img,
        GlitchParams {
            blocks: 0,
            ..params(9)
        },
    )
    .unwrap();
    assert_eq!(out, img);
}

#[test]
fn blocks_larger_than_image_are_clipped() {
    let img = checker(4, 3);
    let out = glitch(
        &img,
        GlitchParams {
            blocks: 50,
            block_size: 64,
            max_offset: 30,
            seed: 11,
        },
    )
    .unwrap();
    assert_eq!(out.dimensions(), (4, 3));
    assert!(
        glitch(
            &img,
            GlitchParams {
                block_size: 0,
                ..params(1)
            }
        )
        .is_err()
    );
}
