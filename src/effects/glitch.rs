use crate::{
    foundation::error::{LayercastError, LayercastResult},
    foundation::math::Rng64,
    raster::ImageF32,
};

/// Parameters for [`glitch`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GlitchParams {
    /// Number of displaced blocks.
    pub blocks: u32,
    /// Maximum block edge length in pixels.
    pub block_size: u32,
    /// Maximum displacement along each axis in pixels.
    pub max_offset: u32,
    pub seed: u64,
}

/// Copy random rectangular blocks to randomly displaced positions.
///
/// Blocks are cut from the progressively glitched image, so later blocks may carry earlier
/// displacements. Pastes are clipped to the image bounds and replace every channel.
pub fn glitch(image: &ImageF32, params: GlitchParams) -> LayercastResult<ImageF32> {
    if params.block_size == 0 {
        return Err(LayercastError::input("glitch block_size must be > 0"));
    }
    let mut out = image.clone();
    let (w, h) = (i64::from(image.width()), i64::from(image.height()));
    if params.blocks == 0 || w == 0 || h == 0 {
        return Ok(out);
    }

    let bs = i64::from(params.block_size);
    let max_off = i64::from(params.max_offset);
    let n = image.channels().count();
    let mut rng = Rng64::new(params.seed);
    let mut region = Vec::new();

    for _ in 0..params.blocks {
        let x0 = rng.range_i64(0, (w - bs).max(0));
        let y0 = rng.range_i64(0, (h - bs).max(0));
        let x1 = rng.range_i64(x0 + 1, (x0 + bs).min(w));
        let y1 = rng.range_i64(y0 + 1, (y0 + bs).min(h));
        let ox = rng.range_i64(-max_off, max_off);
        let oy = rng.range_i64(-max_off, max_off);

        let bw = (x1 - x0) as usize;
        region.clear();
        for y in y0..y1 {
            let start = ((y * w + x0) as usize) * n;
            region.extend_from_slice(&out.as_slice()[start..start + bw * n]);
        }

        let dst = out.as_mut_slice();
        for (row, y) in (y0..y1).enumerate() {
            let ty = y + oy;
            if !(0..h).contains(&ty) {
                continue;
            }
            for (col, x) in (x0..x1).enumerate() {
                let tx = x + ox;
                if !(0..w).contains(&tx) {
                    continue;
                }
                let s = (row * bw + col) * n;
                let d = ((ty * w + tx) as usize) * n;
                dst[d..d + n].copy_from_slice(&region[s..s + n]);
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/effects/glitch.rs"]
mod tests;
