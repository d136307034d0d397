//! Total-variation denoising (Chambolle's projection algorithm). RGB is smoothed as one
//! `(y, x, channel)` volume, so the channel axis carries a gradient like the spatial ones.

use crate::{
    foundation::error::LayercastResult,
    foundation::math::ensure_non_negative,
    raster::ImageF32,
};

const EPS: f32 = 2.0e-4;
const MAX_ITERS: usize = 200;
const AXES: usize = 3;

/// Smooth RGB with total-variation weight `weight`; alpha is copied through.
///
/// Larger weights remove more noise at the cost of fidelity. `weight == 0` returns the input.
pub fn denoise_tv(image: &ImageF32, weight: f32) -> LayercastResult<ImageF32> {
    ensure_non_negative(f64::from(weight), "denoise weight")?;
    image.require_alpha("denoise")?;
    if weight == 0.0 {
        return Ok(image.clone());
    }

    let (w, h) = (image.width() as usize, image.height() as usize);
    let n = image.channels().count();
    let volume: Vec<f32> = image.pixels().flat_map(|px| [px[0], px[1], px[2]]).collect();
    let smoothed = tv_chambolle_3d(&volume, [h, w, 3], weight);

    let mut out = image.clone();
    for (px, rgb) in out
        .as_mut_slice()
        .chunks_exact_mut(n)
        .zip(smoothed.chunks_exact(3))
    {
        for (dst, v) in px[..3].iter_mut().zip(rgb) {
            *dst = v.clamp(0.0, 1.0);
        }
    }
    Ok(out)
}

/// Chambolle iterations over a row-major volume of shape `dims`.
fn tv_chambolle_3d(img: &[f32], dims: [usize; AXES], weight: f32) -> Vec<f32> {
    let len = img.len();
    let strides = [dims[1] * dims[2], dims[2], 1];
    let coord = |k: usize, ax: usize| (k / strides[ax]) % dims[ax];

    let mut p = [vec![0.0f32; len], vec![0.0f32; len], vec![0.0f32; len]];
    let mut g = [vec![0.0f32; len], vec![0.0f32; len], vec![0.0f32; len]];
    let mut d = vec![0.0f32; len];
    let mut out = img.to_vec();

    let tau = 1.0 / (2.0 * AXES as f32);
    let mut e_init = 0.0f32;
    let mut e_prev = 0.0f32;

    for i in 0..MAX_ITERS {
        if i > 0 {
            // d = negative divergence of p
            for k in 0..len {
                let mut v = 0.0;
                for ax in 0..AXES {
                    v -= p[ax][k];
                    if coord(k, ax) > 0 {
                        v += p[ax][k - strides[ax]];
                    }
                }
                d[k] = v;
            }
            for k in 0..len {
                out[k] = img[k] + d[k];
            }
        }
        let mut energy: f32 = d.iter().map(|v| v * v).sum();

        for ax in 0..AXES {
            for k in 0..len {
                g[ax][k] = if coord(k, ax) + 1 < dims[ax] {
                    out[k + strides[ax]] - out[k]
                } else {
                    0.0
                };
            }
        }

        for k in 0..len {
            let norm = (0..AXES).map(|ax| g[ax][k] * g[ax][k]).sum::<f32>().sqrt();
            energy += weight * norm;
            let scale = 1.0 + norm * tau / weight;
            for ax in 0..AXES {
                p[ax][k] = (p[ax][k] - tau * g[ax][k]) / scale;
            }
        }
        energy /= len as f32;

        if i == 0 {
            e_init = energy;
            e_prev = energy;
        } else if (e_prev - energy).abs() < EPS * e_init {
            break;
        } else {
            e_prev = energy;
        }
    }
    out
}
