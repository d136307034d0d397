use image::imageops::FilterType;

use crate::{
    foundation::core::{Affine, Vec2},
    foundation::error::{LayercastError, LayercastResult},
    foundation::math::{clamp01, ensure_finite, ensure_non_negative},
    raster::{Channels, ImageF32},
};

/// Shift the whole image (alpha included) by `(dx, dy)` pixels.
///
/// Samples bilinearly; pixels revealed at the edges repeat the nearest edge pixel.
pub fn translate(image: &ImageF32, dx: f32, dy: f32) -> LayercastResult<ImageF32> {
    ensure_finite(f64::from(dx), "translate dx")?;
    ensure_finite(f64::from(dy), "translate dy")?;
    if dx == 0.0 && dy == 0.0 {
        return Ok(image.clone());
    }
    let inverse = Affine::translate(Vec2::new(f64::from(dx), f64::from(dy))).inverse();
    warp(image, inverse)
}

/// Resample `image` through `inverse` (output pixel -> source coordinate) with edge clamping.
pub fn warp(image: &ImageF32, inverse: Affine) -> LayercastResult<ImageF32> {
    let (w, h) = image.dimensions();
    if w == 0 || h == 0 {
        return Ok(image.clone());
    }
    let n = image.channels().count();
    let src = image.as_slice();
    let mut out = image.clone();
    let dst = out.as_mut_slice();

    let max_x = f64::from(w - 1);
    let max_y = f64::from(h - 1);
    let stride = w as usize;
    for y in 0..h {
        for x in 0..w {
            let p = inverse * kurbo::Point::new(f64::from(x), f64::from(y));
            let sx = p.x.clamp(0.0, max_x);
            let sy = p.y.clamp(0.0, max_y);
            let x0 = sx.floor() as usize;
            let y0 = sy.floor() as usize;
            let x1 = (x0 + 1).min(stride - 1);
            let y1 = (y0 + 1).min(h as usize - 1);
            let fx = (sx - x0 as f64) as f32;
            let fy = (sy - y0 as f64) as f32;

            let i00 = (y0 * stride + x0) * n;
            let i10 = (y0 * stride + x1) * n;
            let i01 = (y1 * stride + x0) * n;
            let i11 = (y1 * stride + x1) * n;
            let o = ((y as usize) * stride + x as usize) * n;
            for c in 0..n {
                let top = src[i00 + c] + (src[i10 + c] - src[i00 + c]) * fx;
                let bottom = src[i01 + c] + (src[i11 + c] - src[i01 + c]) * fx;
                dst[o + c] = top + (bottom - top) * fy;
            }
        }
    }
    Ok(out)
}

/// Resize by `factor` using Lanczos3. This is the one filter that changes the image shape.
pub fn resize(image: &ImageF32, factor: f32) -> LayercastResult<ImageF32> {
    ensure_non_negative(f64::from(factor), "resize factor")?;
    let (w, h) = image.dimensions();
    let nw = ((w as f32) * factor) as u32;
    let nh = ((h as f32) * factor) as u32;
    if nw == 0 || nh == 0 {
        return Err(LayercastError::input(format!(
            "resize factor {factor} collapses a {w}x{h} image"
        )));
    }
    if (nw, nh) == (w, h) {
        return Ok(image.clone());
    }
    resample(image, nw, nh, FilterType::Lanczos3)
}

/// Block pixelation: nearest downscale by `block`, then nearest upscale to the original size.
pub fn pixelize(image: &ImageF32, block: u32) -> LayercastResult<ImageF32> {
    if block == 0 {
        return Err(LayercastError::input("pixelize block size must be > 0"));
    }
    if block == 1 {
        return Ok(image.clone());
    }
    let (w, h) = image.dimensions();
    let small = resample(
        image,
        (w / block).max(1),
        (h / block).max(1),
        FilterType::Nearest,
    )?;
    resample(&small, w, h, FilterType::Nearest)
}

fn resample(image: &ImageF32, nw: u32, nh: u32, filter: FilterType) -> LayercastResult<ImageF32> {
    let (w, h) = image.dimensions();
    let raw = image.as_slice().to_vec();
    let data = match image.channels() {
        Channels::Rgb => {
            let buf = image::Rgb32FImage::from_raw(w, h, raw)
                .ok_or_else(|| LayercastError::input("rgb buffer does not match dimensions"))?;
            image::imageops::resize(&buf, nw, nh, filter).into_raw()
        }
        Channels::Rgba => {
            let buf = image::Rgba32FImage::from_raw(w, h, raw)
                .ok_or_else(|| LayercastError::input("rgba buffer does not match dimensions"))?;
            image::imageops::resize(&buf, nw, nh, filter).into_raw()
        }
    };
    let data = data.into_iter().map(clamp01).collect();
    ImageF32::from_raw(nw, nh, image.channels(), data)
}

#[cfg(test)]
#[path = "../../tests/unit/effects/geometry.rs"]
mod tests;
