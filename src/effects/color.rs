//! Per-pixel color filters. RGB channels are transformed, alpha passes through.

use crate::{
    foundation::error::{LayercastError, LayercastResult},
    foundation::math::{clamp01, ensure_finite, ensure_non_negative},
    raster::{Channels, ImageF32},
};

fn map_rgb(image: &ImageF32, mut f: impl FnMut(&mut [f32])) -> ImageF32 {
    let mut out = image.clone();
    for px in out.pixels_mut() {
        f(&mut px[..3]);
    }
    out
}

/// `out = in^gamma` on RGB. `gamma < 1` brightens, `gamma > 1` darkens.
pub fn gamma(image: &ImageF32, gamma: f32) -> LayercastResult<ImageF32> {
    ensure_non_negative(f64::from(gamma), "gamma")?;
    image.require_alpha("gamma")?;
    if gamma == 1.0 {
        return Ok(image.clone());
    }
    Ok(map_rgb(image, |rgb| {
        for c in rgb {
            *c = c.max(0.0).powf(gamma);
        }
    }))
}

/// Boost red by `intensity` and pull green/blue down proportionally.
pub fn red_tint(image: &ImageF32, intensity: f32) -> LayercastResult<ImageF32> {
    ensure_non_negative(f64::from(intensity), "red tint intensity")?;
    image.require_alpha("red tint")?;
    let scale = (1.0 - 0.5 * (intensity - 1.0)).max(0.0);
    Ok(map_rgb(image, |rgb| {
        rgb[0] = clamp01(rgb[0] * intensity);
        rgb[1] = clamp01(rgb[1] * scale);
        rgb[2] = clamp01(rgb[2] * scale);
    }))
}

/// Uniform RGB scale by `1 - 0.5 * (intensity - 1)`.
pub fn scale_darken(image: &ImageF32, intensity: f32) -> LayercastResult<ImageF32> {
    ensure_non_negative(f64::from(intensity), "darken intensity")?;
    image.require_alpha("darken")?;
    let scale = 1.0 - (intensity - 1.0) * 0.5;
    Ok(map_rgb(image, |rgb| {
        for c in rgb {
            *c = clamp01(*c * scale);
        }
    }))
}

/// Multiply HSV saturation by `factor`.
pub fn saturate(image: &ImageF32, factor: f32) -> LayercastResult<ImageF32> {
    ensure_non_negative(f64::from(factor), "saturation factor")?;
    image.require_alpha("saturate")?;
    Ok(map_rgb(image, |rgb| {
        let [h, s, v] = rgb_to_hsv([rgb[0], rgb[1], rgb[2]]);
        let out = hsv_to_rgb([h, clamp01(s * factor), v]);
        rgb.copy_from_slice(&out);
    }))
}

/// Clip each RGB channel to `in_range` and map it linearly onto `out_range`.
pub fn contrast_stretch(
    image: &ImageF32,
    in_range: [f32; 2],
    out_range: [f32; 2],
) -> LayercastResult<ImageF32> {
    for v in in_range.iter().chain(out_range.iter()) {
        ensure_finite(f64::from(*v), "contrast range bound")?;
    }
    let [imin, imax] = in_range;
    let [omin, omax] = out_range;
    if imin > imax {
        return Err(LayercastError::input(
            "contrast in_range lower bound must be <= upper bound",
        ));
    }
    let span = imax - imin;
    Ok(map_rgb(image, |rgb| {
        for c in rgb {
            let mut v = c.clamp(imin, imax);
            if span != 0.0 {
                v = (v - imin) / span;
            }
            *c = v * (omax - omin) + omin;
        }
    }))
}

/// Additive brightness: `clamp(c + offset)`.
pub fn brighten(image: &ImageF32, offset: f32) -> LayercastResult<ImageF32> {
    ensure_finite(f64::from(offset), "brighten offset")?;
    Ok(map_rgb(image, |rgb| {
        for c in rgb {
            *c = clamp01(*c + offset);
        }
    }))
}

/// Multiplicative brightness: `clamp(c * factor)`.
pub fn brightness(image: &ImageF32, factor: f32) -> LayercastResult<ImageF32> {
    ensure_non_negative(f64::from(factor), "brightness factor")?;
    Ok(map_rgb(image, |rgb| {
        for c in rgb {
            *c = clamp01(*c * factor);
        }
    }))
}

/// Blend each pixel with its Rec.601 luma; `0` is grayscale, `1` is identity.
pub fn color_enhance(image: &ImageF32, factor: f32) -> LayercastResult<ImageF32> {
    ensure_non_negative(f64::from(factor), "color enhance factor")?;
    Ok(map_rgb(image, |rgb| {
        let l = 0.299 * rgb[0] + 0.587 * rgb[1] + 0.114 * rgb[2];
        for c in rgb {
            *c = clamp01(l + (*c - l) * factor);
        }
    }))
}

/// Color space in which [`color_key`] bounds are expressed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeySpace {
    #[default]
    Rgb,
    /// Hue, saturation and value, all in `[0, 1]` (hue as a fraction of a turn).
    Hsv,
}

/// Make pixels whose color lies inside `[lower, upper]` (inclusive) fully transparent.
pub fn color_key(
    image: &ImageF32,
    lower: [f32; 3],
    upper: [f32; 3],
    space: KeySpace,
) -> LayercastResult<ImageF32> {
    for v in lower.iter().chain(upper.iter()) {
        ensure_finite(f64::from(*v), "color key bound")?;
    }
    let mut out = image.with_alpha();
    for px in out.pixels_mut() {
        let color = match space {
            KeySpace::Rgb => [px[0], px[1], px[2]],
            KeySpace::Hsv => rgb_to_hsv([px[0], px[1], px[2]]),
        };
        let inside = (0..3).all(|i| color[i] >= lower[i] && color[i] <= upper[i]);
        if inside {
            px[3] = 0.0;
        }
    }
    debug_assert_eq!(out.channels(), Channels::Rgba);
    Ok(out)
}

/// RGB in `[0,1]` to HSV with hue in `[0,1)`.
pub fn rgb_to_hsv([r, g, b]: [f32; 3]) -> [f32; 3] {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;
    let v = max;
    if delta <= 0.0 {
        return [0.0, 0.0, v];
    }
    let s = if v > 0.0 { delta / v } else { 0.0 };
    let h = if r == max {
        (g - b) / delta
    } else if g == max {
        2.0 + (b - r) / delta
    } else {
        4.0 + (r - g) / delta
    };
    let h = (h / 6.0).rem_euclid(1.0);
    [h, s, v]
}

pub fn hsv_to_rgb([h, s, v]: [f32; 3]) -> [f32; 3] {
    let h6 = h * 6.0;
    let hi = h6.floor();
    let f = h6 - hi;
    let p = v * (1.0 - s);
    let q = v * (1.0 - f * s);
    let t = v * (1.0 - (1.0 - f) * s);
    match (hi as i64).rem_euclid(6) {
        0 => [v, t, p],
        1 => [q, v, p],
        2 => [p, v, t],
        3 => [p, q, v],
        4 => [t, p, v],
        _ => [v, p, q],
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/color.rs"]
mod tests;
