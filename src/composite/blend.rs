use crate::{
    foundation::core::Offset,
    foundation::error::{LayercastError, LayercastResult},
    raster::ImageF32,
};

/// Alpha accumulation rule used when blending a layer onto the canvas.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlphaMode {
    /// `rgb = rgb*(1-m) + overlay*m`, `alpha = alpha*(1-m) + m`.
    ///
    /// Color is a plain lerp that ignores the canvas alpha, as in the existing
    /// layered-PNG scenes.
    #[default]
    Accumulate,
    /// Porter-Duff "over" on straight alpha.
    Over,
}

/// Blend one straight-alpha RGBA/RGB pixel onto a straight-alpha RGBA destination pixel.
#[inline]
pub fn blend_px(dst: &mut [f32], src_rgb: &[f32], m: f32, mode: AlphaMode) {
    let inv = 1.0 - m;
    match mode {
        AlphaMode::Accumulate => {
            for c in 0..3 {
                dst[c] = dst[c] * inv + src_rgb[c] * m;
            }
            dst[3] = dst[3] * inv + m;
        }
        AlphaMode::Over => {
            let da = dst[3];
            let out_a = m + da * inv;
            if out_a <= 0.0 {
                dst[..4].fill(0.0);
                return;
            }
            for c in 0..3 {
                dst[c] = (src_rgb[c] * m + dst[c] * da * inv) / out_a;
            }
            dst[3] = out_a;
        }
    }
}

/// Blend `overlay` onto `canvas` with its top-left corner at `offset`.
///
/// Overlay regions falling outside the canvas are skipped. RGB overlays are opaque.
pub fn blend_into(
    canvas: &mut ImageF32,
    overlay: &ImageF32,
    offset: Offset,
    mode: AlphaMode,
) -> LayercastResult<()> {
    blend_with_opacity(canvas, overlay, offset, 1.0, mode)
}

/// Like [`blend_into`], with every overlay alpha scaled by `opacity` in `[0, 1]`.
pub fn blend_with_opacity(
    canvas: &mut ImageF32,
    overlay: &ImageF32,
    offset: Offset,
    opacity: f32,
    mode: AlphaMode,
) -> LayercastResult<()> {
    if !canvas.has_alpha() {
        return Err(LayercastError::input("composite canvas must be RGBA"));
    }
    if !(0.0..=1.0).contains(&opacity) {
        return Err(LayercastError::input(format!(
            "layer opacity must be within [0, 1], got {opacity}"
        )));
    }
    let (cw, ch) = (i64::from(canvas.width()), i64::from(canvas.height()));
    let (ow, oh) = (i64::from(overlay.width()), i64::from(overlay.height()));

    let x_start = offset.x.max(0);
    let y_start = offset.y.max(0);
    let x_end = offset.x.saturating_add(ow).min(cw);
    let y_end = offset.y.saturating_add(oh).min(ch);
    if x_start >= x_end || y_start >= y_end {
        return Ok(());
    }

    let has_alpha = overlay.has_alpha();
    for y in y_start..y_end {
        let sy = (y - offset.y) as u32;
        for x in x_start..x_end {
            let sx = (x - offset.x) as u32;
            let src = overlay.pixel(sx, sy);
            let m = if has_alpha { src[3] } else { 1.0 } * opacity;
            if m <= 0.0 && mode == AlphaMode::Over {
                continue;
            }
            blend_px(canvas.pixel_mut(x as u32, y as u32), src, m, mode);
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/composite/blend.rs"]
mod tests;
