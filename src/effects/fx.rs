use crate::{
    effects::color::KeySpace,
    effects::{color, denoise, geometry, glitch},
    foundation::error::{LayercastError, LayercastResult},
    raster::ImageF32,
};

/// A single image-to-image transform with its parameters.
///
/// Serialized as an internally tagged object, e.g. `{"kind": "red_tint", "intensity": 1.2}`.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Filter {
    Gamma {
        gamma: f32,
    },
    RedTint {
        intensity: f32,
    },
    Saturate {
        factor: f32,
    },
    Denoise {
        weight: f32,
    },
    ContrastStretch {
        in_range: [f32; 2],
        out_range: [f32; 2],
    },
    Translate {
        #[serde(default)]
        dx: f32,
        #[serde(default)]
        dy: f32,
    },
    Brighten {
        offset: f32,
    },
    Brightness {
        factor: f32,
    },
    ScaleDarken {
        intensity: f32,
    },
    ColorEnhance {
        factor: f32,
    },
    ColorKey {
        lower: [f32; 3],
        upper: [f32; 3],
        #[serde(default)]
        space: KeySpace,
    },
    Pixelize {
        block: u32,
    },
    Resize {
        factor: f32,
    },
    Glitch {
        blocks: u32,
        #[serde(default = "default_block_size")]
        block_size: u32,
        #[serde(default = "default_max_offset")]
        max_offset: u32,
        #[serde(default)]
        seed: u64,
    },
}

fn default_block_size() -> u32 {
    50
}

fn default_max_offset() -> u32 {
    30
}

impl Filter {
    /// Stable snake_case name, matching the serialized `kind`.
    pub fn name(&self) -> &'static str {
        match self {
            Filter::Gamma { .. } => "gamma",
            Filter::RedTint { .. } => "red_tint",
            Filter::Saturate { .. } => "saturate",
            Filter::Denoise { .. } => "denoise",
            Filter::ContrastStretch { .. } => "contrast_stretch",
            Filter::Translate { .. } => "translate",
            Filter::Brighten { .. } => "brighten",
            Filter::Brightness { .. } => "brightness",
            Filter::ScaleDarken { .. } => "scale_darken",
            Filter::ColorEnhance { .. } => "color_enhance",
            Filter::ColorKey { .. } => "color_key",
            Filter::Pixelize { .. } => "pixelize",
            Filter::Resize { .. } => "resize",
            Filter::Glitch { .. } => "glitch",
        }
    }

    /// Check parameters without touching pixels.
    pub fn validate(&self) -> LayercastResult<()> {
        let non_negative = |v: f32, what: &str| {
            if !v.is_finite() || v < 0.0 {
                Err(LayercastError::input(format!(
                    "{} {what} must be finite and >= 0",
                    self.name()
                )))
            } else {
                Ok(())
            }
        };
        let finite = |vals: &[f32]| {
            if vals.iter().all(|v| v.is_finite()) {
                Ok(())
            } else {
                Err(LayercastError::input(format!(
                    "{} parameters must be finite",
                    self.name()
                )))
            }
        };

        match *self {
            Filter::Gamma { gamma } => non_negative(gamma, "gamma"),
            Filter::RedTint { intensity } | Filter::ScaleDarken { intensity } => {
                non_negative(intensity, "intensity")
            }
            Filter::Saturate { factor }
            | Filter::Brightness { factor }
            | Filter::ColorEnhance { factor } => non_negative(factor, "factor"),
            Filter::Denoise { weight } => non_negative(weight, "weight"),
            Filter::ContrastStretch {
                in_range,
                out_range,
            } => {
                finite(&[in_range[0], in_range[1], out_range[0], out_range[1]])?;
                if in_range[0] > in_range[1] {
                    return Err(LayercastError::input(
                        "contrast_stretch in_range lower bound must be <= upper bound",
                    ));
                }
                Ok(())
            }
            Filter::Translate { dx, dy } => finite(&[dx, dy]),
            Filter::Brighten { offset } => finite(&[offset]),
            Filter::ColorKey { lower, upper, .. } => finite(&[
                lower[0], lower[1], lower[2], upper[0], upper[1], upper[2],
            ]),
            Filter::Pixelize { block } => {
                if block == 0 {
                    return Err(LayercastError::input("pixelize block must be > 0"));
                }
                Ok(())
            }
            Filter::Resize { factor } => {
                non_negative(factor, "factor")?;
                if factor == 0.0 {
                    return Err(LayercastError::input("resize factor must be > 0"));
                }
                Ok(())
            }
            Filter::Glitch { block_size, .. } => {
                if block_size == 0 {
                    return Err(LayercastError::input("glitch block_size must be > 0"));
                }
                Ok(())
            }
        }
    }

    /// Apply this filter, returning a new image.
    pub fn apply(&self, image: &ImageF32) -> LayercastResult<ImageF32> {
        match *self {
            Filter::Gamma { gamma } => color::gamma(image, gamma),
            Filter::RedTint { intensity } => color::red_tint(image, intensity),
            Filter::Saturate { factor } => color::saturate(image, factor),
            Filter::Denoise { weight } => denoise::denoise_tv(image, weight),
            Filter::ContrastStretch {
                in_range,
                out_range,
            } => color::contrast_stretch(image, in_range, out_range),
            Filter::Translate { dx, dy } => geometry::translate(image, dx, dy),
            Filter::Brighten { offset } => color::brighten(image, offset),
            Filter::Brightness { factor } => color::brightness(image, factor),
            Filter::ScaleDarken { intensity } => color::scale_darken(image, intensity),
            Filter::ColorEnhance { factor } => color::color_enhance(image, factor),
            Filter::ColorKey {
                lower,
                upper,
                space,
            } => color::color_key(image, lower, upper, space),
            Filter::Pixelize { block } => geometry::pixelize(image, block),
            Filter::Resize { factor } => geometry::resize(image, factor),
            Filter::Glitch {
                blocks,
                block_size,
                max_offset,
                seed,
            } => glitch::glitch(
                image,
                glitch::GlitchParams {
                    blocks,
                    block_size,
                    max_offset,
                    seed,
                },
            ),
        }
    }
}

pub fn apply_filter(image: &ImageF32, filter: &Filter) -> LayercastResult<ImageF32> {
    filter.apply(image)
}

/// Apply `filters` left to right; each output feeds the next filter.
pub fn apply_chain(image: &ImageF32, filters: &[Filter]) -> LayercastResult<ImageF32> {
    let Some((first, rest)) = filters.split_first() else {
        return Ok(image.clone());
    };
    let mut out = apply_filter(image, first)?;
    for f in rest {
        out = f.apply(&out)?;
    }
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/effects/fx.rs"]
mod tests;
