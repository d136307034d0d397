use crate::{
    animation::curve::{Curve, SampleCtx},
    effects::fx::Filter,
    foundation::error::LayercastResult,
    foundation::math::Rng64,
};

/// What an animation track modifies.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Target {
    /// A single named layer, before compositing.
    Layer(String),
    /// The finished composite of each frame.
    Composite,
}

/// A filter whose numeric parameters are curves over the frame index.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnimatedFilter {
    Gamma {
        gamma: Curve,
    },
    RedTint {
        intensity: Curve,
    },
    Saturate {
        factor: Curve,
    },
    Brighten {
        offset: Curve,
    },
    Brightness {
        factor: Curve,
    },
    Translate {
        #[serde(default = "zero_curve")]
        dx: Curve,
        #[serde(default = "zero_curve")]
        dy: Curve,
    },
    Glitch {
        blocks: Curve,
        #[serde(default = "default_block_size")]
        block_size: u32,
        #[serde(default = "default_max_offset")]
        max_offset: u32,
        #[serde(default)]
        seed: u64,
    },
}

fn zero_curve() -> Curve {
    Curve::Constant { value: 0.0 }
}

fn default_block_size() -> u32 {
    50
}

fn default_max_offset() -> u32 {
    30
}

impl AnimatedFilter {
    pub fn curves(&self) -> Vec<&Curve> {
        match self {
            AnimatedFilter::Gamma { gamma } => vec![gamma],
            AnimatedFilter::RedTint { intensity } => vec![intensity],
            AnimatedFilter::Saturate { factor } | AnimatedFilter::Brightness { factor } => {
                vec![factor]
            }
            AnimatedFilter::Brighten { offset } => vec![offset],
            AnimatedFilter::Translate { dx, dy } => vec![dx, dy],
            AnimatedFilter::Glitch { blocks, .. } => vec![blocks],
        }
    }

    /// Fold a run-wide seed into glitch seeds; other filters are unchanged.
    pub fn with_base_seed(mut self, base: u64) -> Self {
        if let AnimatedFilter::Glitch { seed, .. } = &mut self {
            *seed ^= base;
        }
        self
    }

    /// The concrete filter for one frame.
    pub fn sample(&self, ctx: SampleCtx) -> LayercastResult<Filter> {
        let f = |c: &Curve| -> LayercastResult<f32> { Ok(c.sample(ctx)? as f32) };
        let filter = match self {
            AnimatedFilter::Gamma { gamma } => Filter::Gamma { gamma: f(gamma)? },
            AnimatedFilter::RedTint { intensity } => Filter::RedTint {
                intensity: f(intensity)?,
            },
            AnimatedFilter::Saturate { factor } => Filter::Saturate { factor: f(factor)? },
            AnimatedFilter::Brighten { offset } => Filter::Brighten { offset: f(offset)? },
            AnimatedFilter::Brightness { factor } => Filter::Brightness { factor: f(factor)? },
            AnimatedFilter::Translate { dx, dy } => Filter::Translate {
                dx: f(dx)?,
                dy: f(dy)?,
            },
            AnimatedFilter::Glitch {
                blocks,
                block_size,
                max_offset,
                seed,
            } => Filter::Glitch {
                blocks: blocks.sample(ctx)?.round().max(0.0) as u32,
                block_size: *block_size,
                max_offset: *max_offset,
                seed: Rng64::for_frame(*seed, ctx.frame.0).next_u64(),
            },
        };
        Ok(filter)
    }
}

/// One animated modification applied on every frame.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Track {
    pub target: Target,
    pub filter: AnimatedFilter,
}

impl Track {
    pub fn layer(name: impl Into<String>, filter: AnimatedFilter) -> Self {
        Self {
            target: Target::Layer(name.into()),
            filter,
        }
    }

    pub fn composite(filter: AnimatedFilter) -> Self {
        Self {
            target: Target::Composite,
            filter,
        }
    }

    pub fn validate(&self) -> LayercastResult<()> {
        for c in self.filter.curves() {
            c.validate()?;
        }
        // Frame 0 of a one-frame run catches static parameter problems early.
        self.filter.sample(SampleCtx::new(0, 1))?.validate()
    }
}
