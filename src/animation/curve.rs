use std::f64::consts::TAU;

use crate::foundation::core::FrameIndex;
use crate::foundation::error::{LayercastError, LayercastResult};

/// Per-frame sampling context.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SampleCtx {
    pub frame: FrameIndex,
    /// Total frames in the sequence being rendered (>= 1).
    pub frame_count: u64,
}

impl SampleCtx {
    pub fn new(frame: u64, frame_count: u64) -> Self {
        Self {
            frame: FrameIndex(frame),
            frame_count,
        }
    }
}

/// Closed-form scalar animation: a pure function of the frame index.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Curve {
    /// Same value on every frame.
    Constant { value: f64 },
    /// `start + step * i`.
    Linear {
        #[serde(default)]
        start: f64,
        step: f64,
    },
    /// `base + amplitude * sin(2π (frequency * i + phase))`, frequency in cycles per frame.
    Sine {
        #[serde(default)]
        base: f64,
        amplitude: f64,
        frequency: f64,
        #[serde(default)]
        phase: f64,
    },
    /// Oscillates between `low` and `high`: `low + (high - low) * (sin(2π i / period) + 1) / 2`.
    ///
    /// `period` defaults to the frame count.
    Pulse {
        low: f64,
        high: f64,
        #[serde(default)]
        period: Option<f64>,
    },
    /// Evenly spaced from `from` (first frame) to `to` (last frame).
    Linspace { from: f64, to: f64 },
}

impl From<f64> for Curve {
    fn from(value: f64) -> Self {
        Curve::Constant { value }
    }
}

impl Curve {
    pub fn validate(&self) -> LayercastResult<()> {
        let finite = |vals: &[f64]| {
            if vals.iter().all(|v| v.is_finite()) {
                Ok(())
            } else {
                Err(LayercastError::animation("curve parameters must be finite"))
            }
        };
        match *self {
            Curve::Constant { value } => finite(&[value]),
            Curve::Linear { start, step } => finite(&[start, step]),
            Curve::Sine {
                base,
                amplitude,
                frequency,
                phase,
            } => finite(&[base, amplitude, frequency, phase]),
            Curve::Pulse { low, high, period } => {
                finite(&[low, high])?;
                if let Some(p) = period
                    && (!p.is_finite() || p <= 0.0)
                {
                    return Err(LayercastError::animation(
                        "pulse period must be finite and > 0",
                    ));
                }
                Ok(())
            }
            Curve::Linspace { from, to } => finite(&[from, to]),
        }
    }

    pub fn sample(&self, ctx: SampleCtx) -> LayercastResult<f64> {
        if ctx.frame_count == 0 {
            return Err(LayercastError::animation("frame_count must be > 0"));
        }
        let i = ctx.frame.0 as f64;
        let v = match *self {
            Curve::Constant { value } => value,
            Curve::Linear { start, step } => start + step * i,
            Curve::Sine {
                base,
                amplitude,
                frequency,
                phase,
            } => base + amplitude * (TAU * (frequency * i + phase)).sin(),
            Curve::Pulse { low, high, period } => {
                let period = period.unwrap_or(ctx.frame_count as f64);
                if period <= 0.0 {
                    return Err(LayercastError::animation("pulse period must be > 0"));
                }
                let t = ((TAU * i / period).sin() + 1.0) / 2.0;
                low + (high - low) * t
            }
            Curve::Linspace { from, to } => {
                if ctx.frame_count == 1 {
                    from
                } else {
                    from + (to - from) * i / (ctx.frame_count - 1) as f64
                }
            }
        };
        Ok(v)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/curve.rs"]
mod tests;
