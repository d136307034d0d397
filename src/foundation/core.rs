use crate::foundation::error::{LayercastError, LayercastResult};

pub use kurbo::{Affine, Vec2};

/// Zero-based index of a frame within an animation.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

/// Output canvas dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> LayercastResult<Self> {
        if width == 0 || height == 0 {
            return Err(LayercastError::validation(
                "canvas width/height must be non-zero",
            ));
        }
        Ok(Self { width, height })
    }

    pub fn pixel_count(self) -> usize {
        (self.width as usize) * (self.height as usize)
    }
}

/// Top-left placement of a layer on the canvas. Negative values are allowed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Offset {
    #[serde(default)]
    pub x: i64,
    #[serde(default)]
    pub y: i64,
}

impl Offset {
    pub const ORIGIN: Offset = Offset { x: 0, y: 0 };

    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    pub fn is_origin(self) -> bool {
        self == Self::ORIGIN
    }
}

/// Reference point a [`Placement`] offset is measured from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Anchor {
    /// Offset is the layer's top-left corner on the canvas.
    #[default]
    TopLeft,
    /// Offset is added to the position that centers the layer on the canvas.
    Center,
}

/// How a layer sits on the canvas: position, anchor and opacity.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Placement {
    #[serde(default)]
    pub x: i64,
    #[serde(default)]
    pub y: i64,
    #[serde(default = "full_opacity")]
    pub opacity: f32,
    #[serde(default)]
    pub anchor: Anchor,
}

fn full_opacity() -> f32 {
    1.0
}

impl Default for Placement {
    fn default() -> Self {
        Self {
            x: 0,
            y: 0,
            opacity: full_opacity(),
            anchor: Anchor::TopLeft,
        }
    }
}

impl Placement {
    pub fn at(x: i64, y: i64) -> Self {
        Self {
            x,
            y,
            ..Self::default()
        }
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn with_anchor(mut self, anchor: Anchor) -> Self {
        self.anchor = anchor;
        self
    }

    pub fn validate(&self) -> LayercastResult<()> {
        if !(0.0..=1.0).contains(&self.opacity) {
            return Err(LayercastError::validation(format!(
                "opacity must be within [0, 1], got {}",
                self.opacity
            )));
        }
        Ok(())
    }

    /// Top-left canvas position of a `width` x `height` layer.
    pub fn offset_on(&self, canvas: Canvas, width: u32, height: u32) -> Offset {
        let (ax, ay) = match self.anchor {
            Anchor::TopLeft => (0, 0),
            Anchor::Center => (
                (i64::from(canvas.width) - i64::from(width)) / 2,
                (i64::from(canvas.height) - i64::from(height)) / 2,
            ),
        };
        Offset::new(ax.saturating_add(self.x), ay.saturating_add(self.y))
    }
}
