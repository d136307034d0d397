use crate::foundation::core::Canvas;
use crate::foundation::error::{LayercastError, LayercastResult};
use crate::foundation::math::{u8_to_unit, unit_to_u8};

/// Channel layout of an [`ImageF32`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Channels {
    Rgb,
    Rgba,
}

impl Channels {
    pub fn count(self) -> usize {
        match self {
            Channels::Rgb => 3,
            Channels::Rgba => 4,
        }
    }

    pub fn has_alpha(self) -> bool {
        matches!(self, Channels::Rgba)
    }
}

/// Row-major interleaved image with channel values normalized to `[0, 1]`.
///
/// Filters keep values inside that range; the buffer itself does not enforce it so that
/// intermediate arithmetic can be inspected in tests.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageF32 {
    width: u32,
    height: u32,
    channels: Channels,
    data: Vec<f32>,
}

impl ImageF32 {
    pub fn from_raw(
        width: u32,
        height: u32,
        channels: Channels,
        data: Vec<f32>,
    ) -> LayercastResult<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|v| v.checked_mul(channels.count()))
            .ok_or_else(|| LayercastError::input("image buffer size overflow"))?;
        if data.len() != expected {
            return Err(LayercastError::input(format!(
                "image buffer length {} does not match {}x{}x{}",
                data.len(),
                width,
                height,
                channels.count()
            )));
        }
        Ok(Self {
            width,
            height,
            channels,
            data,
        })
    }

    /// Fully transparent RGBA image.
    pub fn transparent(canvas: Canvas) -> Self {
        Self {
            width: canvas.width,
            height: canvas.height,
            channels: Channels::Rgba,
            data: vec![0.0; canvas.pixel_count() * 4],
        }
    }

    /// Image filled with one straight-alpha color. `px` length must match `channels`.
    pub fn filled(width: u32, height: u32, channels: Channels, px: &[f32]) -> LayercastResult<Self> {
        if px.len() != channels.count() {
            return Err(LayercastError::input(
                "fill color channel count does not match image layout",
            ));
        }
        let n = (width as usize) * (height as usize);
        let mut data = Vec::with_capacity(n * px.len());
        for _ in 0..n {
            data.extend_from_slice(px);
        }
        Self::from_raw(width, height, channels, data)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }

    pub fn channels(&self) -> Channels {
        self.channels
    }

    pub fn has_alpha(&self) -> bool {
        self.channels.has_alpha()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.data
    }

    pub fn into_raw(self) -> Vec<f32> {
        self.data
    }

    pub fn pixels(&self) -> std::slice::ChunksExact<'_, f32> {
        self.data.chunks_exact(self.channels.count())
    }

    pub fn pixels_mut(&mut self) -> std::slice::ChunksExactMut<'_, f32> {
        let n = self.channels.count();
        self.data.chunks_exact_mut(n)
    }

    pub fn pixel(&self, x: u32, y: u32) -> &[f32] {
        let n = self.channels.count();
        let idx = self.index(x, y);
        &self.data[idx..idx + n]
    }

    pub fn pixel_mut(&mut self, x: u32, y: u32) -> &mut [f32] {
        let n = self.channels.count();
        let idx = self.index(x, y);
        &mut self.data[idx..idx + n]
    }

    /// Alpha of pixel `(x, y)`; RGB images are opaque.
    pub fn alpha_at(&self, x: u32, y: u32) -> f32 {
        match self.channels {
            Channels::Rgb => 1.0,
            Channels::Rgba => self.pixel(x, y)[3],
        }
    }

    fn index(&self, x: u32, y: u32) -> usize {
        ((y as usize) * (self.width as usize) + (x as usize)) * self.channels.count()
    }

    /// Fail with an input error unless the image carries an alpha channel.
    pub fn require_alpha(&self, what: &str) -> LayercastResult<()> {
        if !self.has_alpha() {
            return Err(LayercastError::input(format!(
                "{what}: input image must be an RGBA image"
            )));
        }
        Ok(())
    }

    /// Copy of this image with an opaque alpha channel appended (no-op for RGBA).
    pub fn with_alpha(&self) -> Self {
        if self.has_alpha() {
            return self.clone();
        }
        let mut data = Vec::with_capacity(self.data.len() / 3 * 4);
        for px in self.data.chunks_exact(3) {
            data.extend_from_slice(px);
            data.push(1.0);
        }
        Self {
            width: self.width,
            height: self.height,
            channels: Channels::Rgba,
            data,
        }
    }

    pub fn from_dynamic(img: &image::DynamicImage) -> Self {
        let has_alpha = img.color().has_alpha();
        let (width, height) = (img.width(), img.height());
        if has_alpha {
            let rgba = img.to_rgba8();
            Self {
                width,
                height,
                channels: Channels::Rgba,
                data: rgba.as_raw().iter().copied().map(u8_to_unit).collect(),
            }
        } else {
            let rgb = img.to_rgb8();
            Self {
                width,
                height,
                channels: Channels::Rgb,
                data: rgb.as_raw().iter().copied().map(u8_to_unit).collect(),
            }
        }
    }

    /// Quantize to 8-bit RGBA (RGB images become opaque).
    pub fn to_rgba8(&self) -> image::RgbaImage {
        let src = self.with_alpha();
        let raw: Vec<u8> = src.data.iter().copied().map(unit_to_u8).collect();
        image::RgbaImage::from_raw(self.width, self.height, raw)
            .unwrap_or_else(|| image::RgbaImage::new(self.width, self.height))
    }

    /// Quantize to 8-bit RGB, dropping alpha without flattening.
    pub fn to_rgb8(&self) -> image::RgbImage {
        let n = self.channels.count();
        let mut raw = Vec::with_capacity((self.width as usize) * (self.height as usize) * 3);
        for px in self.data.chunks_exact(n) {
            raw.extend(px[..3].iter().copied().map(unit_to_u8));
        }
        image::RgbImage::from_raw(self.width, self.height, raw)
            .unwrap_or_else(|| image::RgbImage::new(self.width, self.height))
    }

    pub fn to_dynamic(&self) -> image::DynamicImage {
        match self.channels {
            Channels::Rgb => image::DynamicImage::ImageRgb8(self.to_rgb8()),
            Channels::Rgba => image::DynamicImage::ImageRgba8(self.to_rgba8()),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/raster/buffer.rs"]
mod tests;
