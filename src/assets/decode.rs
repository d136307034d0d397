use std::path::Path;

use anyhow::Context;

use crate::{LayercastResult, raster::ImageF32};

/// Decode encoded image bytes (PNG, JPEG, ...) into a normalized float image.
pub fn decode_image(bytes: &[u8]) -> LayercastResult<ImageF32> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    Ok(ImageF32::from_dynamic(&dyn_img))
}

/// Read and decode an image file.
pub fn read_image(path: &Path) -> LayercastResult<ImageF32> {
    let bytes =
        std::fs::read(path).with_context(|| format!("read image '{}'", path.display()))?;
    let dyn_img = image::load_from_memory(&bytes)
        .with_context(|| format!("decode image '{}'", path.display()))?;
    Ok(ImageF32::from_dynamic(&dyn_img))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
