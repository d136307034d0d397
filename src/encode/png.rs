use std::path::Path;

use anyhow::Context as _;

use crate::{
    encode::export::{ExportOptions, prepare_output_path},
    foundation::error::LayercastResult,
    raster::{Channels, ImageF32},
};

/// Write `image` as an 8-bit PNG, RGB or RGBA matching its channel layout.
#[tracing::instrument(skip(image), fields(path = %path.display(), w = image.width(), h = image.height()))]
pub fn export_image(image: &ImageF32, path: &Path, opts: ExportOptions) -> LayercastResult<()> {
    prepare_output_path(path, opts)?;
    let written = match image.channels() {
        Channels::Rgb => {
            let buf = image.to_rgb8();
            image::save_buffer_with_format(
                path,
                buf.as_raw(),
                buf.width(),
                buf.height(),
                image::ColorType::Rgb8,
                image::ImageFormat::Png,
            )
        }
        Channels::Rgba => {
            let buf = image.to_rgba8();
            image::save_buffer_with_format(
                path,
                buf.as_raw(),
                buf.width(),
                buf.height(),
                image::ColorType::Rgba8,
                image::ImageFormat::Png,
            )
        }
    };
    written.with_context(|| format!("write png '{}'", path.display()))?;
    tracing::info!("wrote png");
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/encode/png.rs"]
mod tests;
