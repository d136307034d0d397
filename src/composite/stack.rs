use crate::{
    assets::loader::Layer,
    composite::blend::{AlphaMode, blend_with_opacity},
    foundation::core::Canvas,
    foundation::error::LayercastResult,
    raster::ImageF32,
};

/// Blend `layers` in order onto a fresh transparent canvas.
pub fn compose<'a, I>(layers: I, canvas: Canvas, mode: AlphaMode) -> LayercastResult<ImageF32>
where
    I: IntoIterator<Item = &'a Layer>,
{
    let mut out = ImageF32::transparent(canvas);
    for layer in layers {
        tracing::trace!(
            layer = %layer.name,
            x = layer.offset.x,
            y = layer.offset.y,
            opacity = layer.opacity,
            "blend"
        );
        blend_with_opacity(&mut out, &layer.image, layer.offset, layer.opacity, mode)?;
    }
    Ok(out)
}
