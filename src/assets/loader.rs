use std::path::Path;

use crate::{
    assets::decode::read_image,
    foundation::core::Offset,
    foundation::error::{LayercastError, LayercastResult},
    raster::ImageF32,
};

/// A named image with its canvas placement. Draw order is the order inside a [`LayerSet`].
#[derive(Clone, Debug, PartialEq)]
pub struct Layer {
    pub name: String,
    pub image: ImageF32,
    pub offset: Offset,
    /// Multiplier on the layer's alpha when blended, in `[0, 1]`.
    pub opacity: f32,
}

impl Layer {
    pub fn new(name: impl Into<String>, image: ImageF32) -> Self {
        Self {
            name: name.into(),
            image,
            offset: Offset::ORIGIN,
            opacity: 1.0,
        }
    }

    pub fn with_offset(mut self, offset: Offset) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }
}

/// Ordered collection of loaded layers; index 0 is drawn first.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LayerSet {
    layers: Vec<Layer>,
}

impl LayerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, layer: Layer) {
        self.layers.push(layer);
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.layers.iter().any(|l| l.name == name)
    }

    /// Look up a layer by name; absent layers are an input error.
    pub fn get(&self, name: &str) -> LayercastResult<&Layer> {
        self.layers
            .iter()
            .find(|l| l.name == name)
            .ok_or_else(|| LayercastError::input(format!("layer '{name}' is not loaded")))
    }

    pub fn get_mut(&mut self, name: &str) -> LayercastResult<&mut Layer> {
        self.layers
            .iter_mut()
            .find(|l| l.name == name)
            .ok_or_else(|| LayercastError::input(format!("layer '{name}' is not loaded")))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.layers.iter().map(|l| l.name.as_str())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Layer> {
        self.layers.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Layer> {
        self.layers.iter_mut()
    }

    pub fn first(&self) -> Option<&Layer> {
        self.layers.first()
    }
}

impl FromIterator<Layer> for LayerSet {
    fn from_iter<I: IntoIterator<Item = Layer>>(iter: I) -> Self {
        Self {
            layers: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for LayerSet {
    type Item = Layer;
    type IntoIter = std::vec::IntoIter<Layer>;

    fn into_iter(self) -> Self::IntoIter {
        self.layers.into_iter()
    }
}

impl<'a> IntoIterator for &'a LayerSet {
    type Item = &'a Layer;
    type IntoIter = std::slice::Iter<'a, Layer>;

    fn into_iter(self) -> Self::IntoIter {
        self.layers.iter()
    }
}

/// Options controlling how [`load_layers`] treats missing files and channel layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoadOptions {
    /// Fail when a configured file does not exist instead of skipping it.
    pub strict: bool,
    /// Append an opaque alpha channel to RGB inputs.
    pub force_rgba: bool,
}

/// Load the configured layer files from `dir` in draw order.
///
/// Files absent from disk are skipped unless `opts.strict` is set.
#[tracing::instrument(skip(order), fields(dir = %dir.display()))]
pub fn load_layers(dir: &Path, order: &[String], opts: LoadOptions) -> LayercastResult<LayerSet> {
    let mut set = LayerSet::new();
    for name in order {
        if set.contains(name) {
            return Err(LayercastError::validation(format!(
                "layer '{name}' appears twice in layer_order"
            )));
        }
        let path = dir.join(name);
        if !path.is_file() {
            if opts.strict {
                return Err(LayercastError::input(format!(
                    "required layer file '{}' is missing",
                    path.display()
                )));
            }
            tracing::warn!(layer = %name, "layer file not found, skipping");
            continue;
        }
        let mut image = read_image(&path)?;
        if opts.force_rgba {
            image = image.with_alpha();
        }
        tracing::debug!(
            layer = %name,
            width = image.width(),
            height = image.height(),
            channels = image.channels().count(),
            "loaded layer"
        );
        set.push(Layer::new(name.clone(), image));
    }
    Ok(set)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/loader.rs"]
mod tests;
