use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::{
    animation::track::{Target, Track},
    composite::blend::AlphaMode,
    effects::fx::Filter,
    encode::export::ExportTarget,
    foundation::core::{Canvas, Placement},
    foundation::error::{LayercastError, LayercastResult},
};

/// JSON-facing description of a layered scene and, optionally, its animation.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PipelineConfig {
    /// Directory holding the layer images.
    pub layers_dir: PathBuf,
    /// Layer file names in draw order (first is the bottom).
    pub layer_order: Vec<String>,
    /// Position, anchor and opacity per layer; unlisted layers sit opaque at the origin.
    #[serde(default)]
    pub placements: BTreeMap<String, Placement>,
    /// Per-layer filter chains applied once, before compositing.
    #[serde(default)]
    pub filters: BTreeMap<String, Vec<Filter>>,
    /// Filters applied to the finished composite.
    #[serde(default)]
    pub composite_filters: Vec<Filter>,
    /// Defaults to the size of the first loaded layer.
    #[serde(default)]
    pub canvas: Option<Canvas>,
    #[serde(default)]
    pub alpha_mode: AlphaMode,
    #[serde(default)]
    pub strict: bool,
    #[serde(default)]
    pub force_rgba: bool,
    /// Layers whose pixels come from a numbered frame directory instead of a single file.
    #[serde(default)]
    pub sequences: BTreeMap<String, PathBuf>,
    #[serde(default)]
    pub animation: Option<AnimationConfig>,
    #[serde(default)]
    pub output: Option<ExportTarget>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnimationConfig {
    pub frame_count: u64,
    /// Mixed into the seed of every glitch track.
    #[serde(default)]
    pub seed: u64,
    #[serde(default)]
    pub tracks: Vec<Track>,
}

impl PipelineConfig {
    pub fn from_json(json: &str) -> LayercastResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| LayercastError::serde(format!("parse pipeline config JSON: {e}")))
    }

    /// Read a config file; relative paths inside it are resolved against its directory.
    pub fn from_path(path: impl AsRef<Path>) -> LayercastResult<Self> {
        let path = path.as_ref();
        let f = File::open(path)
            .with_context(|| format!("open pipeline config '{}'", path.display()))?;
        let mut cfg: Self = serde_json::from_reader(BufReader::new(f)).map_err(|e| {
            LayercastError::serde(format!("parse pipeline config '{}': {e}", path.display()))
        })?;
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        cfg.resolve(base);
        Ok(cfg)
    }

    /// Rebase every relative path onto `base`.
    pub fn resolve(&mut self, base: &Path) {
        let rebase = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };
        rebase(&mut self.layers_dir);
        self.sequences.values_mut().for_each(|p| rebase(p));
        if let Some(out) = self.output.as_mut() {
            rebase(out.path_mut());
            if let ExportTarget::Mp4 {
                audio: Some(audio), ..
            } = out
            {
                rebase(audio);
            }
        }
    }

    /// Check names and numeric options. Touches no files.
    pub fn validate(&self) -> LayercastResult<()> {
        if self.layer_order.is_empty() {
            return Err(LayercastError::validation("layer_order must not be empty"));
        }
        let mut names = BTreeSet::new();
        for name in &self.layer_order {
            if name.trim().is_empty() {
                return Err(LayercastError::validation("layer names must not be empty"));
            }
            if !names.insert(name.as_str()) {
                return Err(LayercastError::validation(format!(
                    "layer '{name}' appears twice in layer_order"
                )));
            }
        }
        let known = |what: &str, name: &str| {
            if names.contains(name) {
                Ok(())
            } else {
                Err(LayercastError::validation(format!(
                    "{what} refers to '{name}', which is not in layer_order"
                )))
            }
        };

        for (name, placement) in &self.placements {
            known("placements", name)?;
            placement
                .validate()
                .map_err(|e| LayercastError::validation(format!("placements['{name}']: {e}")))?;
        }
        for name in self.sequences.keys() {
            known("sequences", name)?;
        }
        for (name, chain) in &self.filters {
            known("filters", name)?;
            validate_chain(&format!("filters['{name}']"), chain)?;
        }
        validate_chain("composite_filters", &self.composite_filters)?;

        if let Some(c) = self.canvas {
            Canvas::new(c.width, c.height)
                .map_err(|e| LayercastError::validation(format!("canvas: {e}")))?;
        }
        if let Some(anim) = &self.animation {
            if anim.frame_count == 0 {
                return Err(LayercastError::validation(
                    "animation.frame_count must be > 0",
                ));
            }
            for (i, track) in anim.tracks.iter().enumerate() {
                if let Target::Layer(name) = &track.target {
                    known(&format!("animation.tracks[{i}]"), name)?;
                }
                track.validate().map_err(|e| {
                    LayercastError::validation(format!("animation.tracks[{i}]: {e}"))
                })?;
            }
        }
        if let Some(out) = &self.output {
            out.validate()?;
        }
        Ok(())
    }
}

fn validate_chain(what: &str, chain: &[Filter]) -> LayercastResult<()> {
    for (i, f) in chain.iter().enumerate() {
        f.validate()
            .map_err(|e| LayercastError::validation(format!("{what}[{i}]: {e}")))?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/config.rs"]
mod tests;
