use std::collections::BTreeMap;
use std::path::Path;

use crate::{
    animation::animator::{Animator, FrameSequence},
    assets::loader::{Layer, LayerSet, LoadOptions, load_layers},
    assets::sequence::load_frame_sequence,
    effects::fx::apply_chain,
    encode::export::{ExportOptions, ExportTarget, export_frames},
    encode::png::export_image,
    foundation::error::{LayercastError, LayercastResult},
    pipeline::config::PipelineConfig,
    raster::ImageF32,
};

/// A loaded scene: layers read, static filters applied, ready to composite or animate.
#[derive(Clone, Debug)]
pub struct Pipeline {
    config: PipelineConfig,
    animator: Animator,
}

impl Pipeline {
    /// Validate `config`, then load and prepare every layer it names.
    #[tracing::instrument(skip(config), fields(layers = config.layer_order.len()))]
    pub fn load(config: PipelineConfig) -> LayercastResult<Self> {
        config.validate()?;
        let opts = LoadOptions {
            strict: config.strict,
            force_rgba: config.force_rgba,
        };

        let file_layers: Vec<String> = config
            .layer_order
            .iter()
            .filter(|n| !config.sequences.contains_key(*n))
            .cloned()
            .collect();
        let mut files: BTreeMap<String, ImageF32> =
            load_layers(&config.layers_dir, &file_layers, opts)?
                .into_iter()
                .map(|l| (l.name, l.image))
                .collect();

        let mut sequences = BTreeMap::new();
        for (name, dir) in &config.sequences {
            let frames = load_frame_sequence(dir)?;
            let chain = config.filters.get(name).map(Vec::as_slice).unwrap_or(&[]);
            let frames = frames
                .iter()
                .map(|f| {
                    let f = if config.force_rgba { f.with_alpha() } else { f.clone() };
                    apply_chain(&f, chain)
                })
                .collect::<LayercastResult<Vec<_>>>()?;
            sequences.insert(name.clone(), FrameSequence::new(frames));
        }

        let mut base = LayerSet::new();
        for name in &config.layer_order {
            let layer = match sequences.get(name) {
                Some(seq) => match seq.frames().first() {
                    Some(first) => Layer::new(name.clone(), first.clone()),
                    None => continue,
                },
                None => {
                    // Missing files were already skipped (or rejected) by the loader.
                    let Some(image) = files.remove(name) else {
                        continue;
                    };
                    let image = match config.filters.get(name) {
                        Some(chain) => apply_chain(&image, chain)?,
                        None => image,
                    };
                    Layer::new(name.clone(), image)
                }
            };
            base.push(layer);
        }

        let canvas = match config.canvas {
            Some(c) => c,
            None => base
                .first()
                .map(|l| l.image.canvas())
                .ok_or_else(|| LayercastError::input("no layers were loaded"))?,
        };
        for layer in base.iter_mut() {
            let placement = config
                .placements
                .get(&layer.name)
                .copied()
                .unwrap_or_default();
            layer.offset = placement.offset_on(canvas, layer.image.width(), layer.image.height());
            layer.opacity = placement.opacity;
        }
        tracing::info!(
            loaded = base.len(),
            width = canvas.width,
            height = canvas.height,
            "layers ready"
        );

        let mut animator = Animator::new(base, canvas)
            .with_mode(config.alpha_mode)
            .with_composite_filters(config.composite_filters.clone());
        for (name, seq) in sequences {
            animator = animator.with_sequence(name, seq)?;
        }
        if let Some(anim) = &config.animation {
            let seed = anim.seed;
            animator = animator.with_tracks(anim.tracks.iter().cloned().map(|mut t| {
                t.filter = t.filter.with_base_seed(seed);
                t
            }))?;
        }

        Ok(Self { config, animator })
    }

    /// Read, resolve and load a config file.
    pub fn from_path(path: impl AsRef<Path>) -> LayercastResult<Self> {
        Self::load(PipelineConfig::from_path(path)?)
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn animator(&self) -> &Animator {
        &self.animator
    }

    pub fn render_still(&self) -> LayercastResult<ImageF32> {
        self.animator.still()
    }

    /// Render the animation. `frames` overrides the configured frame count.
    pub fn render_frames(&self, frames: Option<u64>) -> LayercastResult<FrameSequence> {
        let count = frames
            .or(self.config.animation.as_ref().map(|a| a.frame_count))
            .ok_or_else(|| {
                LayercastError::validation("no frame count: set animation.frame_count or --frames")
            })?;
        self.animator.render(count)
    }

    pub fn export_still(&self, path: &Path, opts: ExportOptions) -> LayercastResult<()> {
        export_image(&self.render_still()?, path, opts)
    }

    /// Render and encode the animation. `target` overrides the configured output.
    pub fn export_animation(
        &self,
        frames: Option<u64>,
        target: Option<&ExportTarget>,
        opts: ExportOptions,
    ) -> LayercastResult<()> {
        let target = match target {
            Some(t) => t,
            None => self.config.output.as_ref().ok_or_else(|| {
                LayercastError::validation("no output target: set output or pass --out")
            })?,
        };
        target.validate()?;
        let sequence = self.render_frames(frames)?;
        export_frames(sequence, target, opts)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/run.rs"]
mod tests;
