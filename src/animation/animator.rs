use std::borrow::Cow;
use std::collections::BTreeMap;

use crate::{
    animation::curve::SampleCtx,
    animation::track::{Target, Track},
    assets::loader::LayerSet,
    composite::blend::{AlphaMode, blend_with_opacity},
    effects::fx::{Filter, apply_chain},
    foundation::core::Canvas,
    foundation::error::{LayercastError, LayercastResult},
    raster::ImageF32,
};

/// Upper bound on the frame buffer reserved before rendering starts.
const PREALLOC_FRAMES: u64 = 256;

/// Ordered, owned frames of an animation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameSequence {
    frames: Vec<ImageF32>,
}

impl FrameSequence {
    pub fn new(frames: Vec<ImageF32>) -> Self {
        Self { frames }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn frames(&self) -> &[ImageF32] {
        &self.frames
    }

    pub fn into_frames(self) -> Vec<ImageF32> {
        self.frames
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ImageF32> {
        self.frames.iter()
    }

    /// Source frame used at output frame `i`; sequences loop.
    fn looped(&self, i: u64) -> Option<&ImageF32> {
        if self.frames.is_empty() {
            return None;
        }
        self.frames.get((i % self.frames.len() as u64) as usize)
    }
}

impl From<Vec<ImageF32>> for FrameSequence {
    fn from(frames: Vec<ImageF32>) -> Self {
        Self::new(frames)
    }
}

/// Renders a layer stack over time.
///
/// The base layers are never mutated: every frame borrows them and only the layers touched by
/// a track (or bound to a sequence) get a per-frame working copy.
#[derive(Clone, Debug)]
pub struct Animator {
    base: LayerSet,
    sequences: BTreeMap<String, FrameSequence>,
    canvas: Canvas,
    mode: AlphaMode,
    composite_filters: Vec<Filter>,
    tracks: Vec<Track>,
}

impl Animator {
    pub fn new(base: LayerSet, canvas: Canvas) -> Self {
        Self {
            base,
            sequences: BTreeMap::new(),
            canvas,
            mode: AlphaMode::default(),
            composite_filters: Vec::new(),
            tracks: Vec::new(),
        }
    }

    pub fn with_mode(mut self, mode: AlphaMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_composite_filters(mut self, filters: Vec<Filter>) -> Self {
        self.composite_filters = filters;
        self
    }

    /// Bind `layer` to a looping frame source. The layer must already be in the base set.
    pub fn with_sequence(
        mut self,
        layer: impl Into<String>,
        frames: FrameSequence,
    ) -> LayercastResult<Self> {
        let layer = layer.into();
        self.base.get(&layer)?;
        if frames.is_empty() {
            return Err(LayercastError::input(format!(
                "frame sequence for layer '{layer}' is empty"
            )));
        }
        self.sequences.insert(layer, frames);
        Ok(self)
    }

    /// Add a track. Tracks targeting a layer that was not loaded are rejected here.
    pub fn with_track(mut self, track: Track) -> LayercastResult<Self> {
        if let Target::Layer(name) = &track.target {
            self.base.get(name)?;
        }
        track.validate()?;
        self.tracks.push(track);
        Ok(self)
    }

    pub fn with_tracks(self, tracks: impl IntoIterator<Item = Track>) -> LayercastResult<Self> {
        tracks.into_iter().try_fold(self, Self::with_track)
    }

    pub fn base(&self) -> &LayerSet {
        &self.base
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Composite the untouched base layers, then the static composite filters.
    #[tracing::instrument(skip(self), fields(layers = self.base.len()))]
    pub fn still(&self) -> LayercastResult<ImageF32> {
        let mut out = ImageF32::transparent(self.canvas);
        for layer in &self.base {
            blend_with_opacity(&mut out, &layer.image, layer.offset, layer.opacity, self.mode)?;
        }
        apply_chain(&out, &self.composite_filters)
    }

    /// Render output frame `index` of a `frame_count`-frame run.
    pub fn render_frame(&self, index: u64, frame_count: u64) -> LayercastResult<ImageF32> {
        if frame_count == 0 {
            return Err(LayercastError::input("frame_count must be > 0"));
        }
        let ctx = SampleCtx::new(index, frame_count);
        let mut out = ImageF32::transparent(self.canvas);

        for layer in &self.base {
            let mut image: Cow<'_, ImageF32> = match self.sequences.get(&layer.name) {
                Some(seq) => match seq.looped(index) {
                    Some(frame) => Cow::Borrowed(frame),
                    None => Cow::Borrowed(&layer.image),
                },
                None => Cow::Borrowed(&layer.image),
            };
            for track in self.layer_tracks(&layer.name) {
                let filter = track.filter.sample(ctx)?;
                image = Cow::Owned(filter.apply(&image)?);
            }
            blend_with_opacity(&mut out, &image, layer.offset, layer.opacity, self.mode)?;
        }

        let mut out = apply_chain(&out, &self.composite_filters)?;
        for track in self
            .tracks
            .iter()
            .filter(|t| matches!(t.target, Target::Composite))
        {
            out = track.filter.sample(ctx)?.apply(&out)?;
        }
        Ok(out)
    }

    /// Render `frame_count` frames in order.
    #[tracing::instrument(skip(self), fields(tracks = self.tracks.len()))]
    pub fn render(&self, frame_count: u64) -> LayercastResult<FrameSequence> {
        if frame_count == 0 {
            return Err(LayercastError::input("frame_count must be > 0"));
        }
        let mut frames = Vec::with_capacity(frame_count.min(PREALLOC_FRAMES) as usize);
        for i in 0..frame_count {
            frames.push(self.render_frame(i, frame_count)?);
            tracing::debug!(frame = i, "rendered frame");
        }
        tracing::info!(frames = frame_count, "animation rendered");
        Ok(FrameSequence::new(frames))
    }

    fn layer_tracks<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Track> + 'a {
        self.tracks
            .iter()
            .filter(move |t| matches!(&t.target, Target::Layer(n) if n == name))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/animator.rs"]
mod tests;
