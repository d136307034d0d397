//! Layercast composes layered still images into a single picture or a short animation.
//!
//! The flow is linear:
//!
//! - Load named layers from a directory ([`load_layers`]) or a numbered frame folder
//! - Run per-layer [`Filter`] chains
//! - Blend the stack onto a transparent canvas ([`compose`])
//! - Optionally animate layers and the composite with [`Track`]s ([`Animator`])
//! - Write a PNG ([`export_image`]) or a GIF/MP4 ([`export_frames`])
//!
//! [`Pipeline`] drives all of it from a JSON [`PipelineConfig`].
#![forbid(unsafe_code)]

pub mod animation;
pub mod assets;
pub mod composite;
pub mod effects;
pub mod encode;
pub mod foundation;
pub mod pipeline;
pub mod raster;

pub use crate::foundation::core::{Affine, Anchor, Canvas, FrameIndex, Offset, Placement, Vec2};
pub use crate::foundation::error::{LayercastError, LayercastResult};

pub use crate::animation::animator::{Animator, FrameSequence};
pub use crate::animation::curve::{Curve, SampleCtx};
pub use crate::animation::track::{AnimatedFilter, Target, Track};
pub use crate::assets::loader::{Layer, LayerSet, LoadOptions, load_layers};
pub use crate::assets::sequence::load_frame_sequence;
pub use crate::composite::blend::{AlphaMode, blend_into, blend_with_opacity};
pub use crate::composite::stack::compose;
pub use crate::effects::color::KeySpace;
pub use crate::effects::fx::{Filter, apply_chain, apply_filter};
pub use crate::encode::export::{ExportOptions, ExportTarget, export_frames};
pub use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts, is_ffmpeg_on_path};
pub use crate::encode::gif::{GifSink, GifSinkOpts};
pub use crate::encode::png::export_image;
pub use crate::encode::sink::{FrameSink, InMemorySink, SinkConfig};
pub use crate::pipeline::config::{AnimationConfig, PipelineConfig};
pub use crate::pipeline::run::Pipeline;
pub use crate::raster::{Channels, ImageF32};
