use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::{
    animation::animator::FrameSequence,
    encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts},
    encode::gif::{GifSink, GifSinkOpts},
    encode::sink::{FrameSink, SinkConfig},
    foundation::core::FrameIndex,
    foundation::error::{LayercastError, LayercastResult},
};

/// Filesystem behaviour shared by every export.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExportOptions {
    /// Create missing parent directories of the output path.
    pub create_dirs: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self { create_dirs: true }
    }
}

/// Where and how an animation is written.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "format", rename_all = "snake_case")]
pub enum ExportTarget {
    Gif {
        path: PathBuf,
        #[serde(default = "default_delay_ms")]
        delay_ms: u32,
        /// `0` loops forever.
        #[serde(default)]
        loop_count: u16,
    },
    Mp4 {
        path: PathBuf,
        #[serde(default = "default_fps")]
        fps: u32,
        #[serde(default = "default_codec")]
        codec: String,
        #[serde(default)]
        audio: Option<PathBuf>,
        #[serde(default)]
        background: [u8; 3],
    },
}

fn default_delay_ms() -> u32 {
    100
}

fn default_fps() -> u32 {
    30
}

fn default_codec() -> String {
    "libx264".to_owned()
}

impl ExportTarget {
    /// Pick a target from the file extension (`.gif`, or a video container) with default settings.
    pub fn from_path(path: impl Into<PathBuf>) -> LayercastResult<Self> {
        let path = path.into();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("gif") => Ok(Self::Gif {
                path,
                delay_ms: default_delay_ms(),
                loop_count: 0,
            }),
            Some("mp4" | "mov" | "mkv" | "webm") => Ok(Self::Mp4 {
                path,
                fps: default_fps(),
                codec: default_codec(),
                audio: None,
                background: [0, 0, 0],
            }),
            _ => Err(LayercastError::validation(format!(
                "cannot infer animation format from '{}' (expected .gif or .mp4)",
                path.display()
            ))),
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            Self::Gif { path, .. } | Self::Mp4 { path, .. } => path,
        }
    }

    pub fn path_mut(&mut self) -> &mut PathBuf {
        match self {
            Self::Gif { path, .. } | Self::Mp4 { path, .. } => path,
        }
    }

    pub fn validate(&self) -> LayercastResult<()> {
        match self {
            Self::Gif { delay_ms, .. } if *delay_ms == 0 => {
                Err(LayercastError::validation("gif delay_ms must be > 0"))
            }
            Self::Mp4 { fps, .. } if *fps == 0 => {
                Err(LayercastError::validation("mp4 fps must be > 0"))
            }
            Self::Mp4 { codec, .. } if codec.trim().is_empty() => {
                Err(LayercastError::validation("mp4 codec must not be empty"))
            }
            _ => Ok(()),
        }
    }

    fn sink(&self) -> Box<dyn FrameSink> {
        match self {
            Self::Gif {
                path,
                delay_ms,
                loop_count,
            } => Box::new(GifSink::new(GifSinkOpts {
                out_path: path.clone(),
                delay_ms: *delay_ms,
                loop_count: *loop_count,
            })),
            Self::Mp4 {
                path,
                fps,
                codec,
                audio,
                background,
            } => {
                let mut opts = FfmpegSinkOpts::new(path.clone(), *fps);
                opts.codec = codec.clone();
                opts.audio = audio.clone();
                opts.background = *background;
                Box::new(FfmpegSink::new(opts))
            }
        }
    }
}

/// Make sure the directory that will hold `path` exists, creating it when allowed.
pub fn prepare_output_path(path: &Path, opts: ExportOptions) -> LayercastResult<()> {
    let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) else {
        return Ok(());
    };
    if parent.is_dir() {
        return Ok(());
    }
    if !opts.create_dirs {
        return Err(LayercastError::export(format!(
            "output directory '{}' does not exist",
            parent.display()
        )));
    }
    std::fs::create_dir_all(parent)
        .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    Ok(())
}

/// Feed every frame of `sequence` through `sink` between `begin` and `end`.
pub fn write_sequence(sink: &mut dyn FrameSink, sequence: &FrameSequence) -> LayercastResult<()> {
    let first = sequence
        .frames()
        .first()
        .ok_or_else(|| LayercastError::export("cannot export an empty frame sequence"))?;
    sink.begin(SinkConfig::for_frame(first, sequence.len() as u64))?;
    for (i, frame) in sequence.iter().enumerate() {
        sink.push_frame(FrameIndex(i as u64), frame)?;
    }
    sink.end()
}

/// Encode `sequence` to `target`. The sequence is consumed.
#[tracing::instrument(skip(sequence), fields(frames = sequence.len(), path = %target.path().display()))]
pub fn export_frames(
    sequence: FrameSequence,
    target: &ExportTarget,
    opts: ExportOptions,
) -> LayercastResult<()> {
    let Some(first) = sequence.frames().first() else {
        return Err(LayercastError::export(
            "cannot export an empty frame sequence",
        ));
    };
    let dims = first.dimensions();
    if let Some((i, f)) = sequence
        .iter()
        .enumerate()
        .find(|(_, f)| f.dimensions() != dims)
    {
        return Err(LayercastError::export(format!(
            "frame {i} is {}x{} but frame 0 is {}x{}",
            f.width(),
            f.height(),
            dims.0,
            dims.1
        )));
    }
    target.validate()?;
    prepare_output_path(target.path(), opts)?;

    let mut sink = target.sink();
    write_sequence(sink.as_mut(), &sequence)
}

#[cfg(test)]
#[path = "../../tests/unit/encode/export.rs"]
mod tests;
