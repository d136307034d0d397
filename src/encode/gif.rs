use std::fs::File;
use std::path::PathBuf;

use anyhow::Context as _;
use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Frame};

use crate::{
    encode::sink::{FrameSink, SinkConfig},
    foundation::core::FrameIndex,
    foundation::error::{LayercastError, LayercastResult},
    raster::ImageF32,
};

/// Options for [`GifSink`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GifSinkOpts {
    pub out_path: PathBuf,
    /// Display time of each frame in milliseconds.
    pub delay_ms: u32,
    /// Number of repetitions; `0` loops forever.
    pub loop_count: u16,
}

impl GifSinkOpts {
    pub fn new(out_path: impl Into<PathBuf>) -> Self {
        Self {
            out_path: out_path.into(),
            delay_ms: 100,
            loop_count: 0,
        }
    }
}

/// Animated GIF writer backed by `image`'s GIF encoder.
pub struct GifSink {
    opts: GifSinkOpts,
    encoder: Option<GifEncoder<File>>,
    cfg: Option<SinkConfig>,
    last_idx: Option<FrameIndex>,
}

impl GifSink {
    pub fn new(opts: GifSinkOpts) -> Self {
        Self {
            opts,
            encoder: None,
            cfg: None,
            last_idx: None,
        }
    }
}

impl FrameSink for GifSink {
    fn begin(&mut self, cfg: SinkConfig) -> LayercastResult<()> {
        if cfg.width == 0 || cfg.height == 0 {
            return Err(LayercastError::export("gif width/height must be non-zero"));
        }
        if cfg.width > u32::from(u16::MAX) || cfg.height > u32::from(u16::MAX) {
            return Err(LayercastError::export(format!(
                "gif frames are limited to {}x{} pixels",
                u16::MAX,
                u16::MAX
            )));
        }
        let file = File::create(&self.opts.out_path)
            .with_context(|| format!("create gif '{}'", self.opts.out_path.display()))?;
        let mut encoder = GifEncoder::new(file);
        let repeat = match self.opts.loop_count {
            0 => Repeat::Infinite,
            n => Repeat::Finite(n),
        };
        encoder
            .set_repeat(repeat)
            .map_err(|e| LayercastError::export(format!("gif repeat setting failed: {e}")))?;
        self.encoder = Some(encoder);
        self.cfg = Some(cfg);
        self.last_idx = None;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &ImageF32) -> LayercastResult<()> {
        let cfg = self
            .cfg
            .as_ref()
            .ok_or_else(|| LayercastError::export("gif sink not started"))?;
        if let Some(last) = self.last_idx
            && idx.0 <= last.0
        {
            return Err(LayercastError::export(
                "gif sink received out-of-order frame index",
            ));
        }
        self.last_idx = Some(idx);
        if frame.width() != cfg.width || frame.height() != cfg.height {
            return Err(LayercastError::export(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width(),
                frame.height(),
                cfg.width,
                cfg.height
            )));
        }
        let Some(encoder) = self.encoder.as_mut() else {
            return Err(LayercastError::export("gif sink is already finalized"));
        };
        let delay = Delay::from_numer_denom_ms(self.opts.delay_ms, 1);
        encoder
            .encode_frame(Frame::from_parts(frame.to_rgba8(), 0, 0, delay))
            .map_err(|e| LayercastError::export(format!("gif frame {} failed: {e}", idx.0)))?;
        Ok(())
    }

    fn end(&mut self) -> LayercastResult<()> {
        // Dropping the encoder writes the GIF trailer.
        let encoder = self
            .encoder
            .take()
            .ok_or_else(|| LayercastError::export("gif sink not started"))?;
        drop(encoder);
        self.cfg = None;
        tracing::info!(path = %self.opts.out_path.display(), "wrote gif");
        Ok(())
    }
}
