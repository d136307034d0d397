use crate::foundation::core::FrameIndex;
use crate::foundation::error::LayercastResult;
use crate::raster::ImageF32;

/// Frame geometry handed to a [`FrameSink`] before the first frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SinkConfig {
    pub width: u32,
    pub height: u32,
    /// Number of frames that will be pushed.
    pub frame_count: u64,
}

impl SinkConfig {
    pub fn for_frame(frame: &ImageF32, frame_count: u64) -> Self {
        Self {
            width: frame.width(),
            height: frame.height(),
            frame_count,
        }
    }
}

/// Consumer of rendered frames.
///
/// `push_frame` is called with strictly increasing indices between one `begin` and one `end`.
pub trait FrameSink {
    fn begin(&mut self, cfg: SinkConfig) -> LayercastResult<()>;
    fn push_frame(&mut self, idx: FrameIndex, frame: &ImageF32) -> LayercastResult<()>;
    fn end(&mut self) -> LayercastResult<()>;
}

/// Keeps every pushed frame; used by tests and for debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<(FrameIndex, ImageF32)>,
    finished: bool,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg
    }

    pub fn frames(&self) -> &[(FrameIndex, ImageF32)] {
        &self.frames
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> LayercastResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        self.finished = false;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &ImageF32) -> LayercastResult<()> {
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> LayercastResult<()> {
        self.finished = true;
        Ok(())
    }
}
