use std::io::Read as _;
use std::path::PathBuf;
use std::process::{Child, ChildStdin, Command, Stdio};

use crate::{
    encode::sink::{FrameSink, SinkConfig},
    foundation::core::FrameIndex,
    foundation::error::{LayercastError, LayercastResult},
    foundation::math::unit_to_u8,
    raster::ImageF32,
};

/// Options for [`FfmpegSink`] video output.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FfmpegSinkOpts {
    pub out_path: PathBuf,
    pub fps: u32,
    /// Video codec passed to `-c:v`.
    pub codec: String,
    /// Optional audio file muxed in and cut to the video length.
    pub audio: Option<PathBuf>,
    /// Color that transparent pixels are flattened onto.
    pub background: [u8; 3],
    pub overwrite: bool,
}

impl FfmpegSinkOpts {
    pub fn new(out_path: impl Into<PathBuf>, fps: u32) -> Self {
        Self {
            out_path: out_path.into(),
            fps,
            codec: "libx264".to_owned(),
            audio: None,
            background: [0, 0, 0],
            overwrite: true,
        }
    }
}

/// Spawns the system `ffmpeg` and streams opaque RGBA8 frames to its stdin.
pub struct FfmpegSink {
    opts: FfmpegSinkOpts,

    child: Option<Child>,
    stdin: Option<ChildStdin>,
    stderr_drain: Option<std::thread::JoinHandle<std::io::Result<Vec<u8>>>>,

    scratch: Vec<u8>,
    cfg: Option<SinkConfig>,
    last_idx: Option<FrameIndex>,
}

impl FfmpegSink {
    pub fn new(opts: FfmpegSinkOpts) -> Self {
        Self {
            opts,
            child: None,
            stdin: None,
            stderr_drain: None,
            scratch: Vec::new(),
            cfg: None,
            last_idx: None,
        }
    }

    fn command(&self, cfg: &SinkConfig) -> Command {
        let mut cmd = Command::new("ffmpeg");
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());
        cmd.arg(if self.opts.overwrite { "-y" } else { "-n" });
        cmd.args([
            "-loglevel",
            "error",
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgba",
            "-s",
            &format!("{}x{}", cfg.width, cfg.height),
            "-r",
            &self.opts.fps.to_string(),
            "-i",
            "pipe:0",
        ]);
        match self.opts.audio.as_ref() {
            Some(audio) => {
                cmd.arg("-i").arg(audio).args([
                    "-c:v",
                    &self.opts.codec,
                    "-pix_fmt",
                    "yuv420p",
                    "-c:a",
                    "aac",
                    "-shortest",
                ]);
            }
            None => {
                cmd.args(["-an", "-c:v", &self.opts.codec, "-pix_fmt", "yuv420p"]);
            }
        }
        cmd.args(["-movflags", "+faststart"]).arg(&self.opts.out_path);
        cmd
    }
}

impl FrameSink for FfmpegSink {
    fn begin(&mut self, cfg: SinkConfig) -> LayercastResult<()> {
        if self.opts.fps == 0 {
            return Err(LayercastError::validation("fps must be non-zero"));
        }
        if cfg.width == 0 || cfg.height == 0 {
            return Err(LayercastError::validation(
                "ffmpeg sink width/height must be non-zero",
            ));
        }
        if !cfg.width.is_multiple_of(2) || !cfg.height.is_multiple_of(2) {
            return Err(LayercastError::validation(
                "ffmpeg sink width/height must be even (required for yuv420p output)",
            ));
        }
        if let Some(audio) = self.opts.audio.as_ref()
            && !audio.is_file()
        {
            return Err(LayercastError::input(format!(
                "audio file '{}' does not exist",
                audio.display()
            )));
        }
        if !self.opts.overwrite && self.opts.out_path.exists() {
            return Err(LayercastError::validation(format!(
                "output file '{}' already exists",
                self.opts.out_path.display()
            )));
        }
        if !is_ffmpeg_on_path() {
            return Err(LayercastError::export(
                "ffmpeg is required for video encoding, but was not found on PATH",
            ));
        }

        let mut child = self.command(&cfg).spawn().map_err(|e| {
            LayercastError::export(format!(
                "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
            ))
        })?;
        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| LayercastError::export("failed to open ffmpeg stdin"))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| LayercastError::export("failed to open ffmpeg stderr"))?;
        // ffmpeg blocks once the stderr pipe fills, so drain it off-thread.
        let stderr_drain = std::thread::spawn(move || {
            let mut bytes = Vec::new();
            stderr.read_to_end(&mut bytes)?;
            Ok(bytes)
        });

        tracing::debug!(
            path = %self.opts.out_path.display(),
            fps = self.opts.fps,
            codec = %self.opts.codec,
            audio = self.opts.audio.is_some(),
            "spawned ffmpeg"
        );
        self.scratch = vec![0u8; (cfg.width as usize) * (cfg.height as usize) * 4];
        self.child = Some(child);
        self.stdin = Some(stdin);
        self.stderr_drain = Some(stderr_drain);
        self.cfg = Some(cfg);
        self.last_idx = None;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &ImageF32) -> LayercastResult<()> {
        let cfg = self
            .cfg
            .as_ref()
            .ok_or_else(|| LayercastError::export("ffmpeg sink not started"))?;
        if let Some(last) = self.last_idx
            && idx.0 <= last.0
        {
            return Err(LayercastError::export(
                "ffmpeg sink received out-of-order frame index",
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

        flatten_over_background(&mut self.scratch, frame, self.opts.background)?;

        let Some(stdin) = self.stdin.as_mut() else {
            return Err(LayercastError::export("ffmpeg sink is already finalized"));
        };
        use std::io::Write as _;
        stdin.write_all(&self.scratch).map_err(|e| {
            LayercastError::export(format!("failed to write frame to ffmpeg stdin: {e}"))
        })?;
        Ok(())
    }

    fn end(&mut self) -> LayercastResult<()> {
        drop(self.stdin.take());
        let mut child = self
            .child
            .take()
            .ok_or_else(|| LayercastError::export("ffmpeg sink not started"))?;

        let status = child.wait().map_err(|e| {
            LayercastError::export(format!("failed to wait for ffmpeg to finish: {e}"))
        })?;
        let stderr_bytes = match self.stderr_drain.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| LayercastError::export("ffmpeg stderr drain thread panicked"))?
                .map_err(|e| LayercastError::export(format!("ffmpeg stderr read failed: {e}")))?,
            None => Vec::new(),
        };
        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr_bytes);
            return Err(LayercastError::export(format!(
                "ffmpeg exited with status {}: {}",
                status,
                stderr.trim()
            )));
        }

        self.cfg = None;
        tracing::info!(path = %self.opts.out_path.display(), "wrote video");
        Ok(())
    }
}

/// Composite straight-alpha `frame` over an opaque `background` into RGBA8 with alpha 255.
pub(crate) fn flatten_over_background(
    dst: &mut [u8],
    frame: &ImageF32,
    background: [u8; 3],
) -> LayercastResult<()> {
    let n = frame.channels().count();
    let px_count = (frame.width() as usize) * (frame.height() as usize);
    if dst.len() != px_count * 4 {
        return Err(LayercastError::export(
            "flatten buffer does not match frame dimensions",
        ));
    }
    let bg = background.map(|c| f32::from(c) / 255.0);
    for (d, s) in dst.chunks_exact_mut(4).zip(frame.as_slice().chunks_exact(n)) {
        let a = if n == 4 { s[3].clamp(0.0, 1.0) } else { 1.0 };
        for c in 0..3 {
            d[c] = unit_to_u8(s[c] * a + bg[c] * (1.0 - a));
        }
        d[3] = 255;
    }
    Ok(())
}

/// Return `true` when `ffmpeg` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
