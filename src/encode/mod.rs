//! Exporters: single PNG stills and frame sequences through [`sink::FrameSink`]s.

pub mod export;
pub mod ffmpeg;
pub mod gif;
pub mod png;
pub mod sink;
