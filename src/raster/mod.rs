//! Floating-point image buffers shared by every pipeline stage.

mod buffer;

pub use buffer::{Channels, ImageF32};
