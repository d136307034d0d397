pub mod color;
pub mod denoise;
pub mod fx;
pub mod geometry;
pub mod glitch;
