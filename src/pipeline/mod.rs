//! End-to-end entry point: config in, still image or animation out.

pub mod config;
pub mod run;
