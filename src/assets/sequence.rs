use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::{
    assets::decode::read_image,
    foundation::error::{LayercastError, LayercastResult},
    raster::ImageF32,
};

/// Numeric sort key: the first run of ASCII digits in the file stem, or 0.
pub fn frame_number(path: &Path) -> u64 {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let digits: String = stem
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().unwrap_or(0)
}

/// List `*.png` files in `dir` ordered by [`frame_number`], ties broken by file name.
pub fn list_frame_files(dir: &Path) -> LayercastResult<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("read frame directory '{}'", dir.display()))?;
    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("list '{}'", dir.display()))?;
        let path = entry.path();
        let is_png = path
            .extension()
            .is_some_and(|e| e.eq_ignore_ascii_case("png"));
        if is_png && path.is_file() {
            files.push(path);
        }
    }
    files.sort_by(|a, b| {
        frame_number(a)
            .cmp(&frame_number(b))
            .then_with(|| a.file_name().cmp(&b.file_name()))
    });
    Ok(files)
}

/// Load a numbered frame directory into memory.
#[tracing::instrument(fields(dir = %dir.display()))]
pub fn load_frame_sequence(dir: &Path) -> LayercastResult<Vec<ImageF32>> {
    let files = list_frame_files(dir)?;
    if files.is_empty() {
        return Err(LayercastError::input(format!(
            "frame directory '{}' contains no png files",
            dir.display()
        )));
    }
    let frames = files
        .iter()
        .map(|p| read_image(p))
        .collect::<LayercastResult<Vec<_>>>()?;
    tracing::debug!(frames = frames.len(), "loaded frame sequence");
    Ok(frames)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/sequence.rs"]
mod tests;
