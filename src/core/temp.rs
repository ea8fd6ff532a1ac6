//! Temp workspaces and build folders.
//!
//! Unsaved and cloned sketches live in temp workspaces: folders under a temp root,
//! the OS temp directory unless configured otherwise, whose name starts with
//! [`TEMP_SKETCH_PREFIX`]. Build artifacts go to a
//! folder derived from the md5 of the sketch path, so rebuilding the same sketch
//! reuses it.

use crate::core::error::{Result, SketchStoreError};
use std::path::{Path, PathBuf};

pub const TEMP_SKETCH_PREFIX: &str = ".arduinoIDE-unsaved";

const BUILD_FOLDER_PREFIX: &str = "arduino-ide2-";

/// Create a new temp workspace below `temp_root` and return its canonical path.
///
/// The folder is not removed when this returns; cleanup is left to the OS.
pub fn create_temp_folder(temp_root: &Path) -> Result<PathBuf> {
    let dir = tempfile::Builder::new()
        .prefix(TEMP_SKETCH_PREFIX)
        .tempdir_in(temp_root)
        .map_err(|e| SketchStoreError::io_at(temp_root, e))?;
    let kept = dir.keep();
    std::fs::canonicalize(&kept).map_err(|e| SketchStoreError::io_at(&kept, e))
}

fn canonical(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

/// True when `path` lies inside a temp workspace of `temp_root`
pub fn is_temp_sketch(temp_root: &Path, path: &Path) -> bool {
    is_temp_sketch_in(&canonical(temp_root), &canonical(path))
}

fn is_temp_sketch_in(temp_dir: &Path, path: &Path) -> bool {
    path.strip_prefix(temp_dir)
        .ok()
        .and_then(|relative| relative.components().next())
        .and_then(|first| first.as_os_str().to_str())
        .map(|first| first.starts_with(TEMP_SKETCH_PREFIX))
        .unwrap_or(false)
}

/// `<temp_root>/arduino-ide2-<md5 of sketch path>`
pub fn build_folder_for(temp_root: &Path, sketch_path: &Path) -> PathBuf {
    let hash = md5::compute(sketch_path.to_string_lossy().as_bytes());
    temp_root.join(format!("{BUILD_FOLDER_PREFIX}{hash:x}"))
}
