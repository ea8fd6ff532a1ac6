//! Sketchbook setup utilities
//!
//! Provides functions for creating temporary sketchbooks, configuration
//! directories and sketch folders for tests.

#![allow(dead_code)]

use sketch_store::core::error::{Result, SketchStoreError};
use sketch_store::core::file_uri;
use assert_cmd::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;
use url::Url;

/// Test sketchbook setup result. The TempDir must be kept alive for the
/// duration of the test to prevent cleanup.
pub struct TestSketchbook {
    pub temp_dir: TempDir,
    pub path: PathBuf,
    pub config_dir: PathBuf,
    pub tmp_dir: PathBuf,
}

impl TestSketchbook {
    /// Get the sketchbook path as a reference
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// URI of a folder relative to the sketchbook
    pub fn uri(&self, relative: &str) -> Url {
        file_uri::from_path(&self.path.join(relative)).expect("absolute path")
    }

    /// The sketch-store binary pointed at this sketchbook and configuration
    /// directory, with temp workspaces created under `tmp_dir`
    pub fn command(&self) -> anyhow::Result<Command> {
        let mut cmd = Command::cargo_bin("sketch-store")?;
        cmd.arg("--config-dir")
            .arg(&self.config_dir)
            .arg("--sketchbook")
            .arg(&self.path)
            .env("TMPDIR", &self.tmp_dir)
            .env_remove("RUST_LOG");
        Ok(cmd)
    }
}

/// Sets up an empty sketchbook, a configuration directory and a private temp
/// directory side by side in a fresh temporary directory
pub fn setup_sketchbook() -> Result<TestSketchbook> {
    let temp_dir = TempDir::new().map_err(SketchStoreError::Io)?;
    let path = temp_dir.path().join("Arduino");
    let config_dir = temp_dir.path().join("config");
    let tmp_dir = temp_dir.path().join("tmp");

    for dir in [&path, &config_dir, &tmp_dir] {
        fs::create_dir_all(dir)?;
    }

    Ok(TestSketchbook {
        temp_dir,
        path,
        config_dir,
        tmp_dir,
    })
}

/// Creates a file with specified content, creating parent folders
pub fn create_file(root: &Path, relative: &str, content: &str) -> Result<PathBuf> {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, content)?;
    Ok(path)
}

/// Creates a valid sketch at `relative`, with a main file named after the folder
///
/// # Example
///
/// ```rust
/// create_sketch(&sketchbook.path, "examples/Blink")?;
/// // creates examples/Blink/Blink.ino
/// ```
pub fn create_sketch(root: &Path, relative: &str) -> Result<PathBuf> {
    let folder = root.join(relative);
    let name = folder
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| SketchStoreError::invalid_uri(relative))?;
    create_file(&folder, &format!("{name}.ino"), "void setup() {}\nvoid loop() {}\n")?;
    Ok(folder)
}

/// Sorted file names directly inside `folder`
pub fn list_files(folder: &Path) -> Result<Vec<String>> {
    let mut names: Vec<String> = fs::read_dir(folder)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    Ok(names)
}
