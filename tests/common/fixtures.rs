//! Test collaborators and predefined scenarios
//!
//! Provides a recording toolchain and notifier for library level tests, plus
//! sketchbooks with specific layouts.

#![allow(dead_code)]

use super::sketchbook::*;
use sketch_store::core::error::Result;
use sketch_store::core::toolchain::{load_sketch_folder, LoadSketchResponse, ToolchainError};
use sketch_store::{NotificationSink, SketchStore, SketchWithDetails, Toolchain};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Loads sketches from disk like the real toolchain and records archive requests
/// instead of running arduino-cli
#[derive(Default)]
pub struct RecordingToolchain {
    pub archives: Mutex<Vec<(PathBuf, PathBuf)>>,
}

impl Toolchain for RecordingToolchain {
    fn load_sketch(&self, sketch_path: &Path) -> std::result::Result<LoadSketchResponse, ToolchainError> {
        load_sketch_folder(sketch_path)
    }

    fn archive_sketch(
        &self,
        sketch_path: &Path,
        archive_path: &Path,
    ) -> std::result::Result<(), ToolchainError> {
        if archive_path.exists() {
            return Err(ToolchainError::Failed(format!(
                "archive already exists: {}",
                archive_path.display()
            )));
        }
        std::fs::write(archive_path, b"PK")?;
        self.archives
            .lock()
            .unwrap()
            .push((sketch_path.to_path_buf(), archive_path.to_path_buf()));
        Ok(())
    }
}

/// Records the sketch names of every recent sketches notification
#[derive(Default)]
pub struct RecordingNotifier {
    pub notifications: Mutex<Vec<Vec<String>>>,
}

impl RecordingNotifier {
    pub fn count(&self) -> usize {
        self.notifications.lock().unwrap().len()
    }

    pub fn last(&self) -> Option<Vec<String>> {
        self.notifications.lock().unwrap().last().cloned()
    }
}

impl NotificationSink for RecordingNotifier {
    fn recent_sketches_did_change(&self, sketches: &[SketchWithDetails]) {
        self.notifications
            .lock()
            .unwrap()
            .push(sketches.iter().map(|sketch| sketch.name.clone()).collect());
    }
}

/// A store over `sketchbook` wired to recording collaborators, keeping temp
/// workspaces inside the sketchbook's private `tmp_dir`
pub struct TestStore {
    pub store: SketchStore,
    pub toolchain: Arc<RecordingToolchain>,
    pub notifier: Arc<RecordingNotifier>,
}

pub fn create_store(sketchbook: &TestSketchbook) -> TestStore {
    let toolchain = Arc::new(RecordingToolchain::default());
    let notifier = Arc::new(RecordingNotifier::default());
    let store = SketchStore::new(
        toolchain.clone(),
        Arc::new(Some(sketchbook.path.clone())),
        notifier.clone(),
        &sketchbook.config_dir,
    )
    .with_temp_root(&sketchbook.tmp_dir);
    TestStore {
        store,
        toolchain,
        notifier,
    }
}

/// Scenario: one valid sketch `Foo` and a folder `Bar` without a sketch
pub fn create_foo_bar_sketchbook() -> Result<TestSketchbook> {
    let sketchbook = setup_sketchbook()?;
    create_sketch(&sketchbook.path, "Foo")?;
    create_file(&sketchbook.path, "Bar/Baz.txt", "not a sketch")?;
    Ok(sketchbook)
}

/// Scenario: a `Blink` sketch with a second tab, a header and a nested source
pub fn create_blink_sketchbook() -> Result<TestSketchbook> {
    let sketchbook = setup_sketchbook()?;
    let blink = create_sketch(&sketchbook.path, "Blink")?;
    create_file(&blink, "tab.ino", "void helper() {}\n")?;
    create_file(&blink, "pins.h", "#define LED 13\n")?;
    create_file(&blink, "src/driver.cpp", "// driver\n")?;
    Ok(sketchbook)
}
