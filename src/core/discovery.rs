//! Sketchbook discovery.
//!
//! Builds a [`SketchContainer`] tree from the sketch files found below a sketchbook
//! root. Discovery never fails: unreadable entries and misnamed sketch files are
//! logged and skipped so a partially broken sketchbook still lists what it can.
//!
//! # Nested sketches
//! ```text
//! Sketchbook
//! +-- Folder
//!     +-- Folder.ino
//!     +-- Nested_folder
//!         +-- Nested_folder.ino
//! ```
//! `Nested_folder` lives inside the `Folder` sketch and is not listed. Candidates are
//! processed ancestors first, so `Folder` claims its label before `Nested_folder` is
//! seen, and a label that names a sketch never becomes a container.

use crate::core::file_uri;
use crate::core::sketch::{SketchContainer, SketchRef};
use crate::core::toolchain::MAIN_FILE_EXTENSIONS;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Top level sketchbook folders that never contain user sketches
const EXCLUDED_TOP_LEVEL_FOLDERS: [&str; 2] = ["libraries", "hardware"];

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

fn is_excluded(entry: &DirEntry) -> bool {
    if entry.depth() == 0 {
        return false;
    }
    if is_hidden(entry) {
        return true;
    }
    entry.depth() == 1
        && entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .map(|name| EXCLUDED_TOP_LEVEL_FOLDERS.contains(&name))
            .unwrap_or(false)
}

fn is_sketch_file_candidate(entry: &DirEntry) -> bool {
    // at least `<folder>/<file>` below the root
    entry.depth() >= 2
        && entry.file_type().is_file()
        && entry
            .path()
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| MAIN_FILE_EXTENSIONS.contains(&ext))
            .unwrap_or(false)
}

/// Every `*.ino`/`*.pde` file below `root`, ancestors before descendants
fn collect_sketch_files(root: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_entry(|entry| !is_excluded(entry))
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                log::warn!("Skipping unreadable sketchbook entry: {e}");
                None
            }
        })
        .filter(is_sketch_file_candidate)
        .map(DirEntry::into_path)
        .collect();

    // Depth first so an ancestor sketch always precedes anything nested in it,
    // then length as in a plain shortest-path-first walk.
    files.sort_by(|left, right| {
        left.components()
            .count()
            .cmp(&right.components().count())
            .then_with(|| left.as_os_str().len().cmp(&right.as_os_str().len()))
            .then_with(|| left.cmp(right))
    });
    files
}

/// Place a sketch below `container`, creating intermediate containers on demand.
///
/// Returns false when an intermediate folder is itself a sketch.
fn insert_sketch(container: &mut SketchContainer, folders: &[String], sketch: SketchRef) -> bool {
    let mut current = container;

    for label in folders {
        if current.find_sketch(label).is_some() {
            return false;
        }
        let index = match current.children.iter().position(|child| &child.label == label) {
            Some(index) => index,
            None => {
                current.children.push(SketchContainer::new(label.clone()));
                current.children.len() - 1
            }
        };
        current = &mut current.children[index];
    }

    if current.find_sketch(&sketch.name).is_some() {
        log::debug!(
            "Sketch {} was already discovered with another main file extension",
            sketch.name
        );
        return false;
    }
    // The sketch wins over a container with the same label.
    current.children.retain(|child| child.label != sketch.name);
    current.sketches.push(sketch);
    true
}

/// Build the sketch tree below `root`, labelling the top container with `label`
pub fn discover_sketches(root: &Path, label: impl Into<String>) -> SketchContainer {
    let mut container = SketchContainer::new(label);

    for sketch_file in collect_sketch_files(root) {
        let relative = match sketch_file.strip_prefix(root) {
            Ok(relative) => relative,
            Err(_) => {
                log::warn!(
                    "Could not determine relative sketch path from the root <{}> to the sketch <{}>. Skipping.",
                    root.display(),
                    sketch_file.display()
                );
                continue;
            }
        };

        let segments: Vec<String> = relative
            .iter()
            .map(|segment| segment.to_string_lossy().into_owned())
            .collect();
        if segments.len() < 2 {
            log::warn!(
                "Expected at least a folder and a file below the root <{}>, got <{}>. Skipping.",
                root.display(),
                relative.display()
            );
            continue;
        }

        let sketch_name = &segments[segments.len() - 2];
        let stem = sketch_file.file_stem().and_then(|stem| stem.to_str());
        if stem != Some(sketch_name.as_str()) {
            log::warn!(
                "Mismatching sketch file <{}> and sketch folder name <{sketch_name}>. Skipping.",
                segments[segments.len() - 1]
            );
            continue;
        }

        let folder = match sketch_file.parent() {
            Some(folder) => folder,
            None => continue,
        };
        let uri = match file_uri::from_path(folder) {
            Ok(uri) => uri,
            Err(e) => {
                log::warn!("Skipping sketch at {}: {e}", folder.display());
                continue;
            }
        };

        let sketch = SketchRef {
            name: sketch_name.clone(),
            uri,
        };
        if !insert_sketch(&mut container, &segments[..segments.len() - 2], sketch) {
            log::debug!("Ignoring nested sketch at {}", folder.display());
        }
    }

    container
}
