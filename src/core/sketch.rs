//! Sketch data structures.
//!
//! # Public API
//! - [`SketchRef`]: Display name and canonical location of a sketch
//! - [`Sketch`]: A loaded sketch with its file listing
//! - [`SketchWithDetails`]: A loaded sketch plus the folder modification time
//! - [`SketchContainer`]: Folder node of the sketchbook tree
//!
//! All types serialize with camelCase field names so the JSON output matches the
//! shapes other sketchbook tools already consume.

use crate::core::error::Result;
use crate::core::file_uri;
use serde::{Deserialize, Serialize};
use std::ops::Deref;
use std::path::PathBuf;
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SketchRef {
    pub name: String,
    pub uri: Url,
}

impl SketchRef {
    pub fn path(&self) -> Result<PathBuf> {
        file_uri::to_path(&self.uri)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sketch {
    #[serde(flatten)]
    pub sketch_ref: SketchRef,
    pub main_file_uri: Url,
    /// `.ino`/`.pde` files in the sketch root, excluding the main file
    pub other_sketch_file_uris: Vec<Url>,
    /// Recognised source and documentation files anywhere inside the sketch
    pub additional_file_uris: Vec<Url>,
    pub root_folder_file_uris: Vec<Url>,
}

impl Deref for Sketch {
    type Target = SketchRef;

    fn deref(&self) -> &SketchRef {
        &self.sketch_ref
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SketchWithDetails {
    #[serde(flatten)]
    pub sketch: Sketch,
    /// Modification time of the sketch folder when it was loaded
    pub mtime_ms: u64,
}

impl Deref for SketchWithDetails {
    type Target = Sketch;

    fn deref(&self) -> &Sketch {
        &self.sketch
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SketchContainer {
    pub label: String,
    pub sketches: Vec<SketchRef>,
    pub children: Vec<SketchContainer>,
}

impl SketchContainer {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            sketches: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.sketches.is_empty() && self.children.iter().all(SketchContainer::is_empty)
    }

    /// Total number of sketches in this container and all descendants
    pub fn sketch_count(&self) -> usize {
        self.sketches.len()
            + self
                .children
                .iter()
                .map(SketchContainer::sketch_count)
                .sum::<usize>()
    }

    pub fn find_sketch(&self, name: &str) -> Option<&SketchRef> {
        self.sketches.iter().find(|sketch| sketch.name == name)
    }

    pub fn find_child(&self, label: &str) -> Option<&SketchContainer> {
        self.children.iter().find(|child| child.label == label)
    }
}
