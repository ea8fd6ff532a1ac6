//! Conversions between filesystem paths and `file://` URIs.
//!
//! Sketches are identified by URI on the wire and in `recent-sketches.json`, while
//! every filesystem operation works on paths. These helpers are the only place the
//! two representations are converted.

use crate::core::error::{Result, SketchStoreError};
use std::path::{Path, PathBuf};
use url::Url;

/// Turn an absolute path into a `file://` URI
pub fn from_path(path: &Path) -> Result<Url> {
    Url::from_file_path(path)
        .map_err(|_| SketchStoreError::invalid_uri(path.to_string_lossy().into_owned()))
}

/// Resolve a `file://` URI back to a filesystem path
pub fn to_path(uri: &Url) -> Result<PathBuf> {
    if uri.scheme() != "file" {
        return Err(SketchStoreError::invalid_uri(uri.as_str()));
    }
    uri.to_file_path()
        .map_err(|_| SketchStoreError::invalid_uri(uri.as_str()))
}

/// Parse user input that is either a `file://` URI or a (possibly relative) path
pub fn parse(input: &str) -> Result<Url> {
    if input.starts_with("file:") {
        return Url::parse(input).map_err(|_| SketchStoreError::invalid_uri(input));
    }

    let path = Path::new(input);
    if path.is_absolute() {
        from_path(path)
    } else {
        let absolute = std::env::current_dir()?.join(path);
        from_path(&absolute)
    }
}

/// The last path segment of a URI, used as a sketch or folder name
pub fn base_name(uri: &Url) -> Option<String> {
    to_path(uri)
        .ok()?
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
}
