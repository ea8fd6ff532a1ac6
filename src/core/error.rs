//! Domain-specific error types and error handling utilities.
//!
//! This module defines [`SketchStoreError`] which covers every failure the sketch
//! store can surface. It uses `thiserror` for ergonomic error definitions and
//! includes specialized constructors for the common failure scenarios.
//!
//! # Public API
//! - [`SketchStoreError`]: Main error enum covering all failure modes
//! - [`Result<T>`]: Type alias for `std::result::Result<T, SketchStoreError>`
//!
//! # Error Categories
//! - **Sketch identity**: not found, invalid main file name
//! - **Toolchain**: failures reported by the external toolchain
//! - **File operations**: I/O errors with or without path context
//! - **Persistence**: reading and writing the JSON state files
//! - **Naming**: exhausting the new sketch name space

use crate::core::toolchain::ToolchainError;
use std::path::PathBuf;
use thiserror::Error;

/// Domain-specific error types for the sketch store
#[derive(Error, Debug)]
pub enum SketchStoreError {
    // Sketch identity errors
    #[error("Sketch not found: {uri}. {message}")]
    NotFound { message: String, uri: String },

    #[error("Invalid sketch name: {main_file_uri}. {message}")]
    InvalidName {
        message: String,
        main_file_uri: String,
    },

    #[error("Not a valid file URI: {uri}")]
    InvalidUri { uri: String },

    #[error("Sketch does not exist: {path}")]
    SketchNotAccessible { path: PathBuf },

    // Toolchain errors
    #[error("Toolchain error: {message}")]
    Toolchain { message: String },

    // File operation errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("IO error at '{path}': {source}")]
    IoAt {
        path: PathBuf,
        source: std::io::Error,
    },

    // Persistence errors
    #[error("Could not find configuration directory")]
    ConfigDirectoryNotFound,

    #[error("Failed to parse configuration file '{path}': {source}")]
    ConfigParseFailed {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Failed to write recently opened sketches to '{path}': {source}")]
    RecentSketchesWriteFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    // Naming errors
    #[error("Cannot create a unique sketch name for '{base_name}'")]
    NameExhausted { base_name: String },
}

/// Convenience type alias for Results using SketchStoreError
pub type Result<T> = std::result::Result<T, SketchStoreError>;

impl SketchStoreError {
    /// Create a sketch not found error
    pub fn not_found(message: impl Into<String>, uri: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
            uri: uri.into(),
        }
    }

    /// Create an invalid sketch name error pointing at the offending main file
    pub fn invalid_name(message: impl Into<String>, main_file_uri: impl Into<String>) -> Self {
        Self::InvalidName {
            message: message.into(),
            main_file_uri: main_file_uri.into(),
        }
    }

    pub fn invalid_uri(uri: impl Into<String>) -> Self {
        Self::InvalidUri { uri: uri.into() }
    }

    pub fn sketch_not_accessible(path: impl Into<PathBuf>) -> Self {
        Self::SketchNotAccessible { path: path.into() }
    }

    pub fn toolchain(message: impl Into<String>) -> Self {
        Self::Toolchain {
            message: message.into(),
        }
    }

    /// Attach a path to an I/O error
    pub fn io_at(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::IoAt {
            path: path.into(),
            source,
        }
    }

    pub fn config_parse_failed(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::ConfigParseFailed {
            path: path.into(),
            source,
        }
    }

    pub fn recent_sketches_write_failed(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::RecentSketchesWriteFailed {
            path: path.into(),
            source,
        }
    }

    pub fn name_exhausted(base_name: impl Into<String>) -> Self {
        Self::NameExhausted {
            base_name: base_name.into(),
        }
    }

    /// True for the two failures callers usually treat as "no sketch here"
    pub fn is_not_found_or_invalid_name(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::InvalidName { .. })
    }
}

impl From<ToolchainError> for SketchStoreError {
    fn from(err: ToolchainError) -> Self {
        match err {
            ToolchainError::Io(e) => Self::Io(e),
            other => Self::toolchain(other.to_string()),
        }
    }
}
