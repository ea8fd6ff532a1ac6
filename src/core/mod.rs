//! Core functionality for the sketch-store tool.
//!
//! This module provides the building blocks for sketch discovery, identity
//! resolution, lifecycle operations and recently opened sketch tracking.

pub mod command_init;
pub mod config;
pub mod dirs;
pub mod discovery;
pub mod error;
pub mod file_uri;
pub mod notify;
pub mod output;
pub mod recent;
pub mod sketch;
pub mod sketch_name;
pub mod store;
pub mod temp;
pub mod toolchain;

// === Error handling ===
// Core error types and result type used throughout the application
pub use error::{Result, SketchStoreError};

// === Sketch store ===
// The service that owns sketch identity and the recent sketches record
pub use store::{is_accessible_sketch_path, SketchStore, DEFAULT_INO};

// === Data model ===
pub use sketch::{Sketch, SketchContainer, SketchRef, SketchWithDetails};

// === Collaborators ===
// Toolchain, configuration and notification seams of the store
pub use config::{FileConfig, SketchbookConfig, StoreConfig};
pub use notify::{LogNotifier, NotificationSink};
pub use toolchain::{ArduinoCli, LoadSketchResponse, Toolchain, ToolchainError};

// === Naming ===
pub use sketch_name::{index_to_letters, letters_to_index, SketchNamer};

// === Command initialization ===
pub use command_init::{StoreInit, StoreOptions};

// === Output formatting ===
// Unified output formatting for consistent CLI presentation
pub use output::{
    print_error, print_info, print_json, print_section_header, print_sketch, print_sketch_list,
    print_sketch_tree, print_success,
};
