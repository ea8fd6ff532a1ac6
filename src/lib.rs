//! Sketch Store - discover, load and manage Arduino sketches on disk.
//!
//! This library provides the sketch management layer of an Arduino IDE: walking a
//! sketchbook into a tree of sketches, deciding whether a folder is a sketch through
//! a toolchain, creating, copying, archiving and deleting sketches, and keeping a
//! bounded list of recently opened sketches.
//!
//! # Public API
//! The main public interface is re-exported from the [`core`] module, which provides:
//! - [`SketchStore`], the service behind every operation
//! - Sketch data types and the sketchbook tree
//! - The toolchain, configuration and notification traits
//! - Error handling and result types

pub mod commands;
pub mod core;

// Re-export the core public API for external users
pub use core::{
    is_accessible_sketch_path,
    ArduinoCli,
    FileConfig,
    LoadSketchResponse,
    LogNotifier,
    NotificationSink,
    Result,
    Sketch,
    SketchContainer,
    SketchRef,
    SketchStore,
    SketchStoreError,
    SketchWithDetails,
    SketchbookConfig,
    StoreConfig,
    Toolchain,
    ToolchainError,
};
