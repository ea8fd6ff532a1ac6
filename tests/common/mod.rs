//! Consolidated test utilities for sketch-store
//!
//! This module provides unified testing utilities for integration tests,
//! focused on real sketchbook folders on disk.

pub mod assertions;
pub mod fixtures;
pub mod sketchbook;
