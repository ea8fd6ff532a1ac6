//! Common assertion helpers for test output validation
//!
//! Provides predicates for validating sketch-store command output and error
//! messages.

#![allow(dead_code)]

use predicates::prelude::*;

/// Creates a predicate that checks for a missing sketch error
pub fn sketch_not_found() -> impl Predicate<str> {
    predicates::str::contains("Sketch not found")
}

/// Creates a predicate that checks for an invalid sketch name error
pub fn invalid_sketch_name() -> impl Predicate<str> {
    predicates::str::contains("Invalid sketch name")
}

/// Creates a predicate that checks for a listed sketch name
pub fn lists_sketch(name: &str) -> impl Predicate<str> {
    predicates::str::contains(name.to_string())
}

/// Creates a predicate that checks for a new sketch name of any day
pub fn new_sketch_name() -> impl Predicate<str> {
    predicates::str::is_match(r"sketch_[a-z]{3}\d{1,2}[a-z]+").expect("valid regex")
}
