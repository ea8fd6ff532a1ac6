//! Unified output formatting utilities for consistent CLI presentation.
//!
//! This module provides standardized formatting functions for all sketch-store output,
//! ensuring consistent colors, spacing, and message structure across commands.
//!
//! # Design Principles
//! - **Consistent color scheme**: Red for errors, blue for sketches, bright_black for paths
//! - **Standardized spacing**: Newline before and after all command outputs
//! - **Machine readable mode**: Every result can also be printed as JSON

use crate::core::error::Result;
use crate::core::file_uri;
use crate::core::sketch::{Sketch, SketchContainer, SketchWithDetails};
use colored::*;
use serde::Serialize;
use url::Url;

/// Formats and prints an error message with consistent styling
///
/// # Format
/// ```text
///
/// ✕ Error: <message>
///
/// ```
pub fn print_error(message: &str) {
    eprintln!("\n{} {}\n", "✕ Error:".red(), message.white());
}

/// Formats and prints a success message with consistent styling
///
/// # Format
/// ```text
///
/// ✓ <message>
/// ```
pub fn print_success(message: &str) {
    println!("\n{} {}", "✓".green(), message.white());
}

/// Formats and prints an informational message with consistent styling
pub fn print_info(message: &str) {
    println!("\n{}\n", message.white());
}

/// Formats and prints a section header with consistent styling
///
/// # Format
/// ```text
///
/// <header>:
///
/// ```
pub fn print_section_header(header: &str) {
    println!("\n{}:\n", header.white());
}

/// Pretty-prints any result as JSON on stdout
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn display_path(uri: &Url) -> String {
    file_uri::to_path(uri)
        .map(|path| path.display().to_string())
        .unwrap_or_else(|_| uri.to_string())
}

/// Renders a sketch container as an indented tree
pub fn render_sketch_tree(container: &SketchContainer) -> Vec<String> {
    let mut lines = Vec::new();
    render_container(container, 0, &mut lines);
    lines
}

fn render_container(container: &SketchContainer, depth: usize, lines: &mut Vec<String>) {
    let indent = "  ".repeat(depth);
    let mut sketches: Vec<_> = container.sketches.iter().collect();
    sketches.sort_by(|left, right| left.name.cmp(&right.name));
    for sketch in sketches {
        lines.push(format!(
            "{indent}{} {}",
            sketch.name.blue(),
            display_path(&sketch.uri).bright_black()
        ));
    }

    let mut children: Vec<_> = container.children.iter().collect();
    children.sort_by(|left, right| left.label.cmp(&right.label));
    for child in children {
        lines.push(format!("{indent}{}/", child.label.white()));
        render_container(child, depth + 1, lines);
    }
}

pub fn print_sketch_tree(container: &SketchContainer) {
    if container.is_empty() {
        print_info("No sketches found");
        return;
    }

    let label = if container.label.is_empty() {
        "Sketches"
    } else {
        container.label.as_str()
    };
    print_section_header(label);
    for line in render_sketch_tree(container) {
        println!("   {line}");
    }
    println!();
}

/// Prints a loaded sketch and its file listing
pub fn print_sketch(sketch: &Sketch) {
    print_section_header(&sketch.name);
    println!("   Location:  {}", display_path(&sketch.uri).blue());
    println!("   Main file: {}", display_path(&sketch.main_file_uri).white());

    let groups: [(&str, &[Url]); 2] = [
        ("Sketch files", &sketch.other_sketch_file_uris),
        ("Additional files", &sketch.additional_file_uris),
    ];
    for (title, uris) in groups {
        if uris.is_empty() {
            continue;
        }
        println!("   {title}:");
        for uri in uris {
            println!("     {} {}", "•".bright_black(), display_path(uri).white());
        }
    }
    println!();
}

/// Prints a numbered list of sketches, most recent first
pub fn print_sketch_list(sketches: &[SketchWithDetails]) {
    for (index, sketch) in sketches.iter().enumerate() {
        println!(
            "   {} {} {}",
            format!("[{}]", index + 1).bright_black(),
            sketch.name.blue(),
            display_path(&sketch.uri).bright_black()
        );
    }
    println!();
}
