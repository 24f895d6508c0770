//! CLI output formatting for every command.
//!
//! # Information-First Display
//!
//! Output leads with what a render *is* (scene and version names, positional
//! index) and shows where it came from as indented context lines. Read top to
//! bottom, a scan is an inventory of the folder as the viewer will present it.
//!
//! # Output Format
//!
//! ## Scan
//!
//! ```text
//! Folder house (ordered: order_scene_version.ext)
//!
//! Scenes
//! 001 living room (2 versions)
//!     Id: living-room
//!     Order: 1
//!     001 opt a
//!         Source: 1_living-room_opt-a.png
//!     002 opt b
//!         Source: 1_living-room_opt-b.png
//!
//! Skipped
//!     notes.png: expected 3 parts separated by '_', found 1
//!
//! Listed 4 files, 3 images, 1 scene, 2 versions, 1 skipped
//! ```
//!
//! ## Parse
//!
//! ```text
//! 1_living-room_opt-a.png → living room / opt a (order 1)
//! notes.png ✗ expected 3 parts separated by '_', found 1
//! ```
//!
//! ## Build
//!
//! ```text
//! Ready: 1 scene, 2 versions
//!     Showing: living room / opt a
//! Wrote dist/index.html
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure.

use crate::load::LoadReport;
use crate::naming::{Grammar, parse_file_name};
use crate::viewer::{ViewStatus, Viewer};
use std::path::Path;

// ============================================================================
// Shared entity display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// `1 scene`, `3 versions`.
fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

/// Format a scene header: positional index + name + version count.
///
/// ```text
/// 001 living room (2 versions)
/// ```
fn scene_header(index: usize, name: &str, versions: usize) -> String {
    format!(
        "{} {} ({})",
        format_index(index),
        name,
        plural(versions, "version")
    )
}

// ============================================================================
// Scan
// ============================================================================

/// Format the scene tree of one load, with skipped files and totals.
pub fn format_scan_output(report: &LoadReport) -> Vec<String> {
    let mut lines = vec![
        format!(
            "Folder {} ({}: {})",
            report.folder,
            report.grammar,
            report.grammar.convention()
        ),
        String::new(),
        "Scenes".to_string(),
    ];

    for (i, scene) in report.scenes.iter().enumerate() {
        lines.push(scene_header(i + 1, &scene.name, scene.versions.len()));
        lines.push(format!("{}Id: {}", indent(1), scene.id));
        if let Some(order) = scene.order {
            lines.push(format!("{}Order: {}", indent(1), order));
        }
        for (j, version) in scene.versions.iter().enumerate() {
            lines.push(format!(
                "{}{} {}",
                indent(1),
                format_index(j + 1),
                version.name
            ));
            lines.push(format!("{}Source: {}", indent(2), version.source_file));
        }
    }

    if !report.skipped.is_empty() {
        lines.push(String::new());
        lines.push("Skipped".to_string());
        for file in &report.skipped {
            lines.push(format!("{}{}: {}", indent(1), file.name, file.reason));
        }
    }

    lines.push(String::new());
    lines.push(format!(
        "Listed {}, {}, {}, {}, {} skipped",
        plural(report.listed, "file"),
        plural(report.images, "image"),
        plural(report.scenes.len(), "scene"),
        plural(report.scenes.version_count(), "version"),
        report.skipped.len()
    ));

    lines
}

/// Print scan output to stdout.
pub fn print_scan_output(report: &LoadReport) {
    for line in format_scan_output(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Parse
// ============================================================================

/// Format how each filename parses under `grammar`.
pub fn format_parse_results<S: AsRef<str>>(names: &[S], grammar: Grammar) -> Vec<String> {
    names
        .iter()
        .map(|name| {
            let name = name.as_ref();
            match parse_file_name(name, grammar) {
                Ok(entry) => match entry.order {
                    Some(order) => format!(
                        "{} → {} / {} (order {})",
                        name, entry.scene_name, entry.version_name, order
                    ),
                    None => format!("{} → {} / {}", name, entry.scene_name, entry.version_name),
                },
                Err(e) => format!("{} ✗ {}", name, e),
            }
        })
        .collect()
}

/// Print parse results to stdout.
pub fn print_parse_results<S: AsRef<str>>(names: &[S], grammar: Grammar) {
    for line in format_parse_results(names, grammar) {
        println!("{}", line);
    }
}

// ============================================================================
// Build
// ============================================================================

/// Format the outcome of a build: the state the page was rendered in and
/// where it was written.
pub fn format_build_output(viewer: &Viewer, page: &Path) -> Vec<String> {
    let mut lines = Vec::new();
    match viewer.status() {
        ViewStatus::Ready => {
            lines.push(format!(
                "Ready: {}, {}",
                plural(viewer.scenes().len(), "scene"),
                plural(viewer.scenes().version_count(), "version")
            ));
            if let (Some(scene), Some(version)) = (viewer.current_scene(), viewer.current_version())
            {
                lines.push(format!(
                    "{}Showing: {} / {}",
                    indent(1),
                    scene.name,
                    version.name
                ));
            }
        }
        _ => {
            if let Some(message) = viewer.message() {
                lines.push(message);
            }
        }
    }
    lines.push(format!("Wrote {}", page.display()));
    lines
}

/// Print build output to stdout.
pub fn print_build_output(viewer: &Viewer, page: &Path) {
    for line in format_build_output(viewer, page) {
        println!("{}", line);
    }
}
