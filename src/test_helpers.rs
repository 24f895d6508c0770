//! Shared test utilities for the scene-viewer test suite.
//!
//! Builders for parsed entries, a scratch render folder on disk, and lookup
//! helpers that panic with the available names on a miss.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tree = group(&[ordered_entry(1, "hall", "opt a")]);
//! let hall = find_scene(&tree, "hall");
//! assert_eq!(find_version(hall, "opt a").id, "opt-a");
//! ```

use crate::scene::{SceneEntry, SceneTree, VersionEntry};
use crate::types::ParsedEntry;
use std::path::Path;
use tempfile::TempDir;

// =========================================================================
// Entry builders
// =========================================================================

/// Entry as the two-part grammar would produce it (no order).
pub fn entry(scene: &str, version: &str) -> ParsedEntry {
    ParsedEntry {
        scene_name: scene.to_string(),
        version_name: version.to_string(),
        source_file_name: format!("{scene}-{version}.png"),
        image_url: String::new(),
        order: None,
    }
}

/// Entry as the ordered grammar would produce it.
pub fn ordered_entry(order: i64, scene: &str, version: &str) -> ParsedEntry {
    ParsedEntry {
        source_file_name: format!(
            "{order}_{}_{}.png",
            scene.replace(' ', "-"),
            version.replace(' ', "-")
        ),
        order: Some(order),
        ..entry(scene, version)
    }
}

// =========================================================================
// Fixture setup
// =========================================================================

/// Create a temp root with a `house/` folder holding the given (empty)
/// files.
pub fn render_folder(names: &[&str]) -> TempDir {
    let tmp = TempDir::new().unwrap();
    let house = tmp.path().join("house");
    std::fs::create_dir_all(&house).unwrap();
    for name in names {
        write_file(&house, name);
    }
    tmp
}

fn write_file(dir: &Path, name: &str) {
    std::fs::write(dir.join(name), b"").unwrap();
}

// =========================================================================
// Tree lookups (panic with the available names on a miss)
// =========================================================================

/// Find a scene by display name. Panics if not found.
pub fn find_scene<'a>(tree: &'a SceneTree, name: &str) -> &'a SceneEntry {
    tree.iter().find(|s| s.name == name).unwrap_or_else(|| {
        let names: Vec<&str> = tree.iter().map(|s| s.name.as_str()).collect();
        panic!("scene '{name}' not found. Available: {names:?}")
    })
}

/// Find a version by display name within a scene. Panics if not found.
pub fn find_version<'a>(scene: &'a SceneEntry, name: &str) -> &'a VersionEntry {
    scene.version(name).unwrap_or_else(|| {
        let names: Vec<&str> = scene.versions.iter().map(|v| v.name.as_str()).collect();
        panic!(
            "version '{name}' not found in scene '{}'. Available: {names:?}",
            scene.name
        )
    })
}

/// Scene names in tree order.
pub fn scene_names(tree: &SceneTree) -> Vec<&str> {
    tree.iter().map(|s| s.name.as_str()).collect()
}
