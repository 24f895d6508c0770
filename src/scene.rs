//! Grouping parsed filenames into scenes and versions.
//!
//! The grouper is the last pure step before presentation: it takes the
//! [`ParsedEntry`] list produced by the name parser and builds the
//! [`SceneTree`] the viewer selects from.
//!
//! ```text
//! 1_living-room_opt-a.png  ┐
//! 1_living-room_opt-b.png  ├─→  living room (order 1): opt a, opt b
//! 2_kitchen_modern.png     ┘    kitchen     (order 2): modern
//! ```
//!
//! ## Ordering
//!
//! - Scenes with an order prefix sort by that number (ties by name), and come
//!   before scenes without one. Without a prefix, scenes sort by name.
//! - Versions always sort by name.
//!
//! Name comparisons are plain case-sensitive string comparisons.
//!
//! ## Duplicates
//!
//! Identity is the slug, so `"Opt A"` and `"opt  a"` are the same version.
//! The later entry always wins: a repeated (scene, version) pair replaces the
//! earlier version, and a different scene name that slugs to an existing
//! scene id replaces that scene outright. A scene keeps the order of the
//! first entry that created it.

use crate::naming::slugify;
use crate::types::ParsedEntry;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use tracing::debug;

/// One selectable variant of a scene.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionEntry {
    pub id: String,
    pub name: String,
    pub image_url: String,
    /// Filename the version was parsed from.
    pub source_file: String,
}

/// A named subject with its versions, sorted by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneEntry {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
    pub versions: Vec<VersionEntry>,
}

impl SceneEntry {
    pub fn version(&self, name: &str) -> Option<&VersionEntry> {
        self.versions.iter().find(|v| v.name == name)
    }
}

/// Ordered list of scenes handed to the viewer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SceneTree {
    scenes: Vec<SceneEntry>,
}

impl SceneTree {
    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    pub fn get(&self, index: usize) -> Option<&SceneEntry> {
        self.scenes.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SceneEntry> {
        self.scenes.iter()
    }

    /// Look up a version by display names.
    pub fn find(&self, scene_name: &str, version_name: &str) -> Option<&VersionEntry> {
        self.scenes
            .iter()
            .find(|s| s.name == scene_name)
            .and_then(|s| s.version(version_name))
    }

    /// Total number of versions across all scenes.
    pub fn version_count(&self) -> usize {
        self.scenes.iter().map(|s| s.versions.len()).sum()
    }
}

impl<'a> IntoIterator for &'a SceneTree {
    type Item = &'a SceneEntry;
    type IntoIter = std::slice::Iter<'a, SceneEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.scenes.iter()
    }
}

struct SceneAcc<'a> {
    name: &'a str,
    order: Option<i64>,
    /// Keyed by version slug.
    versions: BTreeMap<String, &'a ParsedEntry>,
}

/// Build the scene tree from parsed entries.
///
/// Pure and deterministic for a given input order. An empty input yields an
/// empty tree.
pub fn group(entries: &[ParsedEntry]) -> SceneTree {
    let mut scenes: BTreeMap<String, SceneAcc> = BTreeMap::new();

    for entry in entries {
        let scene_id = slugify(&entry.scene_name);
        let acc = scenes.entry(scene_id.clone()).or_insert_with(|| SceneAcc {
            name: &entry.scene_name,
            order: entry.order,
            versions: BTreeMap::new(),
        });

        if acc.name != entry.scene_name {
            debug!(
                scene = %scene_id,
                previous = acc.name,
                replacement = %entry.scene_name,
                "scene id collision, keeping later scene"
            );
            *acc = SceneAcc {
                name: &entry.scene_name,
                order: entry.order,
                versions: BTreeMap::new(),
            };
        }

        if let Some(previous) = acc.versions.insert(slugify(&entry.version_name), entry) {
            debug!(
                scene = %entry.scene_name,
                version = %entry.version_name,
                replaced = %previous.source_file_name,
                by = %entry.source_file_name,
                "duplicate version, keeping later file"
            );
        }
    }

    let mut tree: Vec<SceneEntry> = scenes
        .into_iter()
        .map(|(id, acc)| {
            let mut versions: Vec<VersionEntry> = acc
                .versions
                .into_iter()
                .map(|(version_id, parsed)| VersionEntry {
                    id: version_id,
                    name: parsed.version_name.clone(),
                    image_url: parsed.image_url.clone(),
                    source_file: parsed.source_file_name.clone(),
                })
                .collect();
            versions.sort_by(|a, b| a.name.cmp(&b.name));
            SceneEntry {
                id,
                name: acc.name.to_string(),
                order: acc.order,
                versions,
            }
        })
        .collect();

    tree.sort_by(compare_scenes);
    SceneTree { scenes: tree }
}

fn compare_scenes(a: &SceneEntry, b: &SceneEntry) -> Ordering {
    match (a.order, b.order) {
        (Some(x), Some(y)) => x.cmp(&y).then_with(|| a.name.cmp(&b.name)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.name.cmp(&b.name),
    }
}
