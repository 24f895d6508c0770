//! From folder reference to scene tree.
//!
//! ```text
//! FileLister ─→ RawFile* ─→ is_image ─→ parse_file_name ─→ resolve URL ─→ group ─→ SceneTree
//!                                            │
//!                                            └─→ skipped (logged, counted)
//! ```
//!
//! Files whose names don't fit the active grammar are never fatal. They are
//! logged, collected in [`LoadReport::skipped`], and only matter if nothing
//! valid is left, which is reported as [`LoadError::NoScenes`].

use crate::listing::{FileLister, ListError, UrlResolver};
use crate::naming::{Grammar, parse_file_name};
use crate::scene::{SceneTree, group};
use crate::types::{FolderRef, ParsedEntry};
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum LoadError {
    /// Transport or backend failure.
    #[error("could not list folder: {0}")]
    Listing(#[from] ListError),
    /// The listing worked but nothing in it is a valid scene image.
    #[error("no valid scene images found ({listed} files listed, {skipped} skipped)")]
    NoScenes { listed: usize, skipped: usize },
}

/// A file that was listed as an image but didn't parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedFile {
    pub name: String,
    pub reason: String,
}

/// Result of one successful load.
#[derive(Debug, Clone, Serialize)]
pub struct LoadReport {
    pub folder: FolderRef,
    pub grammar: Grammar,
    pub scenes: SceneTree,
    /// Files reported by the backend.
    pub listed: usize,
    /// Of those, files that looked like images.
    pub images: usize,
    pub skipped: Vec<SkippedFile>,
}

/// List a folder and build its scene tree.
pub fn load_scenes(
    lister: &impl FileLister,
    resolver: &impl UrlResolver,
    folder: &FolderRef,
    grammar: Grammar,
) -> Result<LoadReport, LoadError> {
    let files = lister.list(folder)?;
    let listed = files.len();

    let mut entries: Vec<ParsedEntry> = Vec::new();
    let mut skipped = Vec::new();
    let mut images = 0;

    for file in files.iter().filter(|f| f.is_image()) {
        images += 1;
        match parse_file_name(&file.name, grammar) {
            Ok(mut entry) => {
                entry.image_url = resolver.resolve(file);
                entries.push(entry);
            }
            Err(e) => {
                warn!(
                    file = %file.name,
                    expected = grammar.convention(),
                    "skipping file: {e}"
                );
                skipped.push(SkippedFile {
                    name: file.name.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }

    if entries.is_empty() {
        return Err(LoadError::NoScenes {
            listed,
            skipped: skipped.len(),
        });
    }

    let scenes = group(&entries);
    info!(
        folder = %folder,
        scenes = scenes.len(),
        versions = scenes.version_count(),
        skipped = skipped.len(),
        "scenes loaded"
    );

    Ok(LoadReport {
        folder: folder.clone(),
        grammar,
        scenes,
        listed,
        images,
        skipped,
    })
}
