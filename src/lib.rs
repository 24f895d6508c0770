//! # Scene Viewer
//!
//! Turns a folder of rendered images into an interactive viewer. Each
//! filename says which scene it shows and which design version it is; the
//! viewer groups files by scene and lets you flip between versions.
//!
//! # Architecture: Folder to Page
//!
//! ```text
//! 1. List      folder id  →  RawFile*       (Drive, GCS, proxy, or local dir)
//! 2. Parse     filename   →  ParsedEntry    (scene, version, order)
//! 3. Group     entries    →  SceneTree      (ordered scenes, sorted versions)
//! 4. View      tree       →  Viewer state   (selection, loading, stale guard)
//! 5. Render    state      →  index.html     (Maud + embedded script)
//! ```
//!
//! Stages 2 and 3 are pure functions, so the whole naming and grouping
//! logic is tested without any network. Listing sits behind the
//! [`listing::FileLister`] and [`listing::UrlResolver`] traits, with a mock
//! in tests and one implementation per backend.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`naming`] | Filename grammars: `order_scene_version.ext` and `scene-version.ext` |
//! | [`scene`] | Groups parsed entries into the ordered scene tree |
//! | [`types`] | Shared data: `RawFile`, `ParsedEntry`, `FolderRef` |
//! | [`listing`] | Folder listing and image links for each backend |
//! | [`load`] | List, filter, parse, resolve and group in one call |
//! | [`viewer`] | Selection state and the stale-response guard |
//! | [`generate`] | Renders the viewer page with Maud |
//! | [`config`] | `scene-viewer.toml` loading, layering, validation and colors |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Identity by Slug
//!
//! Scenes and versions are keyed by the slug of their display name
//! (lowercase, whitespace to `-`). Two files that slug the same collapse into
//! one entry and the later one wins, so a re-export never shows up twice.
//!
//! ## Bad Filenames Are Not Errors
//!
//! A render folder always collects strays: notes, previews, half-renamed
//! files. Anything that doesn't parse is logged and skipped. Only a folder
//! with nothing usable left is reported, and it is reported as *empty*, not
//! as a failure.
//!
//! ## Latest Request Wins
//!
//! Every folder request gets a ticket. A response arriving for an older
//! ticket is dropped, so switching folders quickly can never show the
//! previous folder's scenes.

pub mod config;
pub mod generate;
pub mod listing;
pub mod load;
pub mod naming;
pub mod output;
pub mod scene;
pub mod types;
pub mod viewer;

#[cfg(test)]
pub(crate) mod test_helpers;
