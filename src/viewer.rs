//! Selection state and fetch lifecycle of the viewer.
//!
//! The viewer owns everything the rendering layer needs: the current folder,
//! the scene tree loaded for it, which scene and version are selected, and
//! whether the selected image is still loading. It reacts to four kinds of
//! events:
//!
//! | Event | Method |
//! |---|---|
//! | folder reference changed | [`Viewer::request`] |
//! | listing finished | [`Viewer::complete`] |
//! | user clicked a button | [`Viewer::select_scene`], [`Viewer::select_version`] |
//! | image element finished | [`Viewer::image_loaded`], [`Viewer::image_failed`] |
//!
//! ## Stale Responses
//!
//! Each request gets a [`FetchTicket`] stamped with a generation number.
//! Completing with a ticket from an older generation is ignored, so a slow
//! response for a previous folder can never overwrite the state of a newer
//! request.

use crate::load::{LoadError, LoadReport};
use crate::scene::{SceneEntry, SceneTree, VersionEntry};
use crate::types::FolderRef;
use tracing::debug;

/// What the viewer is currently showing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewStatus {
    /// No folder reference was supplied.
    NoFolder,
    Loading,
    Ready,
    /// Listing worked but yielded no valid scenes.
    Empty,
    /// Listing failed; the message is shown to the user.
    Failed(String),
}

/// Proof of a request, handed back on completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub generation: u64,
    pub folder: FolderRef,
}

#[derive(Debug)]
pub struct Viewer {
    folder: Option<FolderRef>,
    generation: u64,
    status: ViewStatus,
    scenes: SceneTree,
    scene_index: usize,
    version_index: usize,
    image_loading: bool,
}

impl Default for Viewer {
    fn default() -> Self {
        Self::new()
    }
}

impl Viewer {
    pub fn new() -> Self {
        Self {
            folder: None,
            generation: 0,
            status: ViewStatus::NoFolder,
            scenes: SceneTree::default(),
            scene_index: 0,
            version_index: 0,
            image_loading: false,
        }
    }

    /// Point the viewer at a folder.
    ///
    /// Returns a ticket when a listing must be fetched: the folder changed,
    /// or the previous attempt for it failed. Asking again for the folder
    /// that is already loading or loaded returns `None`.
    pub fn request(&mut self, folder: Option<FolderRef>) -> Option<FetchTicket> {
        let Some(folder) = folder else {
            self.generation += 1;
            self.folder = None;
            self.reset(ViewStatus::NoFolder);
            return None;
        };

        let same_folder = self.folder.as_ref() == Some(&folder);
        let settled = matches!(
            self.status,
            ViewStatus::Loading | ViewStatus::Ready | ViewStatus::Empty
        );
        if same_folder && settled {
            return None;
        }

        self.generation += 1;
        self.folder = Some(folder.clone());
        self.reset(ViewStatus::Loading);
        debug!(folder = %folder, generation = self.generation, "fetch requested");
        Some(FetchTicket {
            generation: self.generation,
            folder,
        })
    }

    /// Apply a finished listing.
    ///
    /// Returns `false` (and changes nothing) when the ticket is stale.
    pub fn complete(&mut self, ticket: &FetchTicket, result: Result<LoadReport, LoadError>) -> bool {
        if ticket.generation != self.generation {
            debug!(
                folder = %ticket.folder,
                stale = ticket.generation,
                current = self.generation,
                "ignoring stale listing"
            );
            return false;
        }

        match result {
            Ok(report) if !report.scenes.is_empty() => {
                self.reset(ViewStatus::Ready);
                self.scenes = report.scenes;
                self.image_loading = true;
            }
            Ok(_) | Err(LoadError::NoScenes { .. }) => self.reset(ViewStatus::Empty),
            Err(e) => self.reset(ViewStatus::Failed(e.to_string())),
        }
        true
    }

    /// Select a scene by index; the version resets to the first one.
    ///
    /// Returns whether the selection changed.
    pub fn select_scene(&mut self, index: usize) -> bool {
        if index == self.scene_index || index >= self.scenes.len() {
            return false;
        }
        self.scene_index = index;
        self.version_index = 0;
        self.image_loading = true;
        true
    }

    /// Select a version of the current scene by index.
    pub fn select_version(&mut self, index: usize) -> bool {
        let count = self.current_scene().map_or(0, |s| s.versions.len());
        if index == self.version_index || index >= count {
            return false;
        }
        self.version_index = index;
        self.image_loading = true;
        true
    }

    pub fn image_loaded(&mut self) {
        self.image_loading = false;
    }

    pub fn image_failed(&mut self) {
        self.image_loading = false;
    }

    pub fn status(&self) -> &ViewStatus {
        &self.status
    }

    pub fn folder(&self) -> Option<&FolderRef> {
        self.folder.as_ref()
    }

    pub fn scenes(&self) -> &SceneTree {
        &self.scenes
    }

    pub fn scene_index(&self) -> usize {
        self.scene_index
    }

    pub fn version_index(&self) -> usize {
        self.version_index
    }

    pub fn is_image_loading(&self) -> bool {
        self.image_loading
    }

    pub fn current_scene(&self) -> Option<&SceneEntry> {
        self.scenes.get(self.scene_index)
    }

    pub fn current_version(&self) -> Option<&VersionEntry> {
        self.current_scene()
            .and_then(|s| s.versions.get(self.version_index))
    }

    /// URL of the image for the active (scene, version) pair.
    pub fn current_image_url(&self) -> Option<&str> {
        self.current_version().map(|v| v.image_url.as_str())
    }

    /// User-facing text for the non-ready states.
    pub fn message(&self) -> Option<String> {
        match &self.status {
            ViewStatus::NoFolder => Some(
                "No folder ID provided. Add ?folderId=YOUR_FOLDER_ID to the URL.".to_string(),
            ),
            ViewStatus::Loading => Some("Loading scenes...".to_string()),
            ViewStatus::Empty => Some(
                "No valid scene images found. Check that the files follow the naming convention."
                    .to_string(),
            ),
            ViewStatus::Failed(reason) => Some(format!("Failed to load scenes: {reason}")),
            ViewStatus::Ready => None,
        }
    }

    /// Start from an empty tree in the given status.
    fn reset(&mut self, status: ViewStatus) {
        self.status = status;
        self.scenes = SceneTree::default();
        self.scene_index = 0;
        self.version_index = 0;
        self.image_loading = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listing::ListError;
    use crate::naming::Grammar;
    use crate::scene::group;
    use crate::test_helpers::ordered_entry;

    fn folder(id: &str) -> FolderRef {
        FolderRef::new(id).unwrap()
    }

    fn report(folder_id: &str) -> LoadReport {
        let mut entries = vec![
            ordered_entry(1, "living room", "opt a"),
            ordered_entry(1, "living room", "opt b"),
            ordered_entry(1, "living room", "opt c"),
            ordered_entry(2, "kitchen", "modern"),
        ];
        for e in &mut entries {
            e.image_url = format!("https://img/{}/{}", e.scene_name, e.version_name);
        }
        LoadReport {
            folder: folder(folder_id),
            grammar: Grammar::Ordered,
            scenes: group(&entries),
            listed: entries.len(),
            images: entries.len(),
            skipped: vec![],
        }
    }

    fn ready_viewer() -> Viewer {
        let mut viewer = Viewer::new();
        let ticket = viewer.request(Some(folder("a"))).unwrap();
        assert!(viewer.complete(&ticket, Ok(report("a"))));
        viewer
    }

    #[test]
    fn starts_without_folder() {
        let viewer = Viewer::new();
        assert_eq!(viewer.status(), &ViewStatus::NoFolder);
        assert!(viewer.message().unwrap().contains("folderId"));
        assert!(viewer.current_image_url().is_none());
    }

    #[test]
    fn missing_folder_is_not_a_fetch() {
        let mut viewer = ready_viewer();
        assert!(viewer.request(None).is_none());
        assert_eq!(viewer.status(), &ViewStatus::NoFolder);
        assert!(viewer.scenes().is_empty());
    }

    #[test]
    fn request_then_complete_is_ready() {
        let viewer = ready_viewer();
        assert_eq!(viewer.status(), &ViewStatus::Ready);
        assert_eq!(viewer.current_scene().unwrap().name, "living room");
        assert_eq!(
            viewer.current_image_url(),
            Some("https://img/living room/opt a")
        );
        assert!(viewer.is_image_loading());
        assert!(viewer.message().is_none());
    }

    #[test]
    fn same_folder_does_not_refetch() {
        let mut viewer = ready_viewer();
        assert!(viewer.request(Some(folder("a"))).is_none());
        assert_eq!(viewer.status(), &ViewStatus::Ready);
    }

    #[test]
    fn same_folder_refetches_after_failure() {
        let mut viewer = Viewer::new();
        let ticket = viewer.request(Some(folder("a"))).unwrap();
        viewer.complete(&ticket, Err(LoadError::Listing(ListError::Backend("down".into()))));
        assert!(matches!(viewer.status(), ViewStatus::Failed(_)));
        assert!(viewer.request(Some(folder("a"))).is_some());
    }

    #[test]
    fn selecting_scene_resets_version() {
        let mut viewer = ready_viewer();
        assert!(viewer.select_version(2));
        assert_eq!(viewer.version_index(), 2);
        assert!(viewer.select_scene(1));
        assert_eq!(viewer.scene_index(), 1);
        assert_eq!(viewer.version_index(), 0);
        assert_eq!(viewer.current_version().unwrap().name, "modern");
    }

    #[test]
    fn invalid_or_unchanged_selection_is_noop() {
        let mut viewer = ready_viewer();
        viewer.image_loaded();
        assert!(!viewer.select_scene(0));
        assert!(!viewer.select_scene(9));
        assert!(!viewer.select_version(0));
        assert!(!viewer.select_version(3));
        assert!(!viewer.is_image_loading());
    }

    #[test]
    fn loading_flag_follows_image_events() {
        let mut viewer = ready_viewer();
        viewer.image_loaded();
        assert!(!viewer.is_image_loading());
        viewer.select_version(1);
        assert!(viewer.is_image_loading());
        viewer.image_failed();
        assert!(!viewer.is_image_loading());
    }

    #[test]
    fn stale_completion_is_ignored() {
        let mut viewer = Viewer::new();
        let first = viewer.request(Some(folder("a"))).unwrap();
        let second = viewer.request(Some(folder("b"))).unwrap();
        assert!(second.generation > first.generation);

        assert!(viewer.complete(&second, Ok(report("b"))));
        assert!(!viewer.complete(&first, Err(LoadError::Listing(ListError::Backend("late".into())))));
        assert_eq!(viewer.status(), &ViewStatus::Ready);
        assert_eq!(viewer.folder().unwrap().as_str(), "b");
    }

    #[test]
    fn stale_completion_while_newer_request_pending() {
        let mut viewer = Viewer::new();
        let first = viewer.request(Some(folder("a"))).unwrap();
        let _second = viewer.request(Some(folder("b"))).unwrap();
        assert!(!viewer.complete(&first, Ok(report("a"))));
        assert_eq!(viewer.status(), &ViewStatus::Loading);
        assert!(viewer.scenes().is_empty());
    }

    #[test]
    fn clearing_folder_invalidates_pending_ticket() {
        let mut viewer = Viewer::new();
        let ticket = viewer.request(Some(folder("a"))).unwrap();
        viewer.request(None);
        assert!(!viewer.complete(&ticket, Ok(report("a"))));
        assert_eq!(viewer.status(), &ViewStatus::NoFolder);
    }

    #[test]
    fn no_scenes_is_empty_state() {
        let mut viewer = Viewer::new();
        let ticket = viewer.request(Some(folder("a"))).unwrap();
        viewer.complete(&ticket, Err(LoadError::NoScenes { listed: 3, skipped: 3 }));
        assert_eq!(viewer.status(), &ViewStatus::Empty);
        assert!(viewer.scenes().is_empty());
        assert!(viewer.message().unwrap().contains("naming convention"));
    }

    #[test]
    fn failure_clears_previous_tree() {
        let mut viewer = ready_viewer();
        viewer.select_scene(1);
        let ticket = viewer.request(Some(folder("b"))).unwrap();
        viewer.complete(
            &ticket,
            Err(LoadError::Listing(ListError::status(403, "forbidden"))),
        );
        assert!(viewer.scenes().is_empty());
        assert_eq!(viewer.scene_index(), 0);
        assert_eq!(
            viewer.message().unwrap(),
            "Failed to load scenes: could not list folder: backend returned HTTP 403: forbidden"
        );
    }
}
