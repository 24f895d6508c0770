//! Listing a directory on disk.
//!
//! The folder reference is a sub-directory of `[listing.local] root`; only
//! its direct children are listed. Useful for previewing a render folder
//! before uploading it, and for tests.
//!
//! Links are built from `base_url` when set (e.g. `https://cdn.example/renders`
//! or a relative `images`), otherwise they are `file://` URLs.

use super::backend::{FileLister, ListError, PAGE_SIZE, UrlResolver};
use crate::types::{FolderRef, RawFile};
use reqwest::Url;
use std::path::{Component, Path, PathBuf};
use tracing::info;
use walkdir::WalkDir;

pub struct LocalBackend {
    root: PathBuf,
    base_url: Option<String>,
}

impl LocalBackend {
    pub fn new(root: &Path, base_url: Option<String>) -> Result<Self, ListError> {
        let root = std::path::absolute(root)?;
        Ok(Self {
            root,
            base_url: base_url.filter(|b| !b.trim().is_empty()),
        })
    }

    /// Resolve the folder reference to a directory under the root, refusing
    /// anything that would step outside it.
    fn folder_dir(&self, folder: &FolderRef) -> Result<PathBuf, ListError> {
        let relative = Path::new(folder.as_str());
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes {
            return Err(ListError::InvalidFolder(format!(
                "'{folder}' must be a relative path inside the local root"
            )));
        }
        let dir = self.root.join(relative);
        if !dir.is_dir() {
            return Err(ListError::InvalidFolder(format!(
                "{} is not a directory",
                dir.display()
            )));
        }
        Ok(dir)
    }
}

impl FileLister for LocalBackend {
    fn list(&self, folder: &FolderRef) -> Result<Vec<RawFile>, ListError> {
        let dir = self.folder_dir(folder)?;
        let mut files = Vec::new();

        for entry in WalkDir::new(&dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().to_string();
            if !entry.file_type().is_file() || name.starts_with('.') {
                continue;
            }
            let handle = relative_handle(&self.root, entry.path());
            let content_type = mime_guess::from_path(entry.path())
                .first()
                .map(|m| m.essence_str().to_string())
                .unwrap_or_default();
            files.push(RawFile::new(&name, &handle, &content_type));
            if files.len() == PAGE_SIZE {
                break;
            }
        }

        info!(dir = %dir.display(), count = files.len(), "local listing complete");
        Ok(files)
    }
}

impl UrlResolver for LocalBackend {
    fn resolve(&self, file: &RawFile) -> String {
        match &self.base_url {
            Some(base) => {
                let encoded: Vec<String> = file
                    .handle
                    .split('/')
                    .map(|segment| urlencoding::encode(segment).into_owned())
                    .collect();
                format!("{}/{}", base.trim_end_matches('/'), encoded.join("/"))
            }
            None => {
                let path = self.root.join(&file.handle);
                Url::from_file_path(&path)
                    .map(String::from)
                    .unwrap_or_else(|_| path.display().to_string())
            }
        }
    }
}

/// Path of `path` relative to `root`, with `/` separators on every platform.
fn relative_handle(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
