//! Shared types passed between listing, parsing and grouping.
//!
//! A [`RawFile`] is what a backend reports for one folder entry; a
//! [`ParsedEntry`] is what the name parser makes of it. Both are scoped to a
//! single listing call and never mutated after the loader has filled in the
//! image URL.

use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Extensions accepted as images when a backend doesn't report a usable
/// content type.
const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp", "gif", "avif"];

/// Query parameter carrying the folder reference in a viewer URL.
pub const FOLDER_QUERY_PARAM: &str = "folderId";

/// Metadata for one file reported by a backend listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawFile {
    /// Bare filename, without any folder path.
    pub name: String,
    /// Backend identifier: object path, Drive file id, or path relative to
    /// the local root.
    pub handle: String,
    pub content_type: String,
    /// Drive resource key for link-shared files.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_key: Option<String>,
}

impl RawFile {
    pub fn new(name: &str, handle: &str, content_type: &str) -> Self {
        Self {
            name: name.to_string(),
            handle: handle.to_string(),
            content_type: content_type.to_string(),
            resource_key: None,
        }
    }

    /// Whether this entry should be fed to the name parser.
    ///
    /// The content type decides when the backend reports a specific one;
    /// generic or missing types fall back to the filename extension.
    /// Folder placeholders are never images.
    pub fn is_image(&self) -> bool {
        if self.name.is_empty() || self.name.ends_with('/') {
            return false;
        }
        let content_type = self.content_type.trim().to_ascii_lowercase();
        if content_type.starts_with("image/") {
            return true;
        }
        if !content_type.is_empty() && content_type != "application/octet-stream" {
            return false;
        }
        self.name
            .rsplit_once('.')
            .map(|(_, ext)| {
                IMAGE_EXTENSIONS
                    .iter()
                    .any(|known| ext.eq_ignore_ascii_case(known))
            })
            .unwrap_or(false)
    }
}

/// One filename decoded into scene and version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedEntry {
    pub scene_name: String,
    pub version_name: String,
    pub source_file_name: String,
    /// Empty until the loader resolves it through the backend.
    pub image_url: String,
    /// Present only under the ordered grammar.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FolderRefError {
    #[error("no folder reference given (add ?folderId=... to the URL)")]
    Missing,
    #[error("invalid viewer URL '{0}'")]
    InvalidUrl(String),
}

/// Opaque, non-blank reference to a remote folder.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FolderRef(String);

impl FolderRef {
    /// Trim and validate a folder reference.
    pub fn new(raw: &str) -> Result<Self, FolderRefError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(FolderRefError::Missing);
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Read the `folderId` query parameter from a viewer URL.
    ///
    /// `https://example.com/viewer?folderId=abc123` → `abc123`
    pub fn from_url(url: &str) -> Result<Self, FolderRefError> {
        let parsed = Url::parse(url).map_err(|_| FolderRefError::InvalidUrl(url.to_string()))?;
        let value = parsed
            .query_pairs()
            .find(|(key, _)| key == FOLDER_QUERY_PARAM)
            .map(|(_, value)| value.into_owned())
            .ok_or(FolderRefError::Missing)?;
        Self::new(&value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FolderRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
