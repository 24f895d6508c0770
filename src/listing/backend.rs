//! Listing backend traits and shared error type.
//!
//! Every backend answers two questions about a remote folder:
//!
//! - [`FileLister`]: which files are in it? (network-bound, fallible)
//! - [`UrlResolver`]: where can a browser fetch one of them? (pure, no I/O)
//!
//! Keeping the two apart lets the name parser and grouper stay ignorant of
//! how links are built, which differs per backend.

use crate::types::{FolderRef, RawFile};
use thiserror::Error;

/// Maximum number of files requested from a backend. No further pages are
/// fetched.
pub const PAGE_SIZE: usize = 1000;

/// Longest error body echoed back in an error message.
const MAX_ERROR_BODY: usize = 500;

#[derive(Error, Debug)]
pub enum ListError {
    #[error("invalid folder reference: {0}")]
    InvalidFolder(String),
    #[error("missing credential: environment variable {0} is not set")]
    MissingCredential(String),
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("backend returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("could not decode listing: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("backend error: {0}")]
    Backend(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),
}

impl ListError {
    /// Build a status error, truncating long bodies.
    pub fn status(status: u16, body: &str) -> Self {
        let body = body.trim();
        let body = match body.char_indices().nth(MAX_ERROR_BODY) {
            Some((cut, _)) => format!("{}...", &body[..cut]),
            None => body.to_string(),
        };
        ListError::Status { status, body }
    }
}

/// Lists the raw file metadata of a folder.
pub trait FileLister {
    /// Return at most [`PAGE_SIZE`] entries.
    ///
    /// Fails (never returns an empty list instead) when the folder is invalid,
    /// inaccessible, or the backend rejects the request.
    fn list(&self, folder: &FolderRef) -> Result<Vec<RawFile>, ListError>;
}

/// Turns a listed file into a URL usable directly as an image source.
pub trait UrlResolver {
    fn resolve(&self, file: &RawFile) -> String;
}
