//! Drive-style metadata listing (files API v3, API key access).
//!
//! The folder reference is a Drive folder id. Listing asks for the folder's
//! direct, non-trashed children and only the fields the viewer needs:
//!
//! ```text
//! GET https://www.googleapis.com/drive/v3/files
//!     ?q='<folder>' in parents and trashed=false
//!     &fields=files(id,name,mimeType,resourceKey)
//!     &pageSize=1000
//!     &key=<api key>
//! ```
//!
//! Image links come in two flavors, see [`DriveLink`].

use super::backend::{FileLister, ListError, PAGE_SIZE, UrlResolver};
use super::http::{build_url, send_json};
use crate::config::DriveLink;
use crate::types::{FolderRef, RawFile};
use reqwest::Url;
use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::{debug, info};

const FILES_URL: &str = "https://www.googleapis.com/drive/v3/files";
const PUBLIC_CONTENT_URL: &str = "https://drive.google.com/uc";
const FIELDS: &str = "files(id,name,mimeType,resourceKey)";

/// One file record as returned by the files API (and relayed by the proxy).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DriveFile {
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    mime_type: String,
    resource_key: Option<String>,
}

impl From<DriveFile> for RawFile {
    fn from(file: DriveFile) -> Self {
        RawFile {
            name: file.name,
            handle: file.id,
            content_type: file.mime_type,
            resource_key: file.resource_key,
        }
    }
}

#[derive(Debug, Deserialize)]
struct FileList {
    #[serde(default)]
    files: Vec<DriveFile>,
}

impl FileList {
    /// At most one page of raw files, in listing order.
    fn into_raw_files(self) -> Vec<RawFile> {
        self.files
            .into_iter()
            .take(PAGE_SIZE)
            .map(RawFile::from)
            .collect()
    }
}

pub struct DriveBackend {
    client: Client,
    api_key: String,
    link: DriveLink,
}

impl DriveBackend {
    pub fn new(client: Client, api_key: String, link: DriveLink) -> Self {
        Self {
            client,
            api_key,
            link,
        }
    }

    fn list_url(&self, folder: &FolderRef) -> Result<Url, ListError> {
        let query = parents_query(folder)?;
        let page_size = PAGE_SIZE.to_string();
        Ok(build_url(
            FILES_URL,
            &[],
            &[
                ("q", query.as_str()),
                ("fields", FIELDS),
                ("pageSize", page_size.as_str()),
                ("key", self.api_key.as_str()),
            ],
        ))
    }
}

impl FileLister for DriveBackend {
    fn list(&self, folder: &FolderRef) -> Result<Vec<RawFile>, ListError> {
        let url = self.list_url(folder)?;
        debug!(folder = %folder, "listing drive folder");
        let list: FileList = send_json(self.client.get(url))?;
        let files = list.into_raw_files();
        info!(folder = %folder, count = files.len(), "drive listing complete");
        Ok(files)
    }
}

impl UrlResolver for DriveBackend {
    fn resolve(&self, file: &RawFile) -> String {
        match self.link {
            DriveLink::Public => public_content_url(file),
            DriveLink::Media => {
                let mut params = vec![("alt", "media"), ("key", self.api_key.as_str())];
                if let Some(resource_key) = file.resource_key.as_deref() {
                    params.push(("resourceKey", resource_key));
                }
                build_url(FILES_URL, &[file.handle.as_str()], &params).into()
            }
        }
    }
}

/// `https://drive.google.com/uc?id=<id>`, the link used when the folder is
/// shared publicly.
pub(crate) fn public_content_url(file: &RawFile) -> String {
    build_url(PUBLIC_CONTENT_URL, &[], &[("id", file.handle.as_str())]).into()
}

/// Build the `q` expression selecting a folder's children.
///
/// Folder ids are interpolated into a quoted string, so quotes and
/// backslashes are refused rather than escaped.
fn parents_query(folder: &FolderRef) -> Result<String, ListError> {
    let id = folder.as_str();
    if id.contains(['\'', '\\']) {
        return Err(ListError::InvalidFolder(format!(
            "'{id}' is not a Drive folder id"
        )));
    }
    Ok(format!("'{id}' in parents and trashed=false"))
}
