//! Object-storage listing through the public JSON API.
//!
//! The folder reference is an object prefix inside the configured bucket.
//! Objects are listed with `prefix=<folder>/` and served from the public
//! media host:
//!
//! ```text
//! list:    GET https://storage.googleapis.com/storage/v1/b/<bucket>/o?prefix=<folder>/&maxResults=1000
//! resolve: https://storage.googleapis.com/<bucket>/<folder>/<file>
//! ```

use super::backend::{FileLister, ListError, PAGE_SIZE, UrlResolver};
use super::http::{build_url, send_json};
use crate::types::{FolderRef, RawFile};
use reqwest::Url;
use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::{debug, info};

const API_BASE: &str = "https://storage.googleapis.com/storage/v1/b/";
const MEDIA_BASE: &str = "https://storage.googleapis.com/";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StorageObject {
    name: String,
    #[serde(default)]
    content_type: String,
}

#[derive(Debug, Deserialize)]
struct ObjectList {
    #[serde(default)]
    items: Vec<StorageObject>,
}

pub struct GcsBackend {
    client: Client,
    bucket: String,
}

impl GcsBackend {
    pub fn new(client: Client, bucket: String) -> Self {
        Self { client, bucket }
    }

    fn list_url(&self, folder: &FolderRef) -> Url {
        let prefix = object_prefix(folder);
        let max_results = PAGE_SIZE.to_string();
        build_url(
            API_BASE,
            &[self.bucket.as_str(), "o"],
            &[("prefix", prefix.as_str()), ("maxResults", max_results.as_str())],
        )
    }
}

impl FileLister for GcsBackend {
    fn list(&self, folder: &FolderRef) -> Result<Vec<RawFile>, ListError> {
        let url = self.list_url(folder);
        debug!(%url, "listing storage prefix");
        let list: ObjectList = send_json(self.client.get(url))?;
        let files = into_raw_files(list);
        info!(bucket = %self.bucket, folder = %folder, count = files.len(), "storage listing complete");
        Ok(files)
    }
}

impl UrlResolver for GcsBackend {
    fn resolve(&self, file: &RawFile) -> String {
        let mut segments = vec![self.bucket.as_str()];
        segments.extend(file.handle.split('/'));
        build_url(MEDIA_BASE, &segments, &[]).into()
    }
}

/// `renders/house` and `/renders/house/` both list `renders/house/`.
fn object_prefix(folder: &FolderRef) -> String {
    let trimmed = folder.as_str().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("{trimmed}/")
    }
}

/// Drop folder placeholders and keep only the last path segment as name.
fn into_raw_files(list: ObjectList) -> Vec<RawFile> {
    list.items
        .into_iter()
        .filter(|object| !object.name.ends_with('/'))
        .take(PAGE_SIZE)
        .map(|object| {
            let name = object
                .name
                .rsplit('/')
                .next()
                .unwrap_or(&object.name)
                .to_string();
            RawFile {
                name,
                handle: object.name,
                content_type: object.content_type,
                resource_key: None,
            }
        })
        .collect()
}
