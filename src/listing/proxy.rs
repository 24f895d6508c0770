//! Listing through a backend function that keeps the Drive API key
//! server-side.
//!
//! ```text
//! POST <function_url>
//! Authorization: Bearer <token>        (optional)
//! {"folderId": "<folder>"}
//!
//! 200 {"files": [{"id", "name", "mimeType", ...}]}
//! 4xx/5xx {"error": "...", "details": "..."}
//! ```
//!
//! Links use the public Drive content URL since the key never reaches the
//! client.

use super::backend::{FileLister, ListError, PAGE_SIZE, UrlResolver};
use super::drive::{DriveFile, public_content_url};
use crate::types::{FolderRef, RawFile};
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProxyRequest<'a> {
    folder_id: &'a str,
}

#[derive(Debug, Deserialize)]
struct ProxyResponse {
    files: Option<Vec<DriveFile>>,
    error: Option<String>,
    details: Option<String>,
}

pub struct ProxyBackend {
    client: Client,
    function_url: String,
    token: Option<String>,
}

impl ProxyBackend {
    pub fn new(client: Client, function_url: String, token: Option<String>) -> Self {
        Self {
            client,
            function_url,
            token,
        }
    }
}

impl FileLister for ProxyBackend {
    fn list(&self, folder: &FolderRef) -> Result<Vec<RawFile>, ListError> {
        let body = serde_json::to_string(&ProxyRequest {
            folder_id: folder.as_str(),
        })?;
        let mut request = self
            .client
            .post(&self.function_url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .body(body);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        debug!(function = %self.function_url, folder = %folder, "calling listing proxy");
        let response = request.send()?;
        let status = response.status();
        let text = response.text()?;
        let files = decode_response(status.as_u16(), &text)?;
        info!(folder = %folder, count = files.len(), "proxy listing complete");
        Ok(files)
    }
}

impl UrlResolver for ProxyBackend {
    fn resolve(&self, file: &RawFile) -> String {
        public_content_url(file)
    }
}

/// Interpret a proxy reply.
///
/// An `error` field wins over the status code; a success without a `files`
/// array is an error too, so a broken proxy never looks like an empty folder.
fn decode_response(status: u16, body: &str) -> Result<Vec<RawFile>, ListError> {
    let parsed: ProxyResponse = match serde_json::from_str(body) {
        Ok(parsed) => parsed,
        Err(_) if !(200..300).contains(&status) => return Err(ListError::status(status, body)),
        Err(e) => return Err(e.into()),
    };

    if let Some(error) = parsed.error {
        let message = match parsed.details {
            Some(details) => format!("{error}: {details}"),
            None => error,
        };
        return Err(ListError::Backend(message));
    }
    if !(200..300).contains(&status) {
        return Err(ListError::status(status, body));
    }

    let files = parsed
        .files
        .ok_or_else(|| ListError::Backend("no files data received from backend".into()))?;
    Ok(files
        .into_iter()
        .take(PAGE_SIZE)
        .map(RawFile::from)
        .collect())
}
