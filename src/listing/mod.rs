//! Remote folder listing and image link resolution.
//!
//! | Backend | Folder reference | Listing | Image link |
//! |---|---|---|---|
//! | `drive` | Drive folder id | files API v3 + API key | public `uc?id=` or media stream |
//! | `gcs` | object prefix | storage JSON API | public bucket URL |
//! | `proxy` | Drive folder id | POST to a backend function | public `uc?id=` |
//! | `local` | sub-directory | `walkdir` | `base_url` prefix or `file://` |
//!
//! The module is split into:
//! - **Backend**: [`FileLister`] / [`UrlResolver`] traits and [`ListError`]
//! - **HTTP**: shared blocking client and JSON request helpers
//! - one file per backend
//!
//! [`Backend`] picks the implementation from configuration, so callers never
//! name a concrete backend.

pub mod backend;
mod drive;
mod gcs;
mod http;
mod local;
mod proxy;

pub use backend::{FileLister, ListError, PAGE_SIZE, UrlResolver};
pub use drive::DriveBackend;
pub use gcs::GcsBackend;
pub use local::LocalBackend;
pub use proxy::ProxyBackend;

use crate::config::{BackendKind, ListingConfig};
use crate::types::{FolderRef, RawFile};
use std::path::Path;

/// The configured listing backend.
pub enum Backend {
    Drive(DriveBackend),
    Gcs(GcsBackend),
    Proxy(ProxyBackend),
    Local(LocalBackend),
}

impl Backend {
    /// Build the backend selected by `[listing] backend`.
    ///
    /// Credentials are read from the environment variables the config names.
    /// A missing Drive key is an error; a missing proxy token just means the
    /// function is called without one.
    pub fn from_config(config: &ListingConfig) -> Result<Self, ListError> {
        Self::from_config_with_env(config, |name| std::env::var(name).ok())
    }

    /// Like [`Backend::from_config`], with an explicit environment lookup.
    pub fn from_config_with_env(
        config: &ListingConfig,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ListError> {
        let backend = match config.backend {
            BackendKind::Drive => {
                let var = config.drive.api_key_env.as_str();
                let api_key = env(var)
                    .filter(|key| !key.trim().is_empty())
                    .ok_or_else(|| ListError::MissingCredential(var.to_string()))?;
                Backend::Drive(DriveBackend::new(
                    http::build_http_client(config.timeout_secs)?,
                    api_key,
                    config.drive.link,
                ))
            }
            BackendKind::Gcs => Backend::Gcs(GcsBackend::new(
                http::build_http_client(config.timeout_secs)?,
                config.gcs.bucket.trim().to_string(),
            )),
            BackendKind::Proxy => Backend::Proxy(ProxyBackend::new(
                http::build_http_client(config.timeout_secs)?,
                config.proxy.function_url.trim().to_string(),
                env(&config.proxy.auth_token_env).filter(|t| !t.trim().is_empty()),
            )),
            BackendKind::Local => {
                let base_url = Some(config.local.base_url.clone());
                Backend::Local(LocalBackend::new(Path::new(&config.local.root), base_url)?)
            }
        };
        Ok(backend)
    }

    pub fn kind(&self) -> BackendKind {
        match self {
            Backend::Drive(_) => BackendKind::Drive,
            Backend::Gcs(_) => BackendKind::Gcs,
            Backend::Proxy(_) => BackendKind::Proxy,
            Backend::Local(_) => BackendKind::Local,
        }
    }
}

impl FileLister for Backend {
    fn list(&self, folder: &FolderRef) -> Result<Vec<RawFile>, ListError> {
        match self {
            Backend::Drive(b) => b.list(folder),
            Backend::Gcs(b) => b.list(folder),
            Backend::Proxy(b) => b.list(folder),
            Backend::Local(b) => b.list(folder),
        }
    }
}

impl UrlResolver for Backend {
    fn resolve(&self, file: &RawFile) -> String {
        match self {
            Backend::Drive(b) => b.resolve(file),
            Backend::Gcs(b) => b.resolve(file),
            Backend::Proxy(b) => b.resolve(file),
            Backend::Local(b) => b.resolve(file),
        }
    }
}
