//! Viewer configuration.
//!
//! Handles loading, validating, and merging `scene-viewer.toml`. Values are
//! layered: stock defaults, then the config file, then command-line
//! overrides (`--backend`, `--grammar`). Each layer only needs the keys it
//! changes.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [listing]
//! backend = "local"          # drive | gcs | proxy | local
//! timeout_secs = 30          # HTTP request timeout
//!
//! [listing.drive]
//! api_key_env = "GOOGLE_DRIVE_API_KEY"  # env var holding the API key
//! link = "public"            # public | media
//!
//! [listing.gcs]
//! bucket = ""                # required when backend = "gcs"
//!
//! [listing.proxy]
//! function_url = ""          # required when backend = "proxy"
//! auth_token_env = "SCENE_VIEWER_PROXY_TOKEN"
//!
//! [listing.local]
//! root = "."                 # folder references are relative to this
//! base_url = ""              # prefix for image links (empty = file:// URLs)
//!
//! [naming]
//! grammar = "ordered"        # ordered | two-part
//!
//! [viewer]
//! title = "Interactive Scene Viewer"
//! subtitle = "Explore different rooms and design variations"
//! scene_label = "Scene"
//! version_label = "Version"
//!
//! [colors.light]
//! background = "#f8fafc"
//! surface = "#ffffff"
//! text = "#1e293b"
//! text_muted = "#64748b"
//! border = "#e2e8f0"
//! accent = "#2563eb"          # selected scene
//! accent_alt = "#059669"      # selected version
//!
//! [colors.dark]
//! background = "#0f172a"
//! surface = "#1e293b"
//! text = "#f1f5f9"
//! text_muted = "#94a3b8"
//! border = "#334155"
//! accent = "#3b82f6"
//! accent_alt = "#10b981"
//! ```
//!
//! Credentials never live in the file: only the *names* of the environment
//! variables holding them do.
//!
//! Unknown keys are rejected to catch typos early.

use crate::naming::Grammar;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Viewer configuration loaded from `scene-viewer.toml`.
///
/// All fields have defaults; a config file only overrides what it names.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Where file listings come from.
    pub listing: ListingConfig,
    /// Which filename grammar is active.
    pub naming: NamingConfig,
    /// Page text.
    pub viewer: ViewerConfig,
    /// Color schemes for light and dark modes.
    pub colors: ColorConfig,
}

impl Config {
    /// Validate that the selected backend has what it needs.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let listing = &self.listing;
        if listing.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "listing.timeout_secs must be greater than 0".into(),
            ));
        }
        match listing.backend {
            BackendKind::Drive => {
                if listing.drive.api_key_env.trim().is_empty() {
                    return Err(ConfigError::Validation(
                        "listing.drive.api_key_env must name an environment variable".into(),
                    ));
                }
            }
            BackendKind::Gcs => {
                if listing.gcs.bucket.trim().is_empty() {
                    return Err(ConfigError::Validation(
                        "listing.gcs.bucket is required for the gcs backend".into(),
                    ));
                }
            }
            BackendKind::Proxy => {
                let url = listing.proxy.function_url.trim();
                if !(url.starts_with("https://") || url.starts_with("http://")) {
                    return Err(ConfigError::Validation(
                        "listing.proxy.function_url must be an http(s) URL".into(),
                    ));
                }
            }
            BackendKind::Local => {
                if listing.local.root.trim().is_empty() {
                    return Err(ConfigError::Validation(
                        "listing.local.root must not be empty".into(),
                    ));
                }
            }
        }
        Ok(())
    }
}

/// Listing backends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Drive files API with an API key.
    Drive,
    /// Object-storage JSON listing of a public bucket.
    Gcs,
    /// Backend function that holds the Drive key.
    Proxy,
    /// Directory on disk.
    #[default]
    Local,
}

/// How Drive files are turned into image links.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DriveLink {
    /// `drive.google.com/uc?id=...`, needs a publicly shared folder.
    #[default]
    Public,
    /// Files API media stream with API key (and resource key when present).
    Media,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ListingConfig {
    pub backend: BackendKind,
    /// Request timeout for remote backends, in seconds.
    pub timeout_secs: u64,
    pub drive: DriveConfig,
    pub gcs: GcsConfig,
    pub proxy: ProxyConfig,
    pub local: LocalConfig,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::default(),
            timeout_secs: 30,
            drive: DriveConfig::default(),
            gcs: GcsConfig::default(),
            proxy: ProxyConfig::default(),
            local: LocalConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DriveConfig {
    /// Environment variable holding the API key.
    pub api_key_env: String,
    pub link: DriveLink,
}

impl Default for DriveConfig {
    fn default() -> Self {
        Self {
            api_key_env: "GOOGLE_DRIVE_API_KEY".to_string(),
            link: DriveLink::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GcsConfig {
    pub bucket: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProxyConfig {
    pub function_url: String,
    /// Environment variable holding an optional bearer token.
    pub auth_token_env: String,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            function_url: String::new(),
            auth_token_env: "SCENE_VIEWER_PROXY_TOKEN".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LocalConfig {
    pub root: String,
    /// Prefix for image links; empty means `file://` URLs.
    pub base_url: String,
}

impl Default for LocalConfig {
    fn default() -> Self {
        Self {
            root: ".".to_string(),
            base_url: String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NamingConfig {
    pub grammar: Grammar,
}

/// Text shown on the generated page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewerConfig {
    pub title: String,
    pub subtitle: String,
    pub scene_label: String,
    pub version_label: String,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            title: "Interactive Scene Viewer".to_string(),
            subtitle: "Explore different rooms and design variations".to_string(),
            scene_label: "Scene".to_string(),
            version_label: "Version".to_string(),
        }
    }
}

/// Color configuration for light and dark modes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    /// Light mode color scheme.
    pub light: ColorScheme,
    /// Dark mode color scheme.
    pub dark: ColorScheme,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            light: ColorScheme::default_light(),
            dark: ColorScheme::default_dark(),
        }
    }
}

/// Individual color scheme (light or dark).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorScheme {
    /// Page background.
    pub background: String,
    /// Card and unselected button background.
    pub surface: String,
    /// Primary text color.
    pub text: String,
    /// Labels and captions.
    pub text_muted: String,
    /// Border color.
    pub border: String,
    /// Selected scene button.
    pub accent: String,
    /// Selected version button.
    pub accent_alt: String,
}

impl ColorScheme {
    pub fn default_light() -> Self {
        Self {
            background: "#f8fafc".to_string(),
            surface: "#ffffff".to_string(),
            text: "#1e293b".to_string(),
            text_muted: "#64748b".to_string(),
            border: "#e2e8f0".to_string(),
            accent: "#2563eb".to_string(),
            accent_alt: "#059669".to_string(),
        }
    }

    pub fn default_dark() -> Self {
        Self {
            background: "#0f172a".to_string(),
            surface: "#1e293b".to_string(),
            text: "#f1f5f9".to_string(),
            text_muted: "#94a3b8".to_string(),
            border: "#334155".to_string(),
            accent: "#3b82f6".to_string(),
            accent_alt: "#10b981".to_string(),
        }
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::default_light()
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer that the config file and CLI overrides are merged
/// on top of.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(Config::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file doesn't exist.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge overlays in order onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlays: impl IntoIterator<Item = toml::Value>,
) -> Result<Config, ConfigError> {
    let merged = overlays.into_iter().fold(base, merge_toml);
    let config: Config = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from a file, falling back to defaults when it is absent.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    load_config_with(path, None)
}

/// Load config from a file with an extra override layer on top (CLI flags).
pub fn load_config_with(
    path: &Path,
    overrides: Option<toml::Value>,
) -> Result<Config, ConfigError> {
    let file_layer = load_raw_config(path)?;
    resolve_config(stock_defaults_value(), file_layer.into_iter().chain(overrides))
}

/// Returns a fully-commented stock `scene-viewer.toml` with all keys and
/// explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Scene Viewer Configuration
# ==========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Listing backend
# ---------------------------------------------------------------------------
[listing]
# Where the folder is listed from: drive | gcs | proxy | local
backend = "local"

# Timeout for remote listing requests, in seconds.
timeout_secs = 30

# Drive files API. The folder reference is a Drive folder id.
[listing.drive]
# Name of the environment variable holding the API key (never the key itself).
api_key_env = "GOOGLE_DRIVE_API_KEY"
# public: drive.google.com/uc?id=... links (folder must be shared publicly)
# media:  files API media links carrying the API key
link = "public"

# Public object-storage bucket. The folder reference is an object prefix.
[listing.gcs]
bucket = ""

# Backend function that lists a Drive folder server-side.
# It receives {"folderId": "..."} and answers {"files": [...]}.
[listing.proxy]
function_url = ""
# Environment variable with an optional bearer token for the function.
auth_token_env = "SCENE_VIEWER_PROXY_TOKEN"

# Directory on disk. The folder reference is a sub-directory of root.
[listing.local]
root = "."
# Prefix for image links in the generated page. Empty = file:// URLs.
base_url = ""

# ---------------------------------------------------------------------------
# Filename convention
# ---------------------------------------------------------------------------
[naming]
# ordered:  order_scene_version.ext  e.g. 1_living-room_opt-a.png
#           (dashes inside names become spaces)
# two-part: scene-version.ext        e.g. living_room-opt_a.png
#           (underscores inside names become spaces)
# Files that don't match are skipped and reported.
grammar = "ordered"

# ---------------------------------------------------------------------------
# Page text
# ---------------------------------------------------------------------------
[viewer]
title = "Interactive Scene Viewer"
subtitle = "Explore different rooms and design variations"
scene_label = "Scene"
version_label = "Version"

# ---------------------------------------------------------------------------
# Colors - Light mode (prefers-color-scheme: light)
# ---------------------------------------------------------------------------
[colors.light]
background = "#f8fafc"
surface = "#ffffff"
text = "#1e293b"
text_muted = "#64748b"   # Labels, captions
border = "#e2e8f0"
accent = "#2563eb"       # Selected scene
accent_alt = "#059669"   # Selected version

# ---------------------------------------------------------------------------
# Colors - Dark mode (prefers-color-scheme: dark)
# ---------------------------------------------------------------------------
[colors.dark]
background = "#0f172a"
surface = "#1e293b"
text = "#f1f5f9"
text_muted = "#94a3b8"
border = "#334155"
accent = "#3b82f6"
accent_alt = "#10b981"
"##
}

/// Generate CSS custom properties from color config.
pub fn generate_color_css(colors: &ColorConfig) -> String {
    format!(
        r#":root {{
{light}
}}

@media (prefers-color-scheme: dark) {{
    :root {{
{dark}
    }}
}}"#,
        light = color_variables(&colors.light, 1),
        dark = color_variables(&colors.dark, 2),
    )
}

fn color_variables(scheme: &ColorScheme, depth: usize) -> String {
    let indent = "    ".repeat(depth);
    [
        ("--color-bg", &scheme.background),
        ("--color-surface", &scheme.surface),
        ("--color-text", &scheme.text),
        ("--color-text-muted", &scheme.text_muted),
        ("--color-border", &scheme.border),
        ("--color-accent", &scheme.accent),
        ("--color-accent-alt", &scheme.accent_alt),
    ]
    .iter()
    .map(|(name, value)| format!("{indent}{name}: {value};"))
    .collect::<Vec<_>>()
    .join("\n")
}
