//! Filename parsing for scene/version images.
//!
//! Every image in a listed folder encodes which scene it belongs to and which
//! version of that scene it shows. Two naming grammars exist and they are
//! mutually incompatible, so exactly one is active at a time, chosen in
//! `[naming] grammar` of the config file:
//!
//! | Grammar | Pattern | Example | Result |
//! |---------|---------|---------|--------|
//! | `ordered` (default) | `order_scene_version.ext` | `1_living-room_opt-a.png` | order 1, "living room", "opt a" |
//! | `two-part` | `scene-version.ext` | `kitchen-modern.jpg` | "kitchen", "modern" |
//!
//! ## Display Names
//!
//! The character that is *not* the separator doubles as a word separator
//! inside a token and is converted to a space for display:
//! - ordered: dashes become spaces (`master-bedroom` → "master bedroom")
//! - two-part: underscores become spaces (`master_bedroom` → "master bedroom")
//!
//! Names that don't fit the active grammar are rejected with a [`NameError`].
//! Rejection is never fatal: the loader logs the file and moves on.

use crate::types::ParsedEntry;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Extensions stripped from the end of a filename before splitting.
const STRIPPED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp"];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NameError {
    #[error("expected {expected} parts separated by '{separator}', found {found}")]
    WrongPartCount {
        expected: usize,
        found: usize,
        separator: char,
    },
    #[error("order prefix '{0}' is not a number")]
    InvalidOrder(String),
    #[error("scene and version names must not be empty")]
    EmptyToken,
}

/// The naming convention used to split filenames into scene and version.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Grammar {
    /// `order_scene_version.ext`, dashes inside tokens become spaces.
    #[default]
    Ordered,
    /// `scene-version.ext`, underscores inside tokens become spaces.
    TwoPart,
}

impl Grammar {
    /// Human-readable pattern, shown in setup instructions.
    pub fn convention(self) -> &'static str {
        match self {
            Grammar::Ordered => "order_scene_version.ext",
            Grammar::TwoPart => "scene-version.ext",
        }
    }

    /// A filename that parses under this grammar.
    pub fn example(self) -> &'static str {
        match self {
            Grammar::Ordered => "1_living-room_opt-a.png",
            Grammar::TwoPart => "living_room-opt_a.png",
        }
    }

    fn separator(self) -> char {
        match self {
            Grammar::Ordered => '_',
            Grammar::TwoPart => '-',
        }
    }

    fn word_separator(self) -> char {
        match self {
            Grammar::Ordered => '-',
            Grammar::TwoPart => '_',
        }
    }
}

impl fmt::Display for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Grammar::Ordered => f.write_str("ordered"),
            Grammar::TwoPart => f.write_str("two-part"),
        }
    }
}

/// Remove a trailing image extension (`.png`, `.jpg`, `.jpeg`, `.webp`),
/// case-insensitively. Other suffixes are left untouched.
pub fn strip_image_extension(name: &str) -> &str {
    if let Some((stem, ext)) = name.rsplit_once('.')
        && STRIPPED_EXTENSIONS
            .iter()
            .any(|known| ext.eq_ignore_ascii_case(known))
    {
        return stem;
    }
    name
}

/// Parse a filename into its scene, version and (for the ordered grammar)
/// sort order.
///
/// The returned entry has an empty `image_url`; the loader fills it in once
/// the backend has resolved a link for the file.
///
/// - `"1_living-room_opt-a.png"` (ordered) → order=Some(1), scene="living room", version="opt a"
/// - `"kitchen-modern.jpg"` (two-part) → order=None, scene="kitchen", version="modern"
/// - `"a-b-c.jpg"` (two-part) → `Err(WrongPartCount)`
/// - `"x_kitchen_modern.jpg"` (ordered) → `Err(InvalidOrder)`
pub fn parse_file_name(file_name: &str, grammar: Grammar) -> Result<ParsedEntry, NameError> {
    let stem = strip_image_extension(file_name);
    let parts: Vec<&str> = stem.split(grammar.separator()).collect();

    let (order, scene_token, version_token) = match (grammar, parts.as_slice()) {
        (Grammar::Ordered, [order, scene, version]) => {
            let order = order
                .parse::<i64>()
                .map_err(|_| NameError::InvalidOrder(order.to_string()))?;
            (Some(order), *scene, *version)
        }
        (Grammar::TwoPart, [scene, version]) => (None, *scene, *version),
        _ => {
            return Err(NameError::WrongPartCount {
                expected: match grammar {
                    Grammar::Ordered => 3,
                    Grammar::TwoPart => 2,
                },
                found: parts.len(),
                separator: grammar.separator(),
            });
        }
    };

    let scene_name = display_name(scene_token, grammar);
    let version_name = display_name(version_token, grammar);
    if scene_name.trim().is_empty() || version_name.trim().is_empty() {
        return Err(NameError::EmptyToken);
    }

    Ok(ParsedEntry {
        scene_name,
        version_name,
        source_file_name: file_name.to_string(),
        image_url: String::new(),
        order,
    })
}

fn display_name(token: &str, grammar: Grammar) -> String {
    token.replace(grammar.word_separator(), " ")
}

/// Derive a URL/DOM-safe identifier: lowercase, every run of whitespace
/// collapsed into a single `-`.
///
/// - `"Living Room"` → `"living-room"`
/// - `"Opt  A"` → `"opt-a"`
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut in_space = false;
    for c in name.chars() {
        if c.is_whitespace() {
            if !in_space {
                slug.push('-');
            }
            in_space = true;
        } else {
            slug.extend(c.to_lowercase());
            in_space = false;
        }
    }
    slug
}
