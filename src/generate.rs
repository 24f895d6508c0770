//! HTML viewer generation.
//!
//! Renders the [`Viewer`] state into one self-contained page: a row of scene
//! buttons, the image viewport, a row of version buttons, and a caption. The
//! initial selection is rendered server-side, so the page shows the first
//! image even before the script runs; the script then takes over selection.
//!
//! ## Output
//!
//! ```text
//! dist/
//! └── index.html     # styles, scene data and script inlined
//! ```
//!
//! ## Non-ready States
//!
//! Missing folder, failed listing and empty folder all render a message panel
//! with setup instructions for the configured naming convention instead of
//! the selector.
//!
//! ## Embedded Assets
//!
//! - `static/style.css`: layout and component styles (colors injected from config)
//! - `static/viewer.js`: selection logic, mirroring [`Viewer`]
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating.

use crate::config::{self, Config, ViewerConfig};
use crate::naming::Grammar;
use crate::scene::{SceneEntry, SceneTree};
use crate::viewer::{ViewStatus, Viewer};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

const CSS_STATIC: &str = include_str!("../static/style.css");
const JS: &str = include_str!("../static/viewer.js");

/// Write `index.html` for the viewer into `output_dir`.
pub fn write_page(
    viewer: &Viewer,
    config: &Config,
    output_dir: &Path,
) -> Result<PathBuf, GenerateError> {
    fs::create_dir_all(output_dir)?;
    let page = render_page(viewer, config)?;
    let path = output_dir.join("index.html");
    fs::write(&path, page.into_string())?;
    Ok(path)
}

/// Render the complete viewer document.
pub fn render_page(viewer: &Viewer, config: &Config) -> Result<Markup, GenerateError> {
    let css = format!(
        "{}\n{}",
        config::generate_color_css(&config.colors),
        CSS_STATIC
    );

    let body = match viewer.status() {
        ViewStatus::Ready => render_selector(viewer, &config.viewer)?,
        ViewStatus::Loading => render_message(viewer, None),
        ViewStatus::NoFolder | ViewStatus::Empty | ViewStatus::Failed(_) => {
            render_message(viewer, Some(config.naming.grammar))
        }
    };

    let content = html! {
        main.viewer-page {
            header.viewer-header {
                h1 { (config.viewer.title) }
                @if !config.viewer.subtitle.is_empty() {
                    p.viewer-subtitle { (config.viewer.subtitle) }
                }
            }
            section.viewer-card {
                (body)
            }
        }
    };

    Ok(base_document(&config.viewer.title, &css, content))
}

// ============================================================================
// HTML Components
// ============================================================================

/// Renders the base HTML document structure
fn base_document(title: &str, css: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                style { (PreEscaped(css)) }
            }
            body {
                (content)
            }
        }
    }
}

/// Scene buttons, image viewport, version buttons, caption, and the data
/// the script needs.
fn render_selector(viewer: &Viewer, text: &ViewerConfig) -> Result<Markup, GenerateError> {
    let scene_data = scene_data_json(viewer.scenes())?;
    let scene = viewer.current_scene();
    let version = viewer.current_version();
    let loading = viewer.is_image_loading();

    Ok(html! {
        div.selector-row {
            span.selector-label { (text.scene_label) ":" }
            div.button-row #scene-buttons {
                @for (index, entry) in viewer.scenes().iter().enumerate() {
                    (selector_button("scene-button", index, &entry.name, &entry.id, index == viewer.scene_index()))
                }
            }
        }
        div.viewport {
            div.spinner-overlay #image-spinner hidden[!loading] {
                div.spinner {}
            }
            @if let (Some(scene), Some(version)) = (scene, version) {
                img #scene-image
                    class=[loading.then_some("loading")]
                    src=(version.image_url)
                    alt={ (scene.name) " - " (version.name) };
            }
        }
        div.selector-row {
            span.selector-label { (text.version_label) ":" }
            div.button-row #version-buttons {
                @if let Some(scene) = scene {
                    (version_buttons(scene, viewer.version_index()))
                }
            }
        }
        @if let (Some(scene), Some(version)) = (scene, version) {
            p.caption #caption {
                "Currently viewing: "
                span.caption-scene { (scene.name) }
                " • "
                span.caption-version { (version.name) }
            }
        }
        script type="application/json" #scene-data { (PreEscaped(scene_data)) }
        script { (PreEscaped(JS)) }
    })
}

fn version_buttons(scene: &SceneEntry, selected: usize) -> Markup {
    html! {
        @for (index, version) in scene.versions.iter().enumerate() {
            (selector_button("version-button", index, &version.name, &version.id, index == selected))
        }
    }
}

fn selector_button(class: &str, index: usize, label: &str, id: &str, selected: bool) -> Markup {
    html! {
        button
            class={ (class) @if selected { " selected" } }
            type="button"
            data-index=(index)
            data-id=(id)
            aria-pressed=(if selected { "true" } else { "false" }) {
            (label)
        }
    }
}

/// Message panel for loading, missing folder, empty and failed states.
///
/// Setup instructions are shown when a grammar is given.
fn render_message(viewer: &Viewer, grammar: Option<Grammar>) -> Markup {
    let failed = matches!(viewer.status(), ViewStatus::Failed(_));
    html! {
        div.message-panel .error[failed] role="status" {
            @if let Some(message) = viewer.message() {
                p.message { (message) }
            }
            @if let Some(grammar) = grammar {
                (setup_instructions(grammar))
            }
        }
    }
}

fn setup_instructions(grammar: Grammar) -> Markup {
    html! {
        div.setup {
            h2 { "Setup" }
            ol {
                li {
                    "Name each image "
                    code { (grammar.convention()) }
                    ", for example "
                    code { (grammar.example()) }
                    "."
                }
                li {
                    @match grammar {
                        Grammar::Ordered => {
                            "The leading number orders the scenes. Dashes inside names become spaces."
                        }
                        Grammar::TwoPart => {
                            "Scenes are listed alphabetically. Underscores inside names become spaces."
                        }
                    }
                }
                li {
                    "Put all images in one folder and open the viewer with "
                    code { "?folderId=YOUR_FOLDER_ID" }
                    "."
                }
                li { "Supported formats: PNG, JPG, JPEG, WEBP. Other files are skipped." }
            }
        }
    }
}

/// Scene tree as JSON safe for inlining in a `<script>` element.
///
/// `<` only occurs inside JSON strings, where `\u003c` is an equivalent
/// escape, so no `</script>` can end the element early.
fn scene_data_json(scenes: &SceneTree) -> Result<String, GenerateError> {
    Ok(serde_json::to_string(scenes)?.replace('<', "\\u003c"))
}
