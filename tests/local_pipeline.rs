//! End-to-end tests over a local render folder: listing, parsing, grouping,
//! viewer state, and page output, through both the library and the binary.
//!
//! Run with: `cargo test --test local_pipeline`

use scene_viewer::config::{self, BackendKind, Config};
use scene_viewer::listing::{Backend, FileLister};
use scene_viewer::load::{LoadError, load_scenes};
use scene_viewer::naming::Grammar;
use scene_viewer::types::FolderRef;
use scene_viewer::viewer::{ViewStatus, Viewer};
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Setup helpers
// ---------------------------------------------------------------------------

const HOUSE: &[&str] = &[
    "2_kitchen_modern.png",
    "1_living-room_opt-b.jpg",
    "1_living-room_opt-a.png",
    "2_kitchen_rustic.webp",
    "3_bath_tile.jpeg",
    "notes.txt",
    "preview.png",
    ".DS_Store",
];

fn render_root(folders: &[(&str, &[&str])]) -> TempDir {
    let tmp = TempDir::new().unwrap();
    for (folder, names) in folders {
        let dir = tmp.path().join(folder);
        fs::create_dir_all(&dir).unwrap();
        for name in *names {
            fs::write(dir.join(name), b"").unwrap();
        }
    }
    tmp
}

fn local_config(root: &Path, base_url: &str) -> Config {
    let mut config = Config::default();
    config.listing.backend = BackendKind::Local;
    config.listing.local.root = root.display().to_string();
    config.listing.local.base_url = base_url.to_string();
    config
}

fn folder(id: &str) -> FolderRef {
    FolderRef::new(id).unwrap()
}

fn bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_scene-viewer"))
}

fn write_config_file(dir: &Path, root: &Path, grammar: &str) -> std::path::PathBuf {
    let path = dir.join("scene-viewer.toml");
    let content = format!(
        "[listing]\nbackend = \"local\"\n\n[listing.local]\nroot = '{}'\nbase_url = \"https://cdn.example/renders\"\n\n[naming]\ngrammar = \"{}\"\n",
        root.display(),
        grammar
    );
    fs::write(&path, content).unwrap();
    path
}

// ---------------------------------------------------------------------------
// Library pipeline
// ---------------------------------------------------------------------------

#[test]
fn local_folder_becomes_ordered_scene_tree() {
    let tmp = render_root(&[("house", HOUSE)]);
    let config = local_config(tmp.path(), "https://cdn.example/renders");
    let backend = Backend::from_config(&config.listing).unwrap();

    let report = load_scenes(&backend, &backend, &folder("house"), Grammar::Ordered).unwrap();

    let scenes: Vec<&str> = report.scenes.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(scenes, vec!["living room", "kitchen", "bath"]);

    let living = report.scenes.get(0).unwrap();
    let versions: Vec<&str> = living.versions.iter().map(|v| v.name.as_str()).collect();
    assert_eq!(versions, vec!["opt a", "opt b"]);
    assert_eq!(
        living.versions[1].image_url,
        "https://cdn.example/renders/house/1_living-room_opt-b.jpg"
    );

    // .DS_Store is hidden, notes.txt is not an image, preview.png is skipped.
    assert_eq!(report.listed, 7);
    assert_eq!(report.images, 6);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].name, "preview.png");
}

#[test]
fn two_part_grammar_over_same_backend() {
    let tmp = render_root(&[(
        "flat",
        &["kitchen-modern.png", "kitchen-rustic.png", "living_room-opt_a.png"],
    )]);
    let config = local_config(tmp.path(), "");
    let backend = Backend::from_config(&config.listing).unwrap();

    let report = load_scenes(&backend, &backend, &folder("flat"), Grammar::TwoPart).unwrap();

    let scenes: Vec<&str> = report.scenes.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(scenes, vec!["kitchen", "living room"]);
    let url = &report.scenes.find("living room", "opt a").unwrap().image_url;
    assert!(url.starts_with("file://"), "{url}");
    assert!(url.ends_with("/flat/living_room-opt_a.png"), "{url}");
}

#[test]
fn folder_without_valid_names_is_empty_not_failed() {
    let tmp = render_root(&[("misc", &["readme.md", "cover.png"])]);
    let config = local_config(tmp.path(), "");
    let backend = Backend::from_config(&config.listing).unwrap();

    let mut viewer = Viewer::new();
    let ticket = viewer.request(Some(folder("misc"))).unwrap();
    let result = load_scenes(&backend, &backend, &ticket.folder, Grammar::Ordered);
    assert!(matches!(result, Err(LoadError::NoScenes { .. })));
    assert!(viewer.complete(&ticket, result));
    assert_eq!(viewer.status(), &ViewStatus::Empty);
}

#[test]
fn missing_folder_is_failed() {
    let tmp = render_root(&[("house", HOUSE)]);
    let config = local_config(tmp.path(), "");
    let backend = Backend::from_config(&config.listing).unwrap();
    assert!(backend.list(&folder("garage")).is_err());

    let mut viewer = Viewer::new();
    let ticket = viewer.request(Some(folder("garage"))).unwrap();
    viewer.complete(
        &ticket,
        load_scenes(&backend, &backend, &ticket.folder, Grammar::Ordered),
    );
    assert!(matches!(viewer.status(), ViewStatus::Failed(_)));
}

#[test]
fn switching_folders_discards_stale_result() {
    let tmp = render_root(&[
        ("house", HOUSE),
        ("office", &["1_lobby_day.png", "1_lobby_night.png"]),
    ]);
    let config = local_config(tmp.path(), "");
    let backend = Backend::from_config(&config.listing).unwrap();

    let mut viewer = Viewer::new();
    let first = viewer.request(Some(folder("house"))).unwrap();
    let second = viewer.request(Some(folder("office"))).unwrap();

    let office = load_scenes(&backend, &backend, &second.folder, Grammar::Ordered);
    assert!(viewer.complete(&second, office));
    let house = load_scenes(&backend, &backend, &first.folder, Grammar::Ordered);
    assert!(!viewer.complete(&first, house));

    assert_eq!(viewer.status(), &ViewStatus::Ready);
    assert_eq!(viewer.current_scene().unwrap().name, "lobby");
    assert_eq!(viewer.scenes().len(), 1);
}

#[test]
fn page_reflects_viewer_selection() {
    let tmp = render_root(&[("house", HOUSE)]);
    let config = local_config(tmp.path(), "https://cdn.example/renders");
    let backend = Backend::from_config(&config.listing).unwrap();

    let mut viewer = Viewer::new();
    let ticket = viewer.request(Some(folder("house"))).unwrap();
    viewer.complete(
        &ticket,
        load_scenes(&backend, &backend, &ticket.folder, Grammar::Ordered),
    );
    viewer.select_scene(1);
    viewer.select_version(1);

    let out = tmp.path().join("dist");
    let page = scene_viewer::generate::write_page(&viewer, &config, &out).unwrap();
    let html = fs::read_to_string(page).unwrap();
    assert!(html.contains("src=\"https://cdn.example/renders/house/2_kitchen_rustic.webp\""));
    assert!(html.contains("<span class=\"caption-scene\">kitchen</span>"));
    assert!(html.contains("<span class=\"caption-version\">rustic</span>"));
}

#[test]
fn stock_config_drives_local_backend() {
    let tmp = render_root(&[("house", HOUSE)]);
    let config_dir = TempDir::new().unwrap();
    let path = write_config_file(config_dir.path(), tmp.path(), "ordered");

    let config = config::load_config(&path).unwrap();
    assert_eq!(config.listing.backend, BackendKind::Local);
    let backend = Backend::from_config(&config.listing).unwrap();
    assert_eq!(backend.kind(), BackendKind::Local);
}

// ---------------------------------------------------------------------------
// Binary
// ---------------------------------------------------------------------------

#[test]
fn cli_scan_prints_tree_and_writes_manifest() {
    let tmp = render_root(&[("house", HOUSE)]);
    let work = TempDir::new().unwrap();
    let config = write_config_file(work.path(), tmp.path(), "ordered");
    let manifest = work.path().join("scenes.json");

    let out = bin()
        .arg("--config")
        .arg(&config)
        .args(["scan", "--folder-id", "house", "--manifest"])
        .arg(&manifest)
        .output()
        .unwrap();
    assert!(
        out.status.success(),
        "{}",
        String::from_utf8_lossy(&out.stderr)
    );

    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("001 living room (2 versions)"), "{stdout}");
    assert!(stdout.contains("preview.png: expected 3 parts"), "{stdout}");

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(manifest).unwrap()).unwrap();
    assert_eq!(json["folder"], "house");
    assert_eq!(json["scenes"][1]["name"], "kitchen");
    assert_eq!(json["scenes"][1]["versions"][0]["id"], "modern");
}

#[test]
fn cli_build_from_viewer_url() {
    let tmp = render_root(&[("house", HOUSE)]);
    let work = TempDir::new().unwrap();
    let config = write_config_file(work.path(), tmp.path(), "ordered");
    let dist = work.path().join("dist");

    let out = bin()
        .arg("--config")
        .arg(&config)
        .args(["build", "--url", "https://viewer.example/?folderId=house", "--output"])
        .arg(&dist)
        .output()
        .unwrap();
    assert!(
        out.status.success(),
        "{}",
        String::from_utf8_lossy(&out.stderr)
    );
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("Ready: 3 scenes, 5 versions"), "{stdout}");

    let html = fs::read_to_string(dist.join("index.html")).unwrap();
    assert!(html.contains("id=\"scene-data\""));
}

#[test]
fn cli_build_without_folder_renders_instructions() {
    let work = TempDir::new().unwrap();
    let dist = work.path().join("dist");
    let out = bin()
        .arg("--config")
        .arg(work.path().join("absent.toml"))
        .args(["--grammar", "two-part", "build", "--output"])
        .arg(&dist)
        .output()
        .unwrap();
    assert!(out.status.success());

    let html = fs::read_to_string(dist.join("index.html")).unwrap();
    assert!(html.contains("No folder ID provided"));
    assert!(html.contains("<code>scene-version.ext</code>"));
}

#[test]
fn cli_build_with_url_missing_folder_id_renders_instructions() {
    let work = TempDir::new().unwrap();
    for args in [
        ["--url", "https://viewer.example/?other=1"],
        ["--folder-id", "   "],
    ] {
        let dist = work.path().join("dist");
        let _ = fs::remove_dir_all(&dist);
        let out = bin()
            .arg("--config")
            .arg(work.path().join("absent.toml"))
            .arg("build")
            .args(args)
            .arg("--output")
            .arg(&dist)
            .output()
            .unwrap();
        assert!(
            out.status.success(),
            "{args:?}: {}",
            String::from_utf8_lossy(&out.stderr)
        );
        let stdout = String::from_utf8_lossy(&out.stdout);
        assert!(stdout.starts_with("No folder ID provided"), "{stdout}");

        let html = fs::read_to_string(dist.join("index.html")).unwrap();
        assert!(html.contains("No folder ID provided"));
        assert!(html.contains("<code>order_scene_version.ext</code>"));
    }
}

#[test]
fn cli_build_with_unparseable_url_fails() {
    let work = TempDir::new().unwrap();
    let out = bin()
        .arg("--config")
        .arg(work.path().join("absent.toml"))
        .args(["build", "--url", "not a url", "--output"])
        .arg(work.path().join("dist"))
        .output()
        .unwrap();
    assert!(!out.status.success());
    assert!(!work.path().join("dist").join("index.html").exists());
}

#[test]
fn cli_parse_uses_grammar_override() {
    let work = TempDir::new().unwrap();
    let out = bin()
        .arg("--config")
        .arg(work.path().join("absent.toml"))
        .args(["--grammar", "two-part", "parse", "kitchen-modern.png", "1_a_b.png"])
        .output()
        .unwrap();
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("kitchen-modern.png → kitchen / modern"), "{stdout}");
    assert!(stdout.contains("1_a_b.png ✗ expected 2 parts"), "{stdout}");
}

#[test]
fn cli_gen_config_is_loadable() {
    let work = TempDir::new().unwrap();
    let out = bin().arg("gen-config").output().unwrap();
    assert!(out.status.success());
    let path = work.path().join("scene-viewer.toml");
    fs::write(&path, &out.stdout).unwrap();
    let config = config::load_config(&path).unwrap();
    assert_eq!(config.naming.grammar, Grammar::Ordered);
}
