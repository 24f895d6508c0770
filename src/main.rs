use clap::{Args, Parser, Subcommand};
use scene_viewer::config::{self, Config};
use scene_viewer::listing::Backend;
use scene_viewer::load::load_scenes;
use scene_viewer::types::{FolderRef, FolderRefError};
use scene_viewer::viewer::Viewer;
use scene_viewer::{generate, output};
use std::path::PathBuf;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

#[derive(Parser)]
#[command(name = "scene-viewer")]
#[command(about = "Browse rendered scenes and their design variations")]
#[command(long_about = "\
Browse rendered scenes and their design variations

A folder of renders becomes an interactive viewer. Each filename names the
scene it shows and the design version it is, and the viewer groups them into
a scene selector with a version selector per scene.

Naming conventions (set with [naming] grammar or --grammar):

  ordered    order_scene_version.ext   1_living-room_opt-a.png
             leading number orders scenes, dashes become spaces
  two-part   scene-version.ext         living_room-opt_a.png
             scenes sorted by name, underscores become spaces

Supported images: .png .jpg .jpeg .webp. Other files are skipped.

Listing backends (set with [listing] backend or --backend):

  local   a directory on disk, one sub-directory per folder id
  drive   Google Drive files API, key read from GOOGLE_DRIVE_API_KEY
  gcs     public Google Cloud Storage bucket, folder id is an object prefix
  proxy   a backend function that lists a Drive folder on the viewer's behalf

Run 'scene-viewer gen-config' to generate a documented scene-viewer.toml.")]
#[command(version)]
struct Cli {
    /// Config file (missing file means stock defaults)
    #[arg(long, default_value = "scene-viewer.toml", global = true)]
    config: PathBuf,

    /// Override [listing] backend
    #[arg(long, global = true, value_parser = ["local", "drive", "gcs", "proxy"])]
    backend: Option<String>,

    /// Override [naming] grammar
    #[arg(long, global = true, value_parser = ["ordered", "two-part"])]
    grammar: Option<String>,

    /// Log more (-v debug, -vv trace). RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

/// Which folder to open.
#[derive(Args, Clone)]
#[group(multiple = false)]
struct FolderArgs {
    /// Folder id (Drive folder id, bucket prefix, or local sub-directory)
    #[arg(long)]
    folder_id: Option<String>,

    /// Viewer URL carrying a ?folderId= query parameter
    #[arg(long)]
    url: Option<String>,
}

impl FolderArgs {
    /// `Ok(None)` when neither flag is given.
    fn folder(&self) -> Result<Option<FolderRef>, FolderRefError> {
        let folder = match (&self.folder_id, &self.url) {
            (Some(id), _) => Some(FolderRef::new(id)?),
            (None, Some(url)) => Some(FolderRef::from_url(url)?),
            (None, None) => None,
        };
        Ok(folder)
    }
}

#[derive(Subcommand)]
enum Command {
    /// List a folder and print its scene tree
    Scan {
        #[command(flatten)]
        folder: FolderArgs,

        /// Also write the scene tree as JSON
        #[arg(long)]
        manifest: Option<PathBuf>,
    },
    /// Render the viewer page for a folder
    Build {
        #[command(flatten)]
        folder: FolderArgs,

        /// Output directory
        #[arg(long, default_value = "dist")]
        output: PathBuf,
    },
    /// Show how filenames parse under the active naming convention
    Parse {
        #[arg(required = true)]
        names: Vec<String>,
    },
    /// Print a stock scene-viewer.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match &cli.command {
        Command::Scan { folder, manifest } => {
            let config = load_config(&cli)?;
            let folder = folder.folder()?.ok_or(FolderRefError::Missing)?;
            let backend = Backend::from_config(&config.listing)?;
            let report = load_scenes(&backend, &backend, &folder, config.naming.grammar)?;
            output::print_scan_output(&report);
            if let Some(path) = manifest {
                let json = serde_json::to_string_pretty(&report)?;
                std::fs::write(path, json)?;
                info!(path = %path.display(), "manifest written");
            }
        }
        Command::Build { folder, output: out } => {
            let config = load_config(&cli)?;
            // A blank id or a URL without folderId renders the setup page.
            let folder = match folder.folder() {
                Ok(folder) => folder,
                Err(FolderRefError::Missing) => {
                    warn!("no folder id given, rendering setup instructions");
                    None
                }
                Err(e) => return Err(e.into()),
            };
            let mut viewer = Viewer::new();
            if let Some(ticket) = viewer.request(folder) {
                let backend = Backend::from_config(&config.listing)?;
                let result =
                    load_scenes(&backend, &backend, &ticket.folder, config.naming.grammar);
                viewer.complete(&ticket, result);
            }
            let page = generate::write_page(&viewer, &config, out)?;
            output::print_build_output(&viewer, &page);
        }
        Command::Parse { names } => {
            let config = load_config(&cli)?;
            output::print_parse_results(names.as_slice(), config.naming.grammar);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Stock defaults, then the config file, then CLI flags.
fn load_config(cli: &Cli) -> Result<Config, config::ConfigError> {
    let mut overrides = toml::Table::new();
    if let Some(backend) = &cli.backend {
        let mut listing = toml::Table::new();
        listing.insert("backend".into(), toml::Value::String(backend.clone()));
        overrides.insert("listing".into(), toml::Value::Table(listing));
    }
    if let Some(grammar) = &cli.grammar {
        let mut naming = toml::Table::new();
        naming.insert("grammar".into(), toml::Value::String(grammar.clone()));
        overrides.insert("naming".into(), toml::Value::Table(naming));
    }
    let overrides = (!overrides.is_empty()).then_some(toml::Value::Table(overrides));
    let config = config::load_config_with(&cli.config, overrides)?;
    debug!(
        backend = ?config.listing.backend,
        grammar = %config.naming.grammar,
        "config loaded"
    );
    Ok(config)
}

/// Log to stderr so command output on stdout stays clean.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::INFO,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(level.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
