//! Operator CLI for inspecting a route configuration.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use serde_json::Value;

use preset_router::config::loader::load_config;
use preset_router::config::watcher::ConfigWatcher;
use preset_router::config::AppConfig;
use preset_router::menu::build_menu;
use preset_router::observability::logging::init_logging;
use preset_router::render::NavigationState;
use preset_router::routing::path::{locate_module, normalize_url, normalize_value_segments, LocateOptions};
use preset_router::security::{PermissionSet, Session};
use preset_router::{Engine, Error};

#[derive(Parser)]
#[command(name = "preset-router")]
#[command(about = "Resolve routes, presets and permissions of an admin app", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "preset-router.toml")]
    config: PathBuf,

    /// Permission key granted to the session (repeatable)
    #[arg(short, long = "grant")]
    grants: Vec<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the authorized route tree
    Routes,
    /// Print the navigation menu
    Menu,
    /// Print the view a location resolves to
    Resolve {
        location: String,
        /// Navigate without a logged-in user
        #[arg(long)]
        anonymous: bool,
    },
    /// Join url segments
    Normalize {
        segments: Vec<String>,
        /// Treat the single argument as a JSON array of segments
        #[arg(long)]
        json: bool,
    },
    /// Find a page library on disk
    Locate {
        lib: String,
        #[arg(long)]
        site: PathBuf,
        #[arg(long)]
        dev_root: Option<PathBuf>,
        #[arg(long)]
        required: bool,
    },
    /// Reprint the authorized route count whenever the config changes
    Watch,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Routes => {
            let config = setup(&cli.config)?;
            let engine = build_engine(&config, &cli.grants)?;
            print_json(&*engine.authorized_tree())?;
        }
        Commands::Menu => {
            let config = setup(&cli.config)?;
            let engine = build_engine(&config, &cli.grants)?;
            print_json(&build_menu(&engine.authorized_tree(), &config.app.base_route))?;
        }
        Commands::Resolve { location, anonymous } => {
            let config = setup(&cli.config)?;
            let engine = build_engine(&config, &cli.grants)?;
            let session = if anonymous {
                Session::anonymous()
            } else {
                Session::authenticated("cli", PermissionSet::new(cli.grants.iter().cloned()))
            };
            let view = engine.navigate(&NavigationState::new(location), &session).await;
            print_json(&view)?;
        }
        Commands::Normalize { segments, json } => {
            init_logging("info");
            let url = if json {
                let raw = segments.first().map(String::as_str).unwrap_or("[]");
                let values: Vec<Value> = serde_json::from_str(raw)?;
                normalize_value_segments(&values)?
            } else {
                normalize_url(&segments)?
            };
            println!("{}", url);
        }
        Commands::Locate {
            lib,
            site,
            dev_root,
            required,
        } => {
            init_logging("info");
            let options = LocateOptions {
                dev_root,
                ..LocateOptions::default()
            };
            match locate_module(&site, &lib, required, &options)? {
                Some(path) => println!("{}", path.display()),
                None => println!("{} not found", lib),
            }
        }
        Commands::Watch => {
            let config = setup(&cli.config)?;
            watch(&cli.config, config, &cli.grants).await?;
        }
    }

    Ok(())
}

fn setup(path: &Path) -> Result<AppConfig, Error> {
    let config = load_config(path)?;
    init_logging(&config.observability.log_level);
    tracing::info!(path = %path.display(), routes = config.routes.len(), "Configuration loaded");
    Ok(config)
}

fn build_engine(config: &AppConfig, grants: &[String]) -> Result<Engine, Error> {
    let engine = Engine::new(config)?;
    engine.set_permissions(PermissionSet::new(grants.iter().cloned()))?;
    Ok(engine)
}

async fn watch(path: &Path, config: AppConfig, grants: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    let engine = build_engine(&config, grants)?;
    println!("{} authorized routes", engine.authorized_tree().len());

    let (watcher, mut updates) = ConfigWatcher::new(path);
    let _handle = watcher.run()?;

    loop {
        tokio::select! {
            update = updates.recv() => {
                let Some(config) = update else { break };
                match build_engine(&config, grants) {
                    Ok(engine) => println!("{} authorized routes", engine.authorized_tree().len()),
                    Err(e) => tracing::error!(error = %e, "Reloaded config rejected"),
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Stopping watcher");
                break;
            }
        }
    }
    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
