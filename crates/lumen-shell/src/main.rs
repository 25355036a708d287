mod commands;
mod daemon;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

use lumen_core::ConfigPaths;

#[derive(Parser)]
#[command(name = "lumen-shell")]
#[command(about = "Lumen desktop shell for Hyprland: panels, desktop and window controls")]
#[command(version)]
struct Cli {
    /// Shell config file (defaults to $XDG_CONFIG_HOME/lumen/shell.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run as daemon (default)
    Daemon,
    /// Show the active window, its state and the desktops
    Status,
    /// Print where every configured panel lands for a screen size
    Geometry {
        /// Available width in pixels (defaults to the focused monitor)
        #[arg(long)]
        width: Option<i32>,
        /// Available height in pixels (defaults to the focused monitor)
        #[arg(long)]
        height: Option<i32>,
    },
    /// Set the desktop background; a running daemon picks it up from the config
    Background {
        /// Image file to use
        path: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("lumen_shell=info".parse()?)
                .add_directive("lumen_core=info".parse()?)
                .add_directive("lumen_components=info".parse()?)
                .add_directive("hyprland=warn".parse()?),
        )
        .init();

    let cli = Cli::parse();
    let paths = match cli.config {
        Some(path) => ConfigPaths::with_shell_config(path),
        None => ConfigPaths::new(),
    };

    match cli.command {
        Some(Command::Daemon) | None => {
            info!("Starting Lumen Shell daemon");
            daemon::run(paths)
        }
        Some(Command::Status) => commands::status(),
        Some(Command::Geometry { width, height }) => commands::geometry(&paths, width, height),
        Some(Command::Background { path }) => commands::background(&paths, &path),
    }
}
