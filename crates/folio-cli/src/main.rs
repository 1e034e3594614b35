use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use folio_core::AppConfig;

mod commands;

#[derive(Parser)]
#[command(name = "folio")]
#[command(author, version, about = "Portfolio site server and scroll-layer tooling")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Use this config file instead of ~/.config/folio/config.toml
    #[arg(short = 'c', long = "config", global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the built site with single-page fallback
    Serve {
        /// Directory holding the built site
        #[arg(short = 'd', long)]
        dir: Option<PathBuf>,
        /// Listen port (overrides PORT and config)
        #[arg(short = 'p', long)]
        port: Option<u16>,
    },
    /// Play a JSON scroll script through the scroll layer and print chrome state
    Replay {
        /// Script file
        script: PathBuf,
        /// Skip the smooth-scroll engine and use native scrolling
        #[arg(long)]
        native: bool,
    },
    /// Print the effective configuration
    Config {
        /// Also write it to the default config path
        #[arg(long)]
        save: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load()?,
    };

    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| config.general.log_level.clone()),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    match cli.command {
        Some(Commands::Serve { dir, port }) => commands::serve::run(&config, dir, port).await,
        None => commands::serve::run(&config, None, None).await,
        Some(Commands::Replay { script, native }) => commands::replay::run(&config, &script, native),
        Some(Commands::Config { save }) => commands::config::run(&config, save),
    }
}
