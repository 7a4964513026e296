//! Seat Monitor - watch player slot assignment on real gamepads
//!
//! # Commands
//!
//! - `seat-monitor run` - Assign connected gamepads to player slots and log normalized input
//! - `seat-monitor config` - Print the resolved input configuration as TOML
//! - `seat-monitor init` - Write the default configuration file
//!
//! # Usage
//!
//! ```bash
//! # Two players, log every key set and axis change
//! RUST_LOG=debug seat-monitor run --players 2
//!
//! # Keep minimal pads in their slots even when a full pad is waiting
//! seat-monitor run --no-full-preference
//! ```

mod monitor;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use playerseat_core::{InputConfig, config};

/// Seat Monitor - player slot arbitration for local multiplayer
#[derive(Parser)]
#[command(name = "seat-monitor")]
#[command(about = "Watch player slot assignment and normalized gamepad input")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Assign connected gamepads to player slots and log their input
    Run(monitor::RunArgs),

    /// Print the resolved configuration
    Config(ConfigArgs),

    /// Write the default configuration file
    Init(InitArgs),
}

/// Where to read configuration from
#[derive(Args, Clone, Debug, Default)]
pub struct ConfigArgs {
    /// Config file (defaults to the platform config directory)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl ConfigArgs {
    /// Load the explicit file strictly, or the platform file leniently
    pub fn load(&self) -> Result<InputConfig> {
        match &self.config {
            Some(path) => InputConfig::load_from(path)
                .with_context(|| format!("failed to load {}", path.display())),
            None => Ok(config::load()),
        }
    }
}

#[derive(Args)]
struct InitArgs {
    /// Destination (defaults to the platform config directory)
    #[arg(long)]
    path: Option<PathBuf>,

    /// Overwrite an existing file
    #[arg(long)]
    force: bool,
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run(args) => monitor::execute(args),
        Commands::Config(args) => {
            let config = args.load()?;
            print!("{}", toml::to_string_pretty(&config)?);
            Ok(())
        }
        Commands::Init(args) => init(args),
    }
}

fn init(args: InitArgs) -> Result<()> {
    let path = match args.path {
        Some(path) => path,
        None => config::config_path().context("could not determine config directory")?,
    };
    if path.exists() && !args.force {
        anyhow::bail!("{} already exists (use --force to overwrite)", path.display());
    }
    InputConfig::default().save_to(&path)?;
    tracing::info!(path = %path.display(), "Wrote default input config");
    Ok(())
}
