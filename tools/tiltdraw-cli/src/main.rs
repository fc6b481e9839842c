//! TiltDraw CLI — headless host for the tilt sensor pipeline.
//!
//! Usage:
//!   tiltdraw check             Report accelerometer availability and mode
//!   tiltdraw init [--force]    Write a default config file
//!   tiltdraw monitor [OPTIONS] Run the pipeline live and print its state
//!   tiltdraw replay <FILE>     Replay a JSONL sample log deterministically

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tiltdraw_common::config::AppConfig;

mod commands;

#[derive(Parser)]
#[command(
    name = "tiltdraw",
    about = "Tilt-driven brush input: sensor check, live monitor, and log replay",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to $XDG_CONFIG_HOME/tiltdraw/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check for a usable accelerometer
    Check,

    /// Write a default config file (to --config if given)
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Run the sensor pipeline and print smoothed state
    Monitor {
        /// Ignore hardware and simulate tilt from keys
        #[arg(long)]
        mock: bool,

        /// Stop after this many seconds (runs until Ctrl-C otherwise)
        #[arg(long)]
        duration: Option<f64>,

        /// Smoothing factor, clamped to [0.05, 0.5]
        #[arg(long)]
        smoothing: Option<f64>,

        /// Mock directions to hold down, e.g. "right,up"
        #[arg(long, value_delimiter = ',')]
        hold: Vec<String>,

        /// Print state as JSON lines
        #[arg(long)]
        json: bool,
    },

    /// Replay a JSONL sample log through the pipeline
    Replay {
        /// Log with one {"t", "x", "y", "z"} object per line
        path: PathBuf,

        /// Smoothing factor, clamped to [0.05, 0.5]
        #[arg(long)]
        smoothing: Option<f64>,

        /// Print every state as a JSON line
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // init creates the file, so there is nothing to load yet.
    let config = match (&cli.command, &cli.config) {
        (Commands::Init { .. }, _) => AppConfig::default(),
        (_, Some(path)) => AppConfig::load_from(path)?,
        (_, None) => AppConfig::load(),
    };

    let mut logging = config.logging.clone();
    if cli.verbose {
        logging.level = "debug".to_string();
    }
    tiltdraw_common::logging::init_logging(&logging);

    match cli.command {
        Commands::Check => commands::check::run(&config),
        Commands::Init { force } => commands::init::run(cli.config.as_deref(), force).map(|_| ()),
        Commands::Monitor {
            mock,
            duration,
            smoothing,
            hold,
            json,
        } => {
            commands::monitor::run(
                &config,
                commands::monitor::MonitorOptions {
                    mock,
                    duration,
                    smoothing,
                    hold,
                    json,
                },
            )
            .await
        }
        Commands::Replay {
            path,
            smoothing,
            json,
        } => commands::replay::run(path, smoothing, json),
    }
}
