// SPDX-License-Identifier: GPL-3.0-only

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cli;

use cli::Preset;

#[derive(Parser)]
#[command(name = "camera-session")]
#[command(about = "Drive the camera session engine against a simulated platform")]
#[command(version)]
struct Cli {
    /// Built-in platform and device scenario
    #[arg(short, long, value_enum, default_value_t = Preset::Laptop, global = true)]
    preset: Preset,

    /// JSON scenario file replacing the preset's devices and permission behaviour
    #[arg(short, long, global = true)]
    scenario: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List cameras with their inferred facing and ordering index
    List,

    /// Print a device's capability snapshot as JSON
    Probe {
        /// Device id (default: the configured target or first camera)
        #[arg(short, long)]
        device: Option<String>,
    },

    /// Start a session, capture one image and stop
    Snapshot {
        /// Session configuration file (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output file path (default: ~/Pictures/camera-session/IMG_TIMESTAMP.png)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Encode as JPEG instead of PNG
        #[arg(long)]
        jpeg: bool,

        /// JPEG quality (0.0 - 1.0)
        #[arg(long)]
        quality: Option<f32>,

        /// Output size relative to the negotiated resolution
        #[arg(long, default_value = "1.0")]
        scale: f64,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    // Set RUST_LOG environment variable to control log level
    // Examples: RUST_LOG=debug, RUST_LOG=camera_session=debug, RUST_LOG=info
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(true)
        .with_level(true)
        .init();

    let cli = Cli::parse();
    let env = cli::Environment::load(cli.preset, cli.scenario.as_deref())?;

    match cli.command {
        Commands::List => cli::list_cameras(&env),
        Commands::Probe { device } => cli::probe(&env, device),
        Commands::Snapshot {
            config,
            output,
            jpeg,
            quality,
            scale,
        } => cli::snapshot(&env, config, output, jpeg, quality, scale),
    }
}
