mod input;
mod render;
mod runner;

use std::path::PathBuf;

use anyhow::{Context, Result};
use challenge_core::{load_settings, ChallengeController, Session};
use clap::Parser;
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::mpsc,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::render::OutputMode;

#[derive(Parser, Debug)]
#[command(name = "challenge", about = "Play a challenge gate in the terminal")]
struct Args {
    /// Settings file; defaults to ./challenge.toml or the user config dir.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Built-in variant id.
    #[arg(long)]
    variant: Option<String>,
    /// TOML variant file, takes precedence over --variant.
    #[arg(long)]
    variant_file: Option<PathBuf>,
    /// Seed for memory patterns.
    #[arg(long)]
    seed: Option<u64>,
    /// Print one JSON snapshot per change instead of text.
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let mut settings = load_settings(args.config.as_deref()).context("failed to load settings")?;
    if let Some(variant) = args.variant {
        settings.variant = variant;
        settings.variant_file = None;
    }
    if args.variant_file.is_some() {
        settings.variant_file = args.variant_file;
    }
    if args.seed.is_some() {
        settings.seed = args.seed;
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&settings.log_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let variant = settings
        .resolve_variant()
        .context("failed to resolve variant")?;
    info!(variant = %variant.id, phases = variant.phase_count(), "starting terminal session");
    let controller = ChallengeController::new(variant, settings.timings(), settings.pattern_source())
        .context("invalid variant")?;

    let (tx, rx) = mpsc::channel(16);
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            if tx.send(line).await.is_err() {
                break;
            }
        }
    });

    let mode = if args.json {
        OutputMode::Json
    } else {
        OutputMode::Text
    };
    let mut stdout = std::io::stdout();
    let last = runner::run(Session::new(controller), rx, &mut stdout, mode).await?;
    info!(phase = %last.phase, "session ended");
    Ok(())
}
