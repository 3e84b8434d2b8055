mod controller;
mod ui;

use std::path::PathBuf;

use anyhow::{Context, Result};
use challenge_core::{load_settings, ChallengeController, Session};
use clap::Parser;
use eframe::egui;
use tracing_subscriber::EnvFilter;

use crate::ui::ChallengeApp;

#[derive(Parser, Debug)]
#[command(name = "challenge-gui", about = "Play a challenge gate in a desktop window")]
struct Args {
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    variant: Option<String>,
    #[arg(long)]
    variant_file: Option<PathBuf>,
    #[arg(long)]
    seed: Option<u64>,
    /// Image shown above the title; the header simply omits it when missing.
    #[arg(long)]
    logo: Option<PathBuf>,
}

fn main() -> Result<()> {
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
    if let Some(logo) = args.logo {
        settings.logo_path = logo;
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&settings.log_filter)),
        )
        .init();

    let variant = settings
        .resolve_variant()
        .context("failed to resolve variant")?;
    let title = variant.title.clone();
    let controller = ChallengeController::new(variant, settings.timings(), settings.pattern_source())
        .context("invalid variant")?;
    let session = Session::new(controller);
    let logo_path = settings.logo_path.clone();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(title.clone())
            .with_inner_size([720.0, 820.0])
            .with_min_inner_size([480.0, 600.0]),
        ..Default::default()
    };
    eframe::run_native(
        &title,
        options,
        Box::new(move |_cc| Ok(Box::new(ChallengeApp::new(session, logo_path)))),
    )
    .map_err(|err| anyhow::anyhow!("gui exited with error: {err}"))
}
