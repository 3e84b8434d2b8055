use std::path::PathBuf;

use anyhow::{Context, Result};
use challenge_core::{catalog, load_settings, ChallengeKind, Variant};
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "challenge-tools", about = "Inspect and check challenge variants")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List built-in variants.
    List,
    /// Print a built-in variant, e.g. as a starting point for a variant file.
    Show {
        id: String,
        #[arg(long, value_enum, default_value_t = Format::Toml)]
        format: Format,
    },
    /// Parse and validate a variant file.
    Validate { path: PathBuf },
    /// Print the effective settings after file and environment overrides.
    Settings {
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Toml,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::List => {
            for id in catalog::builtin_ids() {
                let variant = catalog::resolve_builtin(id)?;
                println!("{}", summary(&variant));
            }
        }
        Command::Show { id, format } => {
            let variant = catalog::resolve_builtin(&id)?;
            let rendered = match format {
                Format::Toml => toml::to_string_pretty(&variant)?,
                Format::Json => serde_json::to_string_pretty(&variant)?,
            };
            println!("{rendered}");
        }
        Command::Validate { path } => {
            let variant = catalog::load_variant_file(&path)
                .with_context(|| format!("{} is not a valid variant", path.display()))?;
            println!("ok {}", summary(&variant));
        }
        Command::Settings { config } => {
            let settings = load_settings(config.as_deref())?;
            print!("{}", toml::to_string_pretty(&settings)?);
        }
    }

    Ok(())
}

fn summary(variant: &Variant) -> String {
    let kinds: Vec<&str> = variant
        .phases
        .iter()
        .map(|phase| match phase.challenge {
            ChallengeKind::Text(_) => "text",
            ChallengeKind::Choice(_) => "choice",
            ChallengeKind::Memory(_) => "memory",
        })
        .collect();
    format!(
        "{}\t{}\t{} phases [{}]",
        variant.id,
        variant.title,
        variant.phase_count(),
        kinds.join(", ")
    )
}
