use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::{
    catalog::{self, CatalogError, Variant},
    controller::Timings,
    pattern::{PatternSource, RandomPattern},
};

pub const SETTINGS_FILE_NAME: &str = "challenge.toml";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse settings file '{path}': {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub variant: String,
    pub variant_file: Option<PathBuf>,
    pub glitch_ms: u64,
    pub advance_delay_ms: u64,
    pub highlight_ms: u64,
    pub playback_interval_ms: u64,
    pub logo_path: PathBuf,
    pub log_filter: String,
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            variant: "nakaminsky".into(),
            variant_file: None,
            glitch_ms: 500,
            advance_delay_ms: 1000,
            highlight_ms: 400,
            playback_interval_ms: 800,
            logo_path: "logo.png".into(),
            log_filter: "info".into(),
            seed: None,
        }
    }
}

impl Settings {
    pub fn timings(&self) -> Timings {
        Timings {
            glitch: Duration::from_millis(self.glitch_ms),
            advance: Duration::from_millis(self.advance_delay_ms),
            highlight: Duration::from_millis(self.highlight_ms),
            playback_interval: Duration::from_millis(self.playback_interval_ms),
        }
    }

    /// A variant file wins over the built-in id.
    pub fn resolve_variant(&self) -> Result<Variant, CatalogError> {
        match &self.variant_file {
            Some(path) => catalog::load_variant_file(path),
            None => catalog::resolve_builtin(&self.variant),
        }
    }

    pub fn pattern_source(&self) -> Box<dyn PatternSource> {
        match self.seed {
            Some(seed) => Box::new(RandomPattern::seeded(seed)),
            None => Box::new(RandomPattern::from_entropy()),
        }
    }
}

/// `./challenge.toml` when present, else the per-user config directory.
pub fn default_settings_path() -> Option<PathBuf> {
    let local = PathBuf::from(SETTINGS_FILE_NAME);
    if local.exists() {
        return Some(local);
    }
    dirs::config_dir().map(|dir| dir.join("nakaminsky").join(SETTINGS_FILE_NAME))
}

pub fn load_settings(path: Option<&Path>) -> Result<Settings, SettingsError> {
    let path = path.map(Path::to_path_buf).or_else(default_settings_path);
    load_settings_with(path.as_deref(), |key| std::env::var(key).ok())
}

/// Defaults, then the settings file (skipped when missing), then `APP__*` variables.
pub fn load_settings_with(
    path: Option<&Path>,
    env: impl Fn(&str) -> Option<String>,
) -> Result<Settings, SettingsError> {
    let mut settings = match path {
        Some(path) if path.exists() => read_settings_file(path)?,
        _ => Settings::default(),
    };

    if let Some(v) = env("APP__VARIANT") {
        settings.variant = v;
    }
    if let Some(v) = env("APP__VARIANT_FILE") {
        settings.variant_file = Some(PathBuf::from(v));
    }
    if let Some(v) = env("APP__LOGO_PATH") {
        settings.logo_path = PathBuf::from(v);
    }
    if let Some(v) = env("APP__LOG_FILTER") {
        settings.log_filter = v;
    }

    override_u64(&env, "APP__GLITCH_MS", &mut settings.glitch_ms);
    override_u64(&env, "APP__ADVANCE_DELAY_MS", &mut settings.advance_delay_ms);
    override_u64(&env, "APP__HIGHLIGHT_MS", &mut settings.highlight_ms);
    override_u64(
        &env,
        "APP__PLAYBACK_INTERVAL_MS",
        &mut settings.playback_interval_ms,
    );
    if let Some(v) = env("APP__SEED") {
        match v.parse::<u64>() {
            Ok(seed) => settings.seed = Some(seed),
            Err(_) => warn!(key = "APP__SEED", value = %v, "ignoring non-numeric override"),
        }
    }

    Ok(settings)
}

fn read_settings_file(path: &Path) -> Result<Settings, SettingsError> {
    let raw = fs::read_to_string(path).map_err(|source| SettingsError::Io {
        path: path.display().to_string(),
        source,
    })?;
    toml::from_str(&raw).map_err(|source| SettingsError::Parse {
        path: path.display().to_string(),
        source,
    })
}

fn override_u64(env: &impl Fn(&str) -> Option<String>, key: &str, target: &mut u64) {
    if let Some(v) = env(key) {
        match v.parse::<u64>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(key, value = %v, "ignoring non-numeric override"),
        }
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
