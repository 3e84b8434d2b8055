//! Challenge content: the phase list, narration copy and offer configuration of a variant.
//!
//! Every variant runs on the same controller; only the data in here differs.
//! Variants can be built in ([`builtin`]) or loaded from TOML files.

use std::{collections::HashSet, fs, path::Path};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    answer::{self, Normalization},
    log::LOG_CAPACITY,
};

mod builtin;

pub use builtin::{builtin, builtin_ids};

/// Upper bound on memory board size so node indices stay small and renderable.
pub const MAX_MEMORY_NODES: u8 = 16;
pub const MAX_PATTERN_LENGTH: usize = 32;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("unknown variant `{id}` (available: {available})")]
    UnknownVariant { id: String, available: String },
    #[error("variant `{variant}` has no phases")]
    EmptyPhases { variant: String },
    #[error("variant `{variant}` phase {phase} accepts no answers")]
    NoAcceptedAnswers { variant: String, phase: usize },
    #[error("variant `{variant}` phase {phase} has no correct choice")]
    NoCorrectChoice { variant: String, phase: usize },
    #[error("variant `{variant}` phase {phase} repeats choice id `{choice_id}`")]
    DuplicateChoice {
        variant: String,
        phase: usize,
        choice_id: String,
    },
    #[error("variant `{variant}` phase {phase} has an invalid memory board: {reason}")]
    InvalidMemoryBoard {
        variant: String,
        phase: usize,
        reason: String,
    },
    #[error("variant `{variant}` boot log has {len} lines but the log holds {capacity}")]
    BootLogTooLong {
        variant: String,
        len: usize,
        capacity: usize,
    },
    #[error("variant `{variant}` link `{link}` is not a valid URL: {source}")]
    InvalidLink {
        variant: String,
        link: String,
        source: url::ParseError,
    },
    #[error("failed to read variant file '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse variant: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variant {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub boot_log: Vec<String>,
    pub phases: Vec<PhaseSpec>,
    #[serde(default)]
    pub success: Vec<String>,
    #[serde(default)]
    pub offer: Offer,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseSpec {
    pub title: String,
    /// Narration appended when the phase becomes active.
    #[serde(default)]
    pub entry: Vec<String>,
    /// Overrides the session-wide advance delay; `0` advances synchronously.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub advance_delay_ms: Option<u64>,
    pub challenge: ChallengeKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChallengeKind {
    Text(TextChallenge),
    Choice(ChoiceChallenge),
    Memory(MemoryChallenge),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextChallenge {
    pub accepted: Vec<String>,
    #[serde(default = "default_true")]
    pub trim: bool,
    #[serde(default)]
    pub case_fold: bool,
    #[serde(default)]
    pub placeholder: String,
    #[serde(default = "default_submit_label")]
    pub submit_label: String,
    #[serde(default)]
    pub success: Vec<String>,
    pub failure: String,
}

impl TextChallenge {
    pub fn normalization(&self) -> Normalization {
        Normalization {
            trim: self.trim,
            case_fold: self.case_fold,
        }
    }

    pub fn accepts(&self, raw: &str) -> bool {
        answer::matches_any(&self.accepted, raw, self.normalization())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceChallenge {
    pub choices: Vec<Choice>,
    /// Logged on every selection; `{label}` is replaced by the chosen label.
    #[serde(default = "default_selection_line")]
    pub selection: String,
    #[serde(default)]
    pub success: Vec<String>,
    pub failure: String,
}

impl ChoiceChallenge {
    pub fn find(&self, choice_id: &str) -> Option<&Choice> {
        self.choices.iter().find(|choice| choice.id == choice_id)
    }

    pub fn selection_line(&self, label: &str) -> String {
        self.selection.replace("{label}", label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub correct: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryChallenge {
    #[serde(default = "default_node_count")]
    pub node_count: u8,
    #[serde(default = "default_pattern_length")]
    pub pattern_length: usize,
    #[serde(default)]
    pub narration: Vec<String>,
    pub desync: String,
    #[serde(default)]
    pub success: Vec<String>,
}

/// Marketing copy and outbound links. The controller never reads these.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Offer {
    pub price_line: String,
    pub tagline: String,
    pub start_label: String,
    pub success_headline: String,
    pub success_body: String,
    pub reset_label: String,
    pub warning: String,
    pub footer: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_invite_url: Option<String>,
    pub channel_invite_label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub referral_url: Option<String>,
    pub referral_label: String,
}

fn default_true() -> bool {
    true
}

fn default_submit_label() -> String {
    "Valider".to_string()
}

fn default_selection_line() -> String {
    "Décision : {label}".to_string()
}

fn default_node_count() -> u8 {
    4
}

fn default_pattern_length() -> usize {
    4
}

impl Variant {
    pub fn phase(&self, index: usize) -> Option<&PhaseSpec> {
        self.phases.get(index)
    }

    pub fn phase_count(&self) -> usize {
        self.phases.len()
    }

    pub fn validate(&self) -> Result<(), CatalogError> {
        let variant = || self.id.clone();

        if self.phases.is_empty() {
            return Err(CatalogError::EmptyPhases { variant: variant() });
        }
        if self.boot_log.len() > LOG_CAPACITY {
            return Err(CatalogError::BootLogTooLong {
                variant: variant(),
                len: self.boot_log.len(),
                capacity: LOG_CAPACITY,
            });
        }

        for (phase, spec) in self.phases.iter().enumerate() {
            match &spec.challenge {
                ChallengeKind::Text(text) => {
                    if text.accepted.iter().all(|a| a.trim().is_empty()) {
                        return Err(CatalogError::NoAcceptedAnswers {
                            variant: variant(),
                            phase,
                        });
                    }
                }
                ChallengeKind::Choice(choice) => {
                    let mut seen = HashSet::new();
                    for option in &choice.choices {
                        if !seen.insert(option.id.as_str()) {
                            return Err(CatalogError::DuplicateChoice {
                                variant: variant(),
                                phase,
                                choice_id: option.id.clone(),
                            });
                        }
                    }
                    if !choice.choices.iter().any(|option| option.correct) {
                        return Err(CatalogError::NoCorrectChoice {
                            variant: variant(),
                            phase,
                        });
                    }
                }
                ChallengeKind::Memory(memory) => {
                    let reason = if memory.node_count == 0 {
                        Some("node_count must be at least 1".to_string())
                    } else if memory.node_count > MAX_MEMORY_NODES {
                        Some(format!("node_count must not exceed {MAX_MEMORY_NODES}"))
                    } else if memory.pattern_length == 0 {
                        Some("pattern_length must be at least 1".to_string())
                    } else if memory.pattern_length > MAX_PATTERN_LENGTH {
                        Some(format!("pattern_length must not exceed {MAX_PATTERN_LENGTH}"))
                    } else {
                        None
                    };
                    if let Some(reason) = reason {
                        return Err(CatalogError::InvalidMemoryBoard {
                            variant: variant(),
                            phase,
                            reason,
                        });
                    }
                }
            }
        }

        for link in [&self.offer.channel_invite_url, &self.offer.referral_url]
            .into_iter()
            .flatten()
        {
            url::Url::parse(link).map_err(|source| CatalogError::InvalidLink {
                variant: variant(),
                link: link.clone(),
                source,
            })?;
        }

        Ok(())
    }
}

pub fn parse_variant(raw: &str) -> Result<Variant, CatalogError> {
    let variant: Variant = toml::from_str(raw)?;
    variant.validate()?;
    Ok(variant)
}

pub fn load_variant_file(path: &Path) -> Result<Variant, CatalogError> {
    let raw = fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_variant(&raw)
}

pub fn resolve_builtin(id: &str) -> Result<Variant, CatalogError> {
    builtin(id).ok_or_else(|| CatalogError::UnknownVariant {
        id: id.to_string(),
        available: builtin_ids().join(", "),
    })
}

#[cfg(test)]
#[path = "../tests/catalog_tests.rs"]
mod tests;
