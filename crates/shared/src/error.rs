use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{NodeIndex, Phase};

/// Category of a rejected answer. Never fatal: the visitor may retry at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationFailure {
    WrongAnswer,
    WrongChoice,
    PatternMismatch,
}

impl ValidationFailure {
    pub fn label(self) -> &'static str {
        match self {
            ValidationFailure::WrongAnswer => "wrong answer",
            ValidationFailure::WrongChoice => "wrong choice",
            ValidationFailure::PatternMismatch => "pattern mismatch",
        }
    }
}

/// An intent the render layer should never have sent in the current state.
/// The controller leaves its state untouched when it returns one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContractViolation {
    #[error("intent `{intent}` is not accepted in phase {phase}")]
    WrongPhase { intent: &'static str, phase: Phase },
    #[error("unknown choice `{choice_id}` in phase {phase}")]
    UnknownChoice { choice_id: String, phase: Phase },
    #[error("node {index} is outside the {node_count}-node board")]
    NodeOutOfRange { index: NodeIndex, node_count: u8 },
}
