use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{
    domain::{NodeIndex, Phase, TimerId},
    error::ValidationFailure,
};

/// Everything the render layer (or a fired timer) can ask of the controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum Intent {
    Start,
    EditAnswer { text: String },
    SubmitAnswer { raw: String },
    SelectChoice { choice_id: String },
    SelectNode { index: NodeIndex },
    Reset,
    TimerFired { id: TimerId },
}

impl Intent {
    pub fn name(&self) -> &'static str {
        match self {
            Intent::Start => "start",
            Intent::EditAnswer { .. } => "edit_answer",
            Intent::SubmitAnswer { .. } => "submit_answer",
            Intent::SelectChoice { .. } => "select_choice",
            Intent::SelectNode { .. } => "select_node",
            Intent::Reset => "reset",
            Intent::TimerFired { .. } => "timer_fired",
        }
    }
}

/// Deferred callback the controller wants delivered back as `Intent::TimerFired`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TimerKind {
    ClearGlitch,
    Advance { from: Phase, to: Phase },
    PlaybackShow { step: usize },
    PlaybackHide { step: usize },
}

impl TimerKind {
    pub fn is_playback(self) -> bool {
        matches!(
            self,
            TimerKind::PlaybackShow { .. } | TimerKind::PlaybackHide { .. }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Effect {
    Schedule {
        id: TimerId,
        delay: Duration,
        timer: TimerKind,
    },
    Cancel {
        id: TimerId,
    },
    ValidationFailed {
        failure: ValidationFailure,
    },
}
