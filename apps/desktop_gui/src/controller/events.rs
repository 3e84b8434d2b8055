//! Events raised by widgets, before they become controller intents.

use shared::{domain::NodeIndex, protocol::Intent};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    StartPressed,
    AnswerEdited(String),
    AnswerSubmitted(String),
    ChoicePicked(String),
    NodeClicked(NodeIndex),
    ResetPressed,
}

impl UiEvent {
    pub fn into_intent(self) -> Intent {
        match self {
            UiEvent::StartPressed => Intent::Start,
            UiEvent::AnswerEdited(text) => Intent::EditAnswer { text },
            UiEvent::AnswerSubmitted(raw) => Intent::SubmitAnswer { raw },
            UiEvent::ChoicePicked(choice_id) => Intent::SelectChoice { choice_id },
            UiEvent::NodeClicked(index) => Intent::SelectNode { index },
            UiEvent::ResetPressed => Intent::Reset,
        }
    }
}
