//! Routes UI events into the session. Rejected events are logged, never shown.

use std::time::Instant;

use challenge_core::Session;

use super::events::UiEvent;

pub fn dispatch_ui_event(session: &mut Session, now: Instant, event: UiEvent, status: &mut String) {
    let intent = event.into_intent();
    let intent_name = intent.name();

    match session.dispatch(now, intent) {
        Ok(()) => {
            tracing::debug!(intent = intent_name, phase = %session.phase(), "ui intent applied");
            status.clear();
        }
        Err(err) => {
            tracing::warn!(intent = intent_name, error = %err, "ui intent rejected");
        }
    }
}
