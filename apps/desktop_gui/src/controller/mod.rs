//! Controller layer: UI events and their translation into controller intents.

pub mod events;
pub mod orchestration;
