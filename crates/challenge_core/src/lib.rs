//! Challenge gate controller: a linear phase state machine with narration log,
//! glitch feedback and memory-game playback, plus the content catalog and
//! settings shared by the front-ends.

pub mod answer;
pub mod catalog;
pub mod config;
mod controller;
mod log;
pub mod pattern;
mod session;
pub mod timers;

pub use catalog::{CatalogError, ChallengeKind, Variant};
pub use config::{load_settings, Settings, SettingsError};
pub use controller::{ChallengeController, Timings};
pub use log::{NarrationLog, LOG_CAPACITY};
pub use pattern::{FixedPattern, PatternSource, RandomPattern};
pub use session::Session;
pub use timers::TimerQueue;
