use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! id_newtype {
    ($name:ident, $inner:ty) => {
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        pub struct $name(pub $inner);
    };
}

id_newtype!(NodeIndex, u8);
id_newtype!(TimerId, u64);

impl fmt::Display for NodeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identifies one isolated controller instance in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Step of the linear challenge sequence. `Challenge` carries the zero-based
/// position in the variant's phase list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "index", rename_all = "snake_case")]
pub enum Phase {
    Intro,
    Challenge(usize),
    Success,
}

impl Phase {
    pub fn challenge_index(self) -> Option<usize> {
        match self {
            Phase::Challenge(index) => Some(index),
            Phase::Intro | Phase::Success => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        self == Phase::Success
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Intro => f.write_str("intro"),
            Phase::Challenge(index) => write!(f, "challenge_{}", index + 1),
            Phase::Success => f.write_str("success"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogKind {
    System,
    Echo,
}

pub const ECHO_PREFIX: &str = "> ";

/// One narration line. `seq` grows by one per appended entry and restarts on reset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub seq: u64,
    pub kind: LogKind,
    pub text: String,
}

impl LogEntry {
    pub fn is_echo(&self) -> bool {
        self.kind == LogKind::Echo
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            LogKind::System => f.write_str(&self.text),
            LogKind::Echo => write!(f, "{ECHO_PREFIX}{}", self.text),
        }
    }
}

/// Immutable view of the controller handed to the render layer after every intent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub phase: Phase,
    pub log: Vec<LogEntry>,
    pub glitch: bool,
    pub answer: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pattern: Vec<NodeIndex>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub user_pattern: Vec<NodeIndex>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_node: Option<NodeIndex>,
}
