use crate::types::TrackNumber;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One OSC message for the playback engine: an address plus a single int argument.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EngineCommand {
    pub address: String,
    pub value: i32,
}

#[derive(thiserror::Error, Debug)]
pub enum ChannelError {
    #[error("engine unreachable: {0}")]
    Unreachable(String),
    #[error("encode failed: {0}")]
    Encode(String),
    #[error("backend error: {0}")]
    Backend(String),
}

impl EngineCommand {
    pub fn new(address: impl Into<String>, value: i32) -> Self {
        Self {
            address: address.into(),
            value,
        }
    }

    pub fn action(code: i32) -> Self {
        Self::new("/action", code)
    }

    pub fn track_mute(track: TrackNumber, muted: bool) -> Self {
        Self::new(format!("/track/{}/mute", track), muted as i32)
    }

    pub fn track_select(track: TrackNumber, selected: bool) -> Self {
        Self::new(format!("/track/{}/select", track), selected as i32)
    }

    pub fn play() -> Self {
        Self::new("/play", 1)
    }

    pub fn pause() -> Self {
        Self::new("/pause", 1)
    }

    pub fn stop() -> Self {
        Self::new("/stop", 1)
    }
}

impl fmt::Display for EngineCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.address, self.value)
    }
}

/// Fire-and-forget link to the engine. Ordering is send order; nothing is acknowledged.
pub trait CommandChannel: Send + Sync {
    fn send(&self, command: &EngineCommand) -> Result<(), ChannelError>;
}
