use crate::types::{Cue, TrackNumber};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TrackEntry {
    One(TrackNumber),
    Many(Vec<TrackNumber>),
}

/// Track addressing as written in the page definition.
///
/// `3` unmutes one track, `[1, 2]` is a fixed set, and a list with one entry
/// per alternative (`[1, [2, 3], 4]`) picks the entry of the armed slot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TrackSpec {
    Single(TrackNumber),
    List(Vec<TrackEntry>),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stimulus {
    pub start_cue: Cue,
    #[serde(default)]
    pub end_cue: Option<Cue>,
    pub track: TrackSpec,
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("page has no players")]
    EmptyPage,
    #[error("player has no stimuli: {0}")]
    EmptyPlayer(String),
    #[error("duplicate player id: {0}")]
    DuplicatePlayer(String),
    #[error("invalid track spec: {0}")]
    TrackShape(String),
    #[error("invalid cue range: {0}")]
    CueRange(String),
    #[error("invalid slot layout: {0}")]
    SlotLayout(String),
}

impl TrackEntry {
    pub fn tracks(&self) -> &[TrackNumber] {
        match self {
            Self::One(track) => std::slice::from_ref(track),
            Self::Many(tracks) => tracks,
        }
    }
}

impl TrackSpec {
    /// True when the list only holds plain track numbers.
    pub fn is_flat(&self) -> bool {
        match self {
            Self::Single(_) => true,
            Self::List(entries) => entries.iter().all(|e| matches!(e, TrackEntry::One(_))),
        }
    }
}

impl Stimulus {
    pub fn new(start_cue: Cue, end_cue: Option<Cue>, track: TrackSpec) -> Self {
        Self {
            start_cue,
            end_cue,
            track,
        }
    }

    pub fn shares_markers_with(&self, other: &Stimulus) -> bool {
        self.start_cue == other.start_cue && self.end_cue == other.end_cue
    }
}
