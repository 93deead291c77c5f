use serde::{Deserialize, Serialize};
use std::fmt;

pub type Cue = u32; // marker number inside the engine project
pub type TrackNumber = u32; // 1-based track index as the engine addresses it
pub type SlotIndex = usize; // stimulus position inside one player

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(pub u32);

/// What a slot means on the page. Drives coordinator policy instead of widget type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerRole {
    Single,
    MushraReference,
    MushraComparison,
    AbxA,
    AbxB,
    AbxX,
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "player-{}", self.0)
    }
}
