use crate::abx::AbxChoice;
use auris_ports::command::EngineCommand;
use auris_ports::playback::PlaybackState;
use auris_ports::types::{PlayerId, SlotIndex};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum Command {
    BeginSession,
    Play { player: PlayerId, slot: SlotIndex },
    Pause { player: PlayerId },
    Stop { player: PlayerId },
    ToggleLoop { player: PlayerId },
    SetCrossfade { enabled: bool },
    SetRating { player: PlayerId, slot: SlotIndex, value: u8 },
    ChooseAnswer { player: PlayerId, answer: AbxChoice },
    Teardown,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum Event {
    StateChanged {
        player: PlayerId,
        state: PlaybackState,
        slot: Option<SlotIndex>,
    },
    LoopChanged { player: PlayerId, enabled: bool },
    LoopRejected { player: PlayerId },
    DurationRecorded {
        player: PlayerId,
        slot: SlotIndex,
        seconds: f64,
    },
    Revealed { player: PlayerId },
    CommandDropped {
        player: Option<PlayerId>,
        command: EngineCommand,
        reason: String,
    },
    CrossfadeChanged { enabled: bool },
    RatingChanged {
        player: PlayerId,
        slot: SlotIndex,
        value: u8,
    },
    AnswerChosen { player: PlayerId, answer: AbxChoice },
    SessionStarted,
}
