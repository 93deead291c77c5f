use auris_domain_protocol::ProtocolError;
use auris_ports::stimulus::ConfigurationError;
use auris_ports::types::{PlayerId, SlotIndex};

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum CoreError {
    #[error("unknown player: {0}")]
    UnknownPlayer(PlayerId),
    #[error("{player} has no slot {slot}")]
    SlotOutOfRange { player: PlayerId, slot: SlotIndex },
    #[error("crossfade needs identical start and end cues on every stimulus")]
    CrossfadeUnavailable,
    #[error("{0} cannot loop while crossfade is engaged")]
    LoopUnavailable(PlayerId),
    #[error("slot {0} cannot be rated")]
    NotRateable(SlotIndex),
    #[error("rating out of range: {0}")]
    RatingOutOfRange(u8),
    #[error("{player} is not a {expected} player")]
    WrongPlayerKind {
        player: PlayerId,
        expected: &'static str,
    },
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),
}
