use auris_ports::command::EngineCommand;
use auris_ports::stimulus::TrackSpec;
use auris_ports::storage::ActionCodes;
use auris_ports::types::{Cue, SlotIndex, TrackNumber};

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("track shape: {0}")]
    TrackShape(String),
    #[error("marker {0} has no goto action")]
    CueOutOfRange(Cue),
    #[error("slot {slot} out of range for {count} alternatives")]
    SlotOutOfRange { slot: SlotIndex, count: usize },
}

/// How a track spec resolves for one armed slot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Addressing<'a> {
    /// Unmute exactly this track.
    Single(TrackNumber),
    /// Always-selected set, independent of the armed slot.
    Fixed(Vec<TrackNumber>),
    /// The armed slot's own entry out of a per-alternative list.
    PerAlternative(&'a [TrackNumber]),
}

pub fn classify(
    tracks: &TrackSpec,
    alternative_count: usize,
    active_index: SlotIndex,
) -> Result<Addressing<'_>, ProtocolError> {
    if active_index >= alternative_count {
        return Err(ProtocolError::SlotOutOfRange {
            slot: active_index,
            count: alternative_count,
        });
    }

    let entries = match tracks {
        TrackSpec::Single(track) => return Ok(Addressing::Single(*track)),
        TrackSpec::List(entries) => entries,
    };

    if entries.is_empty() {
        return Err(ProtocolError::TrackShape("empty track list".to_string()));
    }

    if entries.len() == alternative_count {
        let selected = entries[active_index].tracks();
        if selected.is_empty() {
            return Err(ProtocolError::TrackShape(format!(
                "entry {} selects no tracks",
                active_index
            )));
        }
        return Ok(Addressing::PerAlternative(selected));
    }

    if !tracks.is_flat() {
        return Err(ProtocolError::TrackShape(format!(
            "nested list has {} entries but page has {} alternatives",
            entries.len(),
            alternative_count
        )));
    }

    // A flat list of any other length is one fixed set, longer lists included:
    // a plain player (one alternative) playing several tracks at once is `[1, 2]`.
    let fixed = entries
        .iter()
        .flat_map(|entry| entry.tracks().iter().copied())
        .collect();
    Ok(Addressing::Fixed(fixed))
}

/// Turns a track spec into mute/select traffic. Every sequence starts from a
/// full reset, so the previous selection never matters.
#[derive(Clone, Copy, Debug)]
pub struct TrackAddressor {
    codes: ActionCodes,
}

impl TrackAddressor {
    pub fn new(codes: ActionCodes) -> Self {
        Self { codes }
    }

    pub fn reset_sequence(&self) -> [EngineCommand; 2] {
        [
            EngineCommand::action(self.codes.mute_all),
            EngineCommand::action(self.codes.unselect_all),
        ]
    }

    pub fn mute_sequence(
        &self,
        tracks: &TrackSpec,
        alternative_count: usize,
        active_index: SlotIndex,
    ) -> Result<Vec<EngineCommand>, ProtocolError> {
        let addressing = classify(tracks, alternative_count, active_index)?;

        let mut commands = Vec::from(self.reset_sequence());
        match addressing {
            Addressing::Single(track) => {
                commands.push(EngineCommand::track_mute(track, false));
            }
            Addressing::Fixed(selected) => {
                self.push_toggle_selection(&mut commands, &selected);
            }
            Addressing::PerAlternative(selected) => {
                self.push_toggle_selection(&mut commands, selected);
            }
        }
        Ok(commands)
    }

    // no raw "set these, clear the rest" primitive; select then toggle
    fn push_toggle_selection(&self, commands: &mut Vec<EngineCommand>, tracks: &[TrackNumber]) {
        commands.extend(
            tracks
                .iter()
                .map(|track| EngineCommand::track_select(*track, true)),
        );
        commands.push(EngineCommand::action(self.codes.toggle_mute_selected));
    }
}
