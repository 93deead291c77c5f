use crate::cue::goto_code;
use crate::tracks::{classify, ProtocolError};
use auris_ports::stimulus::{ConfigurationError, Stimulus};

/// Load-time shape check. Runs once per stimulus before any player is built;
/// the engine-facing code assumes it passed.
pub fn validate_stimulus(
    stimulus: &Stimulus,
    alternative_count: usize,
) -> Result<(), ConfigurationError> {
    if let Some(end_cue) = stimulus.end_cue {
        if end_cue == stimulus.start_cue {
            return Err(ConfigurationError::CueRange(format!(
                "start and end cue are both {}",
                end_cue
            )));
        }
    }

    for cue in std::iter::once(stimulus.start_cue).chain(stimulus.end_cue) {
        goto_code(cue).map_err(|err| ConfigurationError::CueRange(err.to_string()))?;
    }

    for slot in 0..alternative_count {
        classify(&stimulus.track, alternative_count, slot).map_err(|err| match err {
            ProtocolError::TrackShape(msg) => ConfigurationError::TrackShape(msg),
            other => ConfigurationError::SlotLayout(other.to_string()),
        })?;
    }
    Ok(())
}

/// True when every stimulus shares the first one's start and end cues.
pub fn uses_shared_markers<'a>(stimuli: impl IntoIterator<Item = &'a Stimulus>) -> bool {
    let mut iter = stimuli.into_iter();
    let Some(first) = iter.next() else {
        return false;
    };
    iter.all(|stimulus| stimulus.shares_markers_with(first))
}
