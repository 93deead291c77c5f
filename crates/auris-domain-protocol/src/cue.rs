use crate::tracks::ProtocolError;
use auris_ports::command::EngineCommand;
use auris_ports::types::Cue;

/// "Go to marker N" for N in 1..=9 sits at this base; marker 10 is the bare base.
pub const GOTO_MARKER_BASE: i32 = 40160;
/// Markers past 10 live in a second block.
pub const GOTO_MARKER_HIGH_BASE: i32 = 41240;
/// Highest marker whose action code still fits the wire's int argument.
pub const MAX_CUE: Cue = (i32::MAX - GOTO_MARKER_HIGH_BASE) as Cue;

/// The engine has one action per marker rather than a parameterised seek.
/// `40170` is already taken by an unrelated action, so marker 10 maps to the
/// bare base.
pub fn goto_code(cue: Cue) -> Result<i32, ProtocolError> {
    let offset = i32::try_from(cue).map_err(|_| ProtocolError::CueOutOfRange(cue))?;
    match offset {
        c if c < 10 => Ok(GOTO_MARKER_BASE + c),
        10 => Ok(GOTO_MARKER_BASE),
        c => GOTO_MARKER_HIGH_BASE
            .checked_add(c)
            .ok_or(ProtocolError::CueOutOfRange(cue)),
    }
}

pub fn encode_goto(cue: Cue) -> Result<EngineCommand, ProtocolError> {
    goto_code(cue).map(EngineCommand::action)
}
