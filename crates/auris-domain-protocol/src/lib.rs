pub mod cue;
pub mod tracks;
pub mod validate;

pub use cue::*;
pub use tracks::*;
pub use validate::*;
