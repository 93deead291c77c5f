pub mod clock;
pub mod command;
pub mod log;
pub mod playback;
pub mod stimulus;
pub mod storage;
pub mod types;

pub use clock::*;
pub use command::*;
pub use log::*;
pub use playback::*;
pub use stimulus::*;
pub use storage::*;
pub use types::*;
