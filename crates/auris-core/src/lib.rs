pub mod abx;
pub mod channel;
pub mod clock;
pub mod context;
pub mod controller;
pub mod coordinator;
pub mod countdown;
pub mod duration;
pub mod error;
pub mod ipc;
pub mod mushra;
pub mod page_log;
pub mod profile;

pub use abx::*;
pub use channel::*;
pub use clock::*;
pub use context::*;
pub use controller::*;
pub use coordinator::*;
pub use countdown::*;
pub use duration::*;
pub use error::*;
pub use ipc::*;
pub use mushra::*;
pub use page_log::*;
pub use profile::*;
