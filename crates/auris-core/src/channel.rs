use auris_ports::command::{ChannelError, CommandChannel, EngineCommand};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Default)]
pub struct MemoryChannel {
    sent: Mutex<Vec<EngineCommand>>,
    offline: AtomicBool,
}

impl MemoryChannel {
    pub fn new() -> Self {
        Self::default()
    }

    // While offline every send fails the way an unreachable engine would.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::Relaxed);
    }

    pub fn sent(&self) -> Vec<EngineCommand> {
        self.sent.lock().clone()
    }

    pub fn take(&self) -> Vec<EngineCommand> {
        std::mem::take(&mut *self.sent.lock())
    }
}

impl CommandChannel for MemoryChannel {
    fn send(&self, command: &EngineCommand) -> Result<(), ChannelError> {
        if self.offline.load(Ordering::Relaxed) {
            return Err(ChannelError::Unreachable("memory channel offline".to_string()));
        }
        self.sent.lock().push(command.clone());
        Ok(())
    }
}
