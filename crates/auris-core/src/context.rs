use crate::ipc::Event;
use auris_ports::clock::Clock;
use auris_ports::command::{CommandChannel, EngineCommand};
use auris_ports::log::PageLog;
use auris_ports::storage::{ActionCodes, EngineProfile};
use auris_ports::types::PlayerId;
use std::collections::VecDeque;
use std::sync::Arc;

#[derive(Clone)]
pub struct PageContext {
    pub channel: Arc<dyn CommandChannel>,
    pub clock: Arc<dyn Clock>,
    pub log: Arc<dyn PageLog>,
    pub actions: ActionCodes,
}

impl PageContext {
    pub fn new(
        channel: Arc<dyn CommandChannel>,
        clock: Arc<dyn Clock>,
        log: Arc<dyn PageLog>,
        profile: &EngineProfile,
    ) -> Self {
        Self {
            channel,
            clock,
            log,
            actions: profile.actions,
        }
    }
}

impl PageContext {
    // Sends in order, fire-and-forget. A failed send is logged and reported,
    // never retried, and does not stop the rest of the sequence.
    pub fn dispatch(
        &self,
        origin: Option<PlayerId>,
        commands: &[EngineCommand],
        events: &mut VecDeque<Event>,
    ) {
        for command in commands {
            log::debug!("engine <- {}", command);
            if let Err(err) = self.channel.send(command) {
                log::warn!("command {} dropped: {}", command, err);
                self.note(&format!("command {} dropped: {}", command, err));
                events.push_back(Event::CommandDropped {
                    player: origin,
                    command: command.clone(),
                    reason: err.to_string(),
                });
            }
        }
    }

    pub fn note(&self, line: &str) {
        let now = self.clock.now();
        self.log.append(&format!("[{:>9.3}] {}", now.as_secs_f64(), line));
    }
}
