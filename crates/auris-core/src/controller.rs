use crate::context::PageContext;
use crate::countdown::CountdownTimer;
use crate::duration::{DurationEntry, DurationTracker};
use crate::error::CoreError;
use crate::ipc::Event;
use auris_domain_protocol::{encode_goto, validate_stimulus, ProtocolError, TrackAddressor};
use auris_ports::command::EngineCommand;
use auris_ports::playback::PlaybackState;
use auris_ports::stimulus::{ConfigurationError, Stimulus};
use auris_ports::types::{PlayerId, PlayerRole, SlotIndex};
use std::collections::VecDeque;
use std::time::Duration;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Slot {
    pub role: PlayerRole,
    pub stimulus: Stimulus,
}

impl Slot {
    pub fn new(role: PlayerRole, stimulus: Stimulus) -> Self {
        Self { role, stimulus }
    }
}

pub struct PlaybackController {
    id: PlayerId,
    slots: Vec<Slot>,
    durations: Vec<DurationTracker>,
    state: PlaybackState,
    current: Option<SlotIndex>,
    last_active_index: Option<SlotIndex>,
    looping: bool,
    crossfade: bool,
    selected: bool,
    countdown: Option<CountdownTimer>,
    revealed: bool,
    addressor: TrackAddressor,
    ctx: PageContext,
    events: VecDeque<Event>,
}

impl PlaybackController {
    pub fn new(id: PlayerId, slots: Vec<Slot>, ctx: PageContext) -> Result<Self, ConfigurationError> {
        if slots.is_empty() {
            return Err(ConfigurationError::EmptyPlayer(id.to_string()));
        }
        for slot in &slots {
            validate_stimulus(&slot.stimulus, slots.len())?;
        }

        let durations = vec![DurationTracker::new(); slots.len()];
        let addressor = TrackAddressor::new(ctx.actions);
        Ok(Self {
            id,
            slots,
            durations,
            state: PlaybackState::Stopped,
            current: None,
            last_active_index: None,
            looping: false,
            crossfade: false,
            selected: true,
            countdown: None,
            revealed: true,
            addressor,
            ctx,
            events: VecDeque::new(),
        })
    }

    pub fn with_countdown(mut self, total: Duration) -> Self {
        self.countdown = Some(CountdownTimer::new(total));
        self.revealed = false;
        self
    }

    pub fn id(&self) -> PlayerId {
        self.id
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn current_slot(&self) -> Option<SlotIndex> {
        self.current
    }

    pub fn last_active_index(&self) -> Option<SlotIndex> {
        self.last_active_index
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    pub fn crossfade_engaged(&self) -> bool {
        self.crossfade
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    pub fn countdown(&self) -> Option<&CountdownTimer> {
        self.countdown.as_ref()
    }

    pub fn durations(&self, slot: SlotIndex) -> Option<&DurationTracker> {
        self.durations.get(slot)
    }

    pub fn play_count(&self, slot: SlotIndex) -> usize {
        self.durations.get(slot).map_or(0, DurationTracker::len)
    }

    pub fn duration_entries(&self) -> impl Iterator<Item = DurationEntry> + '_ {
        self.slots
            .iter()
            .zip(&self.durations)
            .enumerate()
            .map(move |(slot, (info, tracker))| DurationEntry {
                player: self.id,
                slot,
                role: info.role,
                samples: tracker.samples().to_vec(),
            })
    }

    pub fn clear_durations(&mut self) {
        for tracker in &mut self.durations {
            tracker.clear();
        }
        // an interval that is running right now starts counting from here
        if let (PlaybackState::Playing, Some(slot)) = (self.state, self.current) {
            self.durations[slot].open(self.ctx.clock.now());
        }
    }

    pub fn set_crossfade(&mut self, enabled: bool) {
        self.crossfade = enabled;
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    // Under crossfade only the selected player may loop.
    pub fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }

    pub fn drain_events(&mut self) -> Vec<Event> {
        self.events.drain(..).collect()
    }

    pub fn play(&mut self, slot: SlotIndex) -> Result<(), CoreError> {
        if slot >= self.slots.len() {
            return Err(CoreError::SlotOutOfRange {
                player: self.id,
                slot,
            });
        }

        let now = self.ctx.clock.now();
        match (self.state, self.current) {
            (PlaybackState::Paused, Some(current)) if current == slot => {
                self.resume(slot, now);
                Ok(())
            }
            (PlaybackState::Playing | PlaybackState::Paused, Some(current))
                if self.crossfade && current != slot =>
            {
                let paused = self.state == PlaybackState::Paused;
                self.switch_tracks(Some(current), slot, paused, now)?;
                if let Some(timer) = self.countdown.as_mut() {
                    timer.resume(now);
                }
                Ok(())
            }
            _ => self.start_from_cue(slot, now),
        }
    }

    pub fn pause(&mut self) {
        let now = self.ctx.clock.now();
        match (self.state, self.current) {
            (PlaybackState::Playing, Some(slot)) => {
                self.send(EngineCommand::pause());
                self.close_interval(now);
                if let Some(timer) = self.countdown.as_mut() {
                    timer.pause(now);
                }
                self.set_state(PlaybackState::Paused, Some(slot));
                self.ctx.note(&format!("{} pause slot {}", self.id, slot));
            }
            (PlaybackState::Paused, Some(slot)) => {
                self.send(EngineCommand::pause());
                self.durations[slot].open(now);
                if let Some(timer) = self.countdown.as_mut() {
                    timer.resume(now);
                }
                self.set_state(PlaybackState::Playing, Some(slot));
                self.ctx.note(&format!("{} unpause slot {}", self.id, slot));
            }
            _ => log::debug!("{} pause ignored while stopped", self.id),
        }
    }

    pub fn stop(&mut self) {
        if !self.state.is_active() {
            log::debug!("{} stop ignored while stopped", self.id);
            return;
        }

        let now = self.ctx.clock.now();
        self.send(EngineCommand::stop());
        self.close_interval(now);
        if let Some(timer) = self.countdown.as_mut() {
            timer.stop();
        }
        let slot = self.current;
        self.set_state(PlaybackState::Stopped, None);
        if let Some(slot) = slot {
            self.ctx.note(&format!("{} stop slot {}", self.id, slot));
        }
    }

    // Coordinator-forced stop for a crossfade hand-over. The engine keeps
    // playing for the next player, so nothing is sent.
    pub fn release(&mut self) {
        if !self.state.is_active() {
            return;
        }
        let now = self.ctx.clock.now();
        self.close_interval(now);
        if let Some(timer) = self.countdown.as_mut() {
            timer.stop();
        }
        let slot = self.current;
        self.set_state(PlaybackState::Stopped, None);
        if let Some(slot) = slot {
            self.ctx.note(&format!("{} release slot {}", self.id, slot));
        }
    }

    // Picks up playback another player released: only the audible tracks
    // change. `paused` resumes an engine that was left paused.
    pub fn take_over(&mut self, slot: SlotIndex, paused: bool) -> Result<(), CoreError> {
        if slot >= self.slots.len() {
            return Err(CoreError::SlotOutOfRange {
                player: self.id,
                slot,
            });
        }
        let now = self.ctx.clock.now();
        self.switch_tracks(None, slot, paused, now)?;
        if let Some(timer) = self.countdown.as_mut() {
            timer.start_or_resume(now);
        }
        Ok(())
    }

    pub fn toggle_loop(&mut self) -> Result<bool, CoreError> {
        if self.crossfade && !self.selected {
            log::warn!("{}: loop unavailable while crossfade is engaged", self.id);
            self.ctx
                .note(&format!("{} loop rejected: crossfade engaged", self.id));
            self.events.push_back(Event::LoopRejected { player: self.id });
            return Err(CoreError::LoopUnavailable(self.id));
        }

        self.looping = !self.looping;
        let code = if self.looping {
            self.ctx.actions.loop_on
        } else {
            self.ctx.actions.loop_off
        };
        self.send(EngineCommand::action(code));
        self.events.push_back(Event::LoopChanged {
            player: self.id,
            enabled: self.looping,
        });
        self.ctx
            .note(&format!("{} loop {}", self.id, if self.looping { "on" } else { "off" }));
        Ok(self.looping)
    }

    pub fn poll_countdown(&mut self, now: Duration) {
        let Some(timer) = self.countdown.as_mut() else {
            return;
        };
        if timer.poll(now) && !self.revealed {
            self.revealed = true;
            self.events.push_back(Event::Revealed { player: self.id });
            self.ctx.note(&format!("{} revealed", self.id));
        }
    }

    pub fn cancel_countdown(&mut self) {
        if let Some(timer) = self.countdown.as_mut() {
            timer.cancel();
        }
    }

    fn resume(&mut self, slot: SlotIndex, now: Duration) {
        self.send(EngineCommand::play());
        self.durations[slot].open(now);
        if let Some(timer) = self.countdown.as_mut() {
            timer.resume(now);
        }
        self.set_state(PlaybackState::Playing, Some(slot));
        self.ctx.note(&format!("{} resume slot {}", self.id, slot));
    }

    // Playing the slot that is already playing lands here too and restarts it.
    fn start_from_cue(&mut self, slot: SlotIndex, now: Duration) -> Result<(), CoreError> {
        let stimulus = &self.slots[slot].stimulus;
        let mut commands =
            self.addressor
                .mute_sequence(&stimulus.track, self.slots.len(), slot)?;
        commands.push(EngineCommand::stop());
        commands.push(encode_goto(stimulus.start_cue)?);
        if self.looping {
            commands.extend(self.loop_bracket(stimulus)?);
        }
        commands.push(EngineCommand::play());

        self.close_interval(now);
        self.send_all(&commands);
        self.durations[slot].open(now);
        if let Some(timer) = self.countdown.as_mut() {
            timer.start_or_resume(now);
        }
        self.last_active_index = Some(slot);
        self.set_state(PlaybackState::Playing, Some(slot));
        self.ctx.note(&format!("{} play slot {}", self.id, slot));
        Ok(())
    }

    // Continuous playback: only the audible tracks change.
    fn switch_tracks(
        &mut self,
        previous: Option<SlotIndex>,
        slot: SlotIndex,
        paused: bool,
        now: Duration,
    ) -> Result<(), CoreError> {
        let commands = self.addressor.mute_sequence(
            &self.slots[slot].stimulus.track,
            self.slots.len(),
            slot,
        )?;

        self.close_interval(now);
        self.send_all(&commands);
        if paused {
            self.send(EngineCommand::play());
        }
        self.durations[slot].open(now);
        self.last_active_index = Some(slot);
        self.set_state(PlaybackState::Playing, Some(slot));
        match previous {
            Some(previous) => self
                .ctx
                .note(&format!("{} crossfade slot {} -> {}", self.id, previous, slot)),
            None => self.ctx.note(&format!("{} take over slot {}", self.id, slot)),
        }
        Ok(())
    }

    fn loop_bracket(&self, stimulus: &Stimulus) -> Result<Vec<EngineCommand>, ProtocolError> {
        let actions = &self.ctx.actions;
        let bracket = match stimulus.end_cue {
            Some(end_cue) => vec![
                encode_goto(end_cue)?,
                EngineCommand::action(actions.loop_end_marker),
                encode_goto(stimulus.start_cue)?,
                EngineCommand::action(actions.loop_start_marker),
            ],
            None => vec![EngineCommand::action(actions.loop_start_marker)],
        };
        Ok(bracket)
    }

    fn close_interval(&mut self, now: Duration) {
        if self.state != PlaybackState::Playing {
            return;
        }
        let Some(slot) = self.current else {
            return;
        };
        if let Some(seconds) = self.durations[slot].close(now) {
            self.events.push_back(Event::DurationRecorded {
                player: self.id,
                slot,
                seconds,
            });
        }
    }

    fn set_state(&mut self, state: PlaybackState, slot: Option<SlotIndex>) {
        log::info!("{}: {:?} -> {:?} (slot {:?})", self.id, self.state, state, slot);
        self.state = state;
        self.current = slot;
        self.events.push_back(Event::StateChanged {
            player: self.id,
            state,
            slot,
        });
    }

    fn send(&mut self, command: EngineCommand) {
        self.send_all(std::slice::from_ref(&command));
    }

    fn send_all(&mut self, commands: &[EngineCommand]) {
        self.ctx.dispatch(Some(self.id), commands, &mut self.events);
    }
}
