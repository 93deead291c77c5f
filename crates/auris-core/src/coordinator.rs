use crate::abx::{AbxChoice, AbxPlayer};
use crate::context::PageContext;
use crate::controller::PlaybackController;
use crate::duration::DurationReport;
use crate::error::CoreError;
use crate::ipc::{Command, Event};
use crate::mushra::MushraPlayer;
use auris_domain_protocol::uses_shared_markers;
use auris_ports::command::EngineCommand;
use auris_ports::playback::PlaybackState;
use auris_ports::stimulus::ConfigurationError;
use auris_ports::types::{PlayerId, SlotIndex};
use std::collections::{HashSet, VecDeque};

pub enum Player {
    Single(PlaybackController),
    Mushra(MushraPlayer),
    Abx(AbxPlayer),
}

impl Player {
    pub fn id(&self) -> PlayerId {
        self.controller().id()
    }

    pub fn controller(&self) -> &PlaybackController {
        match self {
            Self::Single(controller) => controller,
            Self::Mushra(player) => player.controller(),
            Self::Abx(player) => player.controller(),
        }
    }

    pub fn controller_mut(&mut self) -> &mut PlaybackController {
        match self {
            Self::Single(controller) => controller,
            Self::Mushra(player) => player.controller_mut(),
            Self::Abx(player) => player.controller_mut(),
        }
    }

    pub fn is_mushra(&self) -> bool {
        matches!(self, Self::Mushra(_))
    }
}

impl From<PlaybackController> for Player {
    fn from(controller: PlaybackController) -> Self {
        Self::Single(controller)
    }
}

impl From<MushraPlayer> for Player {
    fn from(player: MushraPlayer) -> Self {
        Self::Mushra(player)
    }
}

impl From<AbxPlayer> for Player {
    fn from(player: AbxPlayer) -> Self {
        Self::Abx(player)
    }
}

pub struct PageCoordinator {
    players: Vec<Player>,
    crossfade: bool,
    uses_shared_markers: bool,
    last_active: Option<PlayerId>,
    ctx: PageContext,
    events: VecDeque<Event>,
}

impl PageCoordinator {
    pub fn new(players: Vec<Player>, ctx: PageContext) -> Result<Self, ConfigurationError> {
        if players.is_empty() {
            return Err(ConfigurationError::EmptyPage);
        }
        let mut seen = HashSet::new();
        for player in &players {
            if !seen.insert(player.id()) {
                return Err(ConfigurationError::DuplicatePlayer(player.id().to_string()));
            }
        }

        let uses_shared_markers = uses_shared_markers(
            players
                .iter()
                .flat_map(|player| player.controller().slots())
                .map(|slot| &slot.stimulus),
        );

        let mut page = Self {
            players,
            crossfade: false,
            uses_shared_markers,
            last_active: None,
            ctx,
            events: VecDeque::new(),
        };
        page.sync_selection();
        Ok(page)
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, id: PlayerId) -> Result<&Player, CoreError> {
        self.players
            .iter()
            .find(|player| player.id() == id)
            .ok_or(CoreError::UnknownPlayer(id))
    }

    pub fn player_mut(&mut self, id: PlayerId) -> Result<&mut Player, CoreError> {
        self.players
            .iter_mut()
            .find(|player| player.id() == id)
            .ok_or(CoreError::UnknownPlayer(id))
    }

    pub fn uses_shared_markers(&self) -> bool {
        self.uses_shared_markers
    }

    pub fn crossfade_engaged(&self) -> bool {
        self.crossfade && self.uses_shared_markers
    }

    pub fn last_active(&self) -> Option<PlayerId> {
        self.last_active
    }

    pub fn playing_count(&self) -> usize {
        self.players
            .iter()
            .filter(|player| player.controller().state() == PlaybackState::Playing)
            .count()
    }

    pub fn handle_command(&mut self, cmd: Command) -> Result<(), CoreError> {
        match cmd {
            Command::BeginSession => self.begin_session(),
            Command::Play { player, slot } => self.play(player, slot)?,
            Command::Pause { player } => self.pause(player)?,
            Command::Stop { player } => self.stop(player)?,
            Command::ToggleLoop { player } => {
                self.toggle_loop(player)?;
            }
            Command::SetCrossfade { enabled } => self.set_crossfade(enabled)?,
            Command::SetRating {
                player,
                slot,
                value,
            } => self.set_rating(player, slot, value)?,
            Command::ChooseAnswer { player, answer } => self.choose_answer(player, answer)?,
            Command::Teardown => self.teardown(),
        }
        Ok(())
    }

    pub fn play(&mut self, id: PlayerId, slot: SlotIndex) -> Result<(), CoreError> {
        let index = self.index_of(id)?;
        if slot >= self.players[index].controller().slots().len() {
            return Err(CoreError::SlotOutOfRange { player: id, slot });
        }

        let others: Vec<usize> = (0..self.players.len())
            .filter(|&other| other != index)
            .filter(|&other| self.players[other].controller().state().is_active())
            .collect();

        let result = if self.crossfade_engaged() {
            match others.first() {
                Some(&other) if !self.players[index].controller().state().is_active() => {
                    let paused = self.players[other].controller().state() == PlaybackState::Paused;
                    self.players[other].controller_mut().release();
                    self.absorb(other);
                    self.players[index].controller_mut().take_over(slot, paused)
                }
                _ => self.players[index].controller_mut().play(slot),
            }
        } else {
            for other in others {
                self.players[other].controller_mut().stop();
                self.absorb(other);
            }
            self.players[index].controller_mut().play(slot)
        };
        self.absorb(index);
        result?;
        self.last_active = Some(id);
        self.sync_selection();
        Ok(())
    }

    pub fn pause(&mut self, id: PlayerId) -> Result<(), CoreError> {
        let index = self.index_of(id)?;
        self.players[index].controller_mut().pause();
        self.absorb(index);
        Ok(())
    }

    pub fn stop(&mut self, id: PlayerId) -> Result<(), CoreError> {
        let index = self.index_of(id)?;
        self.players[index].controller_mut().stop();
        self.absorb(index);
        Ok(())
    }

    pub fn toggle_loop(&mut self, id: PlayerId) -> Result<bool, CoreError> {
        let index = self.index_of(id)?;
        let result = self.players[index].controller_mut().toggle_loop();
        self.absorb(index);
        match result {
            Ok(_) => Ok(true),
            Err(CoreError::LoopUnavailable(_)) => Ok(false),
            Err(err) => Err(err),
        }
    }

    pub fn set_crossfade(&mut self, enabled: bool) -> Result<(), CoreError> {
        if enabled && !self.uses_shared_markers {
            return Err(CoreError::CrossfadeUnavailable);
        }
        if self.crossfade == enabled {
            return Ok(());
        }

        if enabled {
            // loop and crossfade do not combine on MUSHRA players
            for index in 0..self.players.len() {
                let player = &mut self.players[index];
                if player.is_mushra() && player.controller().is_looping() {
                    player.controller_mut().toggle_loop()?;
                    self.absorb(index);
                }
            }
        }

        self.crossfade = enabled;
        for player in &mut self.players {
            player.controller_mut().set_crossfade(enabled);
        }
        self.events.push_back(Event::CrossfadeChanged { enabled });
        self.ctx.note(&format!(
            "crossfade {}",
            if enabled { "engaged" } else { "released" }
        ));
        Ok(())
    }

    pub fn set_rating(&mut self, id: PlayerId, slot: SlotIndex, value: u8) -> Result<(), CoreError> {
        match self.player_mut(id)? {
            Player::Mushra(player) => player.set_rating(slot, value)?,
            _ => {
                return Err(CoreError::WrongPlayerKind {
                    player: id,
                    expected: "MUSHRA",
                })
            }
        }
        self.events.push_back(Event::RatingChanged {
            player: id,
            slot,
            value,
        });
        self.ctx
            .note(&format!("{} rate slot {} = {}", id, slot, value));
        Ok(())
    }

    pub fn choose_answer(&mut self, id: PlayerId, answer: AbxChoice) -> Result<(), CoreError> {
        match self.player_mut(id)? {
            Player::Abx(player) => player.choose(answer),
            _ => {
                return Err(CoreError::WrongPlayerKind {
                    player: id,
                    expected: "ABX",
                })
            }
        }
        self.events
            .push_back(Event::AnswerChosen { player: id, answer });
        self.ctx.note(&format!("{} answer {:?}", id, answer));
        Ok(())
    }

    pub fn begin_session(&mut self) {
        for player in &mut self.players {
            player.controller_mut().clear_durations();
        }
        self.events.push_back(Event::SessionStarted);
        self.ctx.note("session started");
    }

    pub fn durations(&self) -> DurationReport {
        DurationReport {
            entries: self
                .players
                .iter()
                .flat_map(|player| player.controller().duration_entries())
                .collect(),
        }
    }

    pub fn tick(&mut self) {
        let now = self.ctx.clock.now();
        for index in 0..self.players.len() {
            self.players[index].controller_mut().poll_countdown(now);
            self.absorb(index);
        }
    }

    // Page unload: stop everything and leave the engine without solos.
    pub fn teardown(&mut self) {
        for index in 0..self.players.len() {
            let controller = self.players[index].controller_mut();
            controller.stop();
            controller.cancel_countdown();
            self.absorb(index);
        }
        let unsolo = [EngineCommand::action(self.ctx.actions.unsolo_all)];
        self.ctx.dispatch(None, &unsolo, &mut self.events);
        self.ctx.note("page closed");
    }

    pub fn drain_events(&mut self) -> Vec<Event> {
        self.events.drain(..).collect()
    }

    fn sync_selection(&mut self) {
        let last_active = self.last_active;
        for player in &mut self.players {
            let selected = !player.is_mushra() && last_active == Some(player.id());
            player.controller_mut().set_selected(selected);
        }
    }

    // keeps page events in the order they happened across players
    fn absorb(&mut self, index: usize) {
        let drained = self.players[index].controller_mut().drain_events();
        self.events.extend(drained);
    }

    fn index_of(&self, id: PlayerId) -> Result<usize, CoreError> {
        self.players
            .iter()
            .position(|player| player.id() == id)
            .ok_or(CoreError::UnknownPlayer(id))
    }
}
