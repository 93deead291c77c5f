use crate::context::PageContext;
use crate::controller::{PlaybackController, Slot};
use auris_ports::stimulus::{ConfigurationError, Stimulus};
use auris_ports::types::{PlayerId, PlayerRole, SlotIndex};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const ABX_SLOT_A: SlotIndex = 0;
pub const ABX_SLOT_B: SlotIndex = 1;
pub const ABX_SLOT_X: SlotIndex = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AbxChoice {
    A,
    B,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbxPlayCounts {
    pub a: usize,
    pub b: usize,
    pub x: Option<usize>,
}

pub struct AbxPlayer {
    controller: PlaybackController,
    answer: Option<AbxChoice>,
}

impl AbxPlayer {
    pub fn new(
        id: PlayerId,
        a: Stimulus,
        b: Stimulus,
        x: Option<Stimulus>,
        ctx: PageContext,
    ) -> Result<Self, ConfigurationError> {
        let mut slots = vec![Slot::new(PlayerRole::AbxA, a), Slot::new(PlayerRole::AbxB, b)];
        if let Some(x) = x {
            slots.push(Slot::new(PlayerRole::AbxX, x));
        }
        Ok(Self {
            controller: PlaybackController::new(id, slots, ctx)?,
            answer: None,
        })
    }

    pub fn with_countdown(mut self, total: Duration) -> Self {
        self.controller = self.controller.with_countdown(total);
        self
    }

    pub fn controller(&self) -> &PlaybackController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut PlaybackController {
        &mut self.controller
    }

    pub fn has_reference(&self) -> bool {
        self.controller.slots().len() > ABX_SLOT_X
    }

    pub fn play_counts(&self) -> AbxPlayCounts {
        AbxPlayCounts {
            a: self.controller.play_count(ABX_SLOT_A),
            b: self.controller.play_count(ABX_SLOT_B),
            x: self
                .has_reference()
                .then(|| self.controller.play_count(ABX_SLOT_X)),
        }
    }

    pub fn choose(&mut self, answer: AbxChoice) {
        self.answer = Some(answer);
    }

    pub fn answer(&self) -> Option<AbxChoice> {
        self.answer
    }
}
