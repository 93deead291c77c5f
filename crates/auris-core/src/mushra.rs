use crate::context::PageContext;
use crate::controller::{PlaybackController, Slot};
use crate::error::CoreError;
use auris_ports::stimulus::{ConfigurationError, Stimulus};
use auris_ports::types::{PlayerId, PlayerRole, SlotIndex};
use std::time::Duration;

pub const MUSHRA_RATING_MAX: u8 = 100;

// Reference in slot 0 (play only), comparisons in slots 1..=N, each rated 0–100.
pub struct MushraPlayer {
    controller: PlaybackController,
    ratings: Vec<Option<u8>>,
}

impl MushraPlayer {
    pub fn new(
        id: PlayerId,
        reference: Stimulus,
        comparisons: Vec<Stimulus>,
        ctx: PageContext,
    ) -> Result<Self, ConfigurationError> {
        if comparisons.is_empty() {
            return Err(ConfigurationError::SlotLayout(format!(
                "{} needs at least one comparison stimulus",
                id
            )));
        }

        let ratings = vec![None; comparisons.len()];
        let mut slots = Vec::with_capacity(comparisons.len() + 1);
        slots.push(Slot::new(PlayerRole::MushraReference, reference));
        slots.extend(
            comparisons
                .into_iter()
                .map(|stimulus| Slot::new(PlayerRole::MushraComparison, stimulus)),
        );

        Ok(Self {
            controller: PlaybackController::new(id, slots, ctx)?,
            ratings,
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

    pub fn comparison_count(&self) -> usize {
        self.ratings.len()
    }

    pub fn set_rating(&mut self, slot: SlotIndex, value: u8) -> Result<(), CoreError> {
        if slot == 0 {
            return Err(CoreError::NotRateable(slot));
        }
        if slot > self.ratings.len() {
            return Err(CoreError::SlotOutOfRange {
                player: self.controller.id(),
                slot,
            });
        }
        if value > MUSHRA_RATING_MAX {
            return Err(CoreError::RatingOutOfRange(value));
        }
        self.ratings[slot - 1] = Some(value);
        Ok(())
    }

    pub fn rating(&self, slot: SlotIndex) -> Option<u8> {
        slot.checked_sub(1)
            .and_then(|index| self.ratings.get(index).copied().flatten())
    }

    pub fn ratings(&self) -> &[Option<u8>] {
        &self.ratings
    }

    pub fn is_complete(&self) -> bool {
        self.ratings.iter().all(Option::is_some)
    }
}
