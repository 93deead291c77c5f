use auris_ports::types::{PlayerId, PlayerRole, SlotIndex};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Clone, Debug, Default)]
pub struct DurationTracker {
    samples: Vec<f64>,
    start: Option<Duration>,
    end: Option<Duration>,
}

impl DurationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self, now: Duration) {
        self.start = Some(now);
        self.end = None;
    }

    pub fn close(&mut self, now: Duration) -> Option<f64> {
        let start = self.start.take()?;
        let seconds = now.saturating_sub(start).as_secs_f64();
        self.samples.push(seconds);
        self.end = Some(now);
        Some(seconds)
    }

    pub fn reset_interval(&mut self) {
        self.start = None;
        self.end = None;
    }

    pub fn is_open(&self) -> bool {
        self.start.is_some()
    }

    pub fn last_end(&self) -> Option<Duration> {
        self.end
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn total(&self) -> f64 {
        self.samples.iter().sum()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
        self.reset_interval();
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DurationEntry {
    pub player: PlayerId,
    pub slot: SlotIndex,
    pub role: PlayerRole,
    pub samples: Vec<f64>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DurationReport {
    pub entries: Vec<DurationEntry>,
}

impl DurationReport {
    pub fn samples_for(&self, player: PlayerId, slot: SlotIndex) -> Option<&[f64]> {
        self.entries
            .iter()
            .find(|entry| entry.player == player && entry.slot == slot)
            .map(|entry| entry.samples.as_slice())
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
