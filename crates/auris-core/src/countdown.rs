use std::time::Duration;

// Deadline based; the page's tick() polls it with the current time.
#[derive(Clone, Debug)]
pub struct CountdownTimer {
    total: Duration,
    remaining: Duration,
    deadline: Option<Duration>,
    paused: bool,
    fired: bool,
}

impl CountdownTimer {
    pub fn new(total: Duration) -> Self {
        Self {
            total,
            remaining: total,
            deadline: None,
            paused: false,
            fired: false,
        }
    }

    // Continues a paused countdown that still has time left; anything else
    // starts over with the full total, including a countdown that is running.
    pub fn start_or_resume(&mut self, now: Duration) {
        if self.paused && !self.remaining.is_zero() {
            self.resume(now);
            return;
        }
        self.remaining = self.total;
        self.paused = false;
        self.fired = false;
        self.deadline = Some(now.saturating_add(self.total));
    }

    pub fn resume(&mut self, now: Duration) {
        if !self.paused {
            return;
        }
        self.paused = false;
        self.deadline = Some(now.saturating_add(self.remaining));
    }

    pub fn pause(&mut self, now: Duration) {
        if let Some(deadline) = self.deadline.take() {
            self.remaining = deadline.saturating_sub(now);
            self.paused = true;
        }
    }

    pub fn stop(&mut self) {
        self.deadline = None;
        self.paused = false;
        self.remaining = self.total;
        self.fired = false;
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
        self.paused = false;
    }

    /// Returns true exactly once, on the poll that crosses the deadline.
    pub fn poll(&mut self, now: Duration) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                self.remaining = Duration::ZERO;
                self.fired = true;
                true
            }
            _ => false,
        }
    }

    pub fn is_running(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn has_fired(&self) -> bool {
        self.fired
    }

    pub fn total(&self) -> Duration {
        self.total
    }

    pub fn remaining(&self, now: Duration) -> Duration {
        match self.deadline {
            Some(deadline) => deadline.saturating_sub(now),
            None => self.remaining,
        }
    }
}
