//! Timer module - auto-drop timing without a wall clock
//!
//! The front end feeds elapsed milliseconds; the timer reports how many full
//! intervals are due. Starting or cancelling always discards accumulated time.

/// Periodic auto-drop timer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DropTimer {
    interval_ms: u32,
    accumulated_ms: u32,
    armed: bool,
}

impl DropTimer {
    /// A stopped timer
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the timer with `interval_ms`, starting from zero elapsed time
    pub fn start(&mut self, interval_ms: u32) {
        self.interval_ms = interval_ms.max(1);
        self.accumulated_ms = 0;
        self.armed = true;
    }

    /// Stop the timer and drop any accumulated time
    pub fn cancel(&mut self) {
        self.accumulated_ms = 0;
        self.armed = false;
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn interval_ms(&self) -> u32 {
        self.interval_ms
    }

    pub fn accumulated_ms(&self) -> u32 {
        self.accumulated_ms
    }

    /// Add elapsed time. Ignored while the timer is not armed.
    pub fn add_elapsed(&mut self, elapsed_ms: u32) {
        if self.armed {
            self.accumulated_ms = self.accumulated_ms.saturating_add(elapsed_ms);
        }
    }

    /// Consume one due interval, if any.
    pub fn consume_tick(&mut self) -> bool {
        if !self.armed || self.accumulated_ms < self.interval_ms {
            return false;
        }
        self.accumulated_ms -= self.interval_ms;
        true
    }
}
