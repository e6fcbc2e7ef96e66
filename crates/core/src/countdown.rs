//! Countdown clock - whole seconds remaining once the match phase begins

/// One-second countdown driven by elapsed milliseconds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Countdown {
    remaining_secs: u32,
    armed: bool,
    stopped: bool,
    /// Milliseconds accumulated towards the next decrement
    acc_ms: u32,
}

impl Countdown {
    pub fn new(limit_secs: u32) -> Self {
        Self {
            remaining_secs: limit_secs,
            armed: false,
            stopped: false,
            acc_ms: 0,
        }
    }

    /// Start counting; later calls are no-ops
    pub fn arm(&mut self) {
        if !self.stopped {
            self.armed = true;
        }
    }

    pub fn stop(&mut self) {
        self.stopped = true;
        self.armed = false;
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn expired(&self) -> bool {
        self.remaining_secs == 0
    }

    /// Feed elapsed time; returns true on the tick the clock reaches zero
    pub fn tick(&mut self, elapsed_ms: u32) -> bool {
        if !self.armed || self.expired() {
            return false;
        }
        self.acc_ms = self.acc_ms.saturating_add(elapsed_ms);
        while self.acc_ms >= 1000 && self.remaining_secs > 0 {
            self.acc_ms -= 1000;
            self.remaining_secs -= 1;
        }
        if self.expired() {
            self.armed = false;
            return true;
        }
        false
    }
}
