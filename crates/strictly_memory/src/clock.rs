//! Elapsed-time counter for a session.
//!
//! The clock does not measure time itself. A tick source owned by the host
//! calls [`SessionClock::tick`] once per period; the clock only decides
//! whether that tick still counts.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Whether the clock is accepting ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClockStatus {
    /// Not started yet this session.
    Idle,
    /// Counting.
    Running,
    /// Frozen after the session was completed.
    Stopped,
}

/// Seconds elapsed since the first accepted flip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClock {
    seconds: u64,
    status: ClockStatus,
}

impl SessionClock {
    /// Creates an idle clock at zero.
    pub fn new() -> Self {
        Self {
            seconds: 0,
            status: ClockStatus::Idle,
        }
    }

    /// Elapsed seconds.
    pub fn seconds(&self) -> u64 {
        self.seconds
    }

    /// Current status.
    pub fn status(&self) -> ClockStatus {
        self.status
    }

    /// Checks whether ticks are being counted.
    pub fn is_running(&self) -> bool {
        self.status == ClockStatus::Running
    }

    /// Starts counting. Returns `false` if the clock was not idle.
    #[instrument(skip(self))]
    pub fn start(&mut self) -> bool {
        if self.status != ClockStatus::Idle {
            return false;
        }
        self.status = ClockStatus::Running;
        debug!("Clock started");
        true
    }

    /// Stops counting and freezes the elapsed time.
    #[instrument(skip(self), fields(seconds = self.seconds))]
    pub fn stop(&mut self) {
        if self.status == ClockStatus::Running {
            debug!("Clock stopped");
        }
        self.status = ClockStatus::Stopped;
    }

    /// Counts one second. Returns the new total, or `None` if not running.
    pub fn tick(&mut self) -> Option<u64> {
        if !self.is_running() {
            return None;
        }
        self.seconds += 1;
        Some(self.seconds)
    }

    /// Returns to an idle clock at zero.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for SessionClock {
    fn default() -> Self {
        Self::new()
    }
}
