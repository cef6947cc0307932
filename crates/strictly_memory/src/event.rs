//! Outbound events and timer commands.
//!
//! Every session operation returns a [`Step`]: what changed, for the
//! presentation layer, and which timers the host must start or cancel.

use super::card::CardState;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Monotonic session identifier, bumped on every rebuild or restart.
///
/// Timers capture the generation they were scheduled in; callbacks carrying
/// an older generation are discarded.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Default,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(transparent)]
pub struct Generation(u64);

impl Generation {
    /// Returns the raw counter value.
    pub fn get(self) -> u64 {
        self.0
    }

    /// Returns the following generation.
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

/// State changes published to the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    /// A card changed state.
    CardStateChanged {
        /// Board position of the card.
        position: usize,
        /// State after the change.
        state: CardState,
    },
    /// A pair attempt was counted.
    MoveCountChanged {
        /// Moves so far.
        count: u32,
    },
    /// The session clock advanced.
    ClockTicked {
        /// Seconds elapsed.
        seconds: u64,
    },
    /// Every card has been matched.
    SessionCompleted {
        /// Final move count.
        moves: u32,
        /// Final elapsed seconds.
        seconds: u64,
    },
    /// A new board replaced the old one; any completion banner is stale.
    BoardRebuilt {
        /// Rows on the new board.
        rows: usize,
        /// Columns on the new board.
        cols: usize,
        /// Generation of the new session.
        generation: Generation,
    },
}

/// Work the host must perform on its timers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum TimerCommand {
    /// Start the one-second tick source for this generation.
    StartClock {
        /// Generation the ticks belong to.
        generation: Generation,
    },
    /// Stop the tick source.
    StopClock,
    /// Flip the pending mismatched pair back after `after`.
    ScheduleFlipBack {
        /// Generation the flip-back belongs to.
        generation: Generation,
        /// Reveal delay.
        after: Duration,
    },
    /// Cancel every outstanding timer before a new session starts.
    CancelTimers,
}

/// Result of one session operation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Step {
    /// Events to publish, in order.
    pub events: Vec<GameEvent>,
    /// Timer commands to execute, in order.
    pub timers: Vec<TimerCommand>,
}

impl Step {
    /// An operation that changed nothing.
    pub fn none() -> Self {
        Self::default()
    }

    /// Checks whether the operation was a no-op.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty() && self.timers.is_empty()
    }

    pub(crate) fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub(crate) fn schedule(&mut self, command: TimerCommand) {
        self.timers.push(command);
    }
}
