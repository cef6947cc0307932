//! Session statistics and win detection.

use derive_new::new;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

/// Counters shown to the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, new)]
pub struct SessionStats {
    /// Completed pair attempts.
    pub moves: u32,
    /// Seconds since the first flip.
    pub elapsed_seconds: u64,
    /// Cards in the `Matched` state. Never decreases within a session.
    pub matched: usize,
    /// Cards on the board.
    pub total_cards: usize,
}

impl SessionStats {
    /// Fresh counters for a board with `total_cards` cards.
    pub fn for_board(total_cards: usize) -> Self {
        Self::new(0, 0, 0, total_cards)
    }
}

/// Final result of a won session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionCompleted {
    /// Moves taken to clear the board.
    pub moves: u32,
    /// Seconds taken to clear the board.
    pub seconds: u64,
}

/// Decides when every card has been matched.
pub struct WinDetector;

impl WinDetector {
    /// Returns the completion record iff every card on a non-empty board is
    /// matched.
    ///
    /// Called once per successful match, never polled.
    #[instrument]
    pub fn evaluate(stats: &SessionStats) -> Option<SessionCompleted> {
        if stats.total_cards == 0 || stats.matched != stats.total_cards {
            return None;
        }
        info!(
            moves = stats.moves,
            seconds = stats.elapsed_seconds,
            "Board cleared"
        );
        Some(SessionCompleted {
            moves: stats.moves,
            seconds: stats.elapsed_seconds,
        })
    }
}
