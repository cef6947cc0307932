//! Pick cycle of a single turn.

use serde::{Deserialize, Serialize};

/// Where the current turn stands.
///
/// Picks are board positions: the turn refers to cards, the board owns them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum TurnState {
    /// No card picked.
    #[default]
    Idle,
    /// First card is face up.
    OneFlipped {
        /// Position of the first pick.
        first: usize,
    },
    /// Two mismatched cards are face up, waiting for the reveal delay.
    Resolving {
        /// Position of the first pick.
        first: usize,
        /// Position of the second pick.
        second: usize,
    },
}

impl TurnState {
    /// Checks whether further flips are refused.
    pub fn is_locked(&self) -> bool {
        matches!(self, TurnState::Resolving { .. })
    }

    /// Position of the first pick, if any.
    pub fn first_pick(&self) -> Option<usize> {
        match self {
            TurnState::Idle => None,
            TurnState::OneFlipped { first } | TurnState::Resolving { first, .. } => Some(*first),
        }
    }

    /// Position of the second pick, if any.
    pub fn second_pick(&self) -> Option<usize> {
        match self {
            TurnState::Resolving { second, .. } => Some(*second),
            _ => None,
        }
    }

    /// Positions currently held by the turn.
    pub fn picks(&self) -> Vec<usize> {
        self.first_pick().into_iter().chain(self.second_pick()).collect()
    }
}
