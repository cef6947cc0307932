//! Face-up picks invariant: revealed unmatched cards are exactly the picks.

use super::Invariant;
use crate::{CardState, MemorySession};

/// Invariant: the cards in `FaceUp` are exactly the turn's picks.
///
/// At most two cards can be revealed without being matched, and each of
/// them must be one the turn is tracking.
pub struct FaceUpPicksInvariant;

impl<R> Invariant<MemorySession<R>> for FaceUpPicksInvariant {
    fn holds(session: &MemorySession<R>) -> bool {
        let picks = session.turn().picks();
        let face_up: Vec<usize> = session
            .board()
            .cards()
            .iter()
            .filter(|c| c.state() == CardState::FaceUp)
            .map(|c| c.position())
            .collect();

        face_up.len() == picks.len() && picks.iter().all(|p| face_up.contains(p))
    }

    fn description() -> &'static str {
        "Face-up cards are exactly the current picks"
    }
}
