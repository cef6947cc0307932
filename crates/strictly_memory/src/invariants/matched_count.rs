//! Matched count invariant: the counter agrees with the board.

use super::Invariant;
use crate::{CardState, MemorySession};

/// Invariant: `stats.matched` equals the number of `Matched` cards and is
/// even.
///
/// Matches are only ever recorded two at a time, so an odd count or a counter
/// drifting from the board means a pair was half-applied.
pub struct MatchedCountInvariant;

impl<R> Invariant<MemorySession<R>> for MatchedCountInvariant {
    fn holds(session: &MemorySession<R>) -> bool {
        let on_board = session.board().count(CardState::Matched);
        let counted = session.stats().matched;
        counted == on_board && counted % 2 == 0 && counted <= session.stats().total_cards
    }

    fn description() -> &'static str {
        "Matched counter agrees with matched cards on the board"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BoardConfig, Catalog};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_new_session_holds() {
        let session = MemorySession::with_rng(
            BoardConfig::new(2, 2),
            Catalog::default(),
            StdRng::seed_from_u64(1),
        )
        .expect("2x2 is valid");
        assert!(MatchedCountInvariant::holds(&session));
    }

    #[test]
    fn test_corrupted_board_violates() {
        let mut session = MemorySession::with_rng(
            BoardConfig::new(2, 2),
            Catalog::default(),
            StdRng::seed_from_u64(1),
        )
        .expect("2x2 is valid");

        // Mark a card matched without counting it
        session.board.set_state(0, CardState::Matched);

        assert!(!MatchedCountInvariant::holds(&session));
    }
}
