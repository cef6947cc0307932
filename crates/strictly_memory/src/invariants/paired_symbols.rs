//! Paired symbols invariant: every picture is on the board an even number of
//! times, and matched cards come in pairs of the same picture.

use super::Invariant;
use crate::{CardState, MemorySession, SymbolId};
use std::collections::HashMap;

/// Invariant: symbol multiplicities are even, overall and among matched
/// cards.
pub struct PairedSymbolsInvariant;

impl<R> Invariant<MemorySession<R>> for PairedSymbolsInvariant {
    fn holds(session: &MemorySession<R>) -> bool {
        let mut all: HashMap<&SymbolId, usize> = HashMap::new();
        let mut matched: HashMap<&SymbolId, usize> = HashMap::new();

        for card in session.board().cards() {
            *all.entry(card.symbol()).or_default() += 1;
            if card.state() == CardState::Matched {
                *matched.entry(card.symbol()).or_default() += 1;
            }
        }

        all.values().chain(matched.values()).all(|n| n % 2 == 0)
    }

    fn description() -> &'static str {
        "Every symbol appears an even number of times"
    }
}
