//! The grid of cards owned by a session.

use super::card::{Card, CardState, SymbolId};
use super::layout::BoardConfig;
use serde::{Deserialize, Serialize};

/// Cards in row-major order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    config: BoardConfig,
    cards: Vec<Card>,
}

impl Board {
    /// Lays face-down cards out in the order given.
    pub fn from_layout(config: BoardConfig, layout: Vec<SymbolId>) -> Self {
        let cards = layout
            .into_iter()
            .enumerate()
            .map(|(position, symbol)| Card::new(position, symbol))
            .collect();
        Self { config, cards }
    }

    pub(crate) fn from_cards(config: BoardConfig, cards: Vec<Card>) -> Self {
        Self { config, cards }
    }

    /// Returns the board dimensions.
    pub fn config(&self) -> BoardConfig {
        self.config
    }

    /// Returns all cards.
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Gets the card at a position.
    pub fn get(&self, position: usize) -> Option<&Card> {
        self.cards.get(position)
    }

    /// Number of cards.
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Checks whether the board has no cards.
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Number of cards in the given state.
    pub fn count(&self, state: CardState) -> usize {
        self.cards.iter().filter(|c| c.state() == state).count()
    }

    pub(crate) fn set_state(&mut self, position: usize, state: CardState) {
        if let Some(card) = self.cards.get_mut(position) {
            card.set_state(state);
        }
    }

    /// Formats the board as text: `?` face down, the symbol label otherwise,
    /// matched cards in brackets.
    pub fn display(&self) -> String {
        let cols = self.config.cols().max(1);
        let cells: Vec<String> = self
            .cards
            .iter()
            .map(|card| match card.state() {
                CardState::FaceDown => format!("{:>2}:?", card.position()),
                CardState::FaceUp => format!("{:>2}:{}", card.position(), card.symbol().label()),
                CardState::Matched => {
                    format!("{:>2}:[{}]", card.position(), card.symbol().label())
                }
            })
            .collect();
        let width = cells.iter().map(String::len).max().unwrap_or(0);

        cells
            .chunks(cols)
            .map(|row| {
                row.iter()
                    .map(|cell| format!("{cell:<width$}"))
                    .collect::<Vec<_>>()
                    .join(" | ")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
