//! Core domain types for memory cards.

use serde::{Deserialize, Serialize};

/// Identifier of the picture printed on a card face (e.g. `"cake.png"`).
///
/// The engine only compares identifiers; resolving them to assets is the
/// presentation layer's concern.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::From,
)]
#[serde(transparent)]
pub struct SymbolId(String);

impl SymbolId {
    /// Creates a symbol identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the identifier without its file extension, suitable as alt text.
    pub fn label(&self) -> &str {
        match self.0.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => stem,
            _ => &self.0,
        }
    }
}

impl From<&str> for SymbolId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Visible state of a card.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CardState {
    /// Hidden; the only state a card can be flipped from.
    FaceDown,
    /// Revealed and waiting for its pair to resolve.
    FaceUp,
    /// Paired correctly; stays revealed until the board is rebuilt.
    Matched,
}

/// A single tile on the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    /// Row-major board position.
    position: usize,
    /// Picture on the card face.
    symbol: SymbolId,
    /// Current visible state.
    state: CardState,
}

impl Card {
    /// Creates a face-down card.
    pub fn new(position: usize, symbol: SymbolId) -> Self {
        Self {
            position,
            symbol,
            state: CardState::FaceDown,
        }
    }

    /// Returns the board position.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Returns the symbol identifier.
    pub fn symbol(&self) -> &SymbolId {
        &self.symbol
    }

    /// Returns the current state.
    pub fn state(&self) -> CardState {
        self.state
    }

    /// Checks whether the card can be picked.
    pub fn is_face_down(&self) -> bool {
        self.state == CardState::FaceDown
    }

    /// Checks whether two cards show the same picture.
    pub fn pairs_with(&self, other: &Card) -> bool {
        self.symbol == other.symbol
    }

    pub(crate) fn set_state(&mut self, state: CardState) {
        self.state = state;
    }
}
