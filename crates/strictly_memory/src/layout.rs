//! Board sizing and shuffled pair layout.
//!
//! Layouts are a pure function of the requested size, the symbol catalog and
//! a random source. Nothing here touches session state, so an invalid size can
//! be rejected before the current board is discarded.

use super::card::SymbolId;
use derive_more::{Display, Error};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::{debug, instrument};

/// Board size used when nothing else is requested.
pub const DEFAULT_ROWS: usize = 3;
/// Board size used when nothing else is requested.
pub const DEFAULT_COLS: usize = 4;

/// Largest board accepted, in cards.
pub const MAX_CARDS: usize = 1024;

/// Asset names shipped with the game.
pub const DEFAULT_SYMBOLS: [&str; 15] = [
    "cake.png",
    "flower.png",
    "boat.png",
    "bouquet.png",
    "branch.png",
    "donuts.png",
    "frying-eggs.png",
    "gift.png",
    "game.png",
    "game2.png",
    "pie.png",
    "soup.png",
    "strings.png",
    "tree.png",
    "whale.png",
];

/// Errors raised when a board cannot be laid out.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum LayoutError {
    /// `rows * cols` is odd, so the cards cannot be split into pairs.
    #[display("Board {rows}x{cols} has an odd number of cards")]
    InvalidSize {
        /// Requested rows.
        rows: usize,
        /// Requested columns.
        cols: usize,
    },

    /// One of the dimensions is zero.
    #[display("Board {rows}x{cols} has no cards")]
    ZeroDimension {
        /// Requested rows.
        rows: usize,
        /// Requested columns.
        cols: usize,
    },

    /// `rows * cols` exceeds [`MAX_CARDS`] or does not fit in a `usize`.
    #[display("Board {rows}x{cols} is larger than {} cards", MAX_CARDS)]
    TooLarge {
        /// Requested rows.
        rows: usize,
        /// Requested columns.
        cols: usize,
    },

    /// The catalog has no symbols to draw from.
    #[display("Symbol catalog is empty")]
    EmptyCatalog,
}

/// Error parsing the `"RxC"` board size notation.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("Board size must look like 3x4, got {input:?}")]
pub struct BoardConfigParseError {
    /// The text that failed to parse.
    pub input: String,
}

/// Requested board dimensions.
///
/// Construction does not validate; [`BoardConfig::validate`] and
/// [`build_layout`] do, so that the caller decides when an invalid request is
/// rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoardConfig {
    rows: usize,
    cols: usize,
}

impl BoardConfig {
    /// Creates a board configuration.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    /// Returns the number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Returns the number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Total number of cards on the board, saturating at `usize::MAX`.
    pub fn total_cards(&self) -> usize {
        self.rows.saturating_mul(self.cols)
    }

    /// Number of pairs on the board (half the card count).
    pub fn pair_count(&self) -> usize {
        self.total_cards() / 2
    }

    /// Checks that the board can be tiled with pairs.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::ZeroDimension`] for an empty board,
    /// [`LayoutError::TooLarge`] past [`MAX_CARDS`], and
    /// [`LayoutError::InvalidSize`] when the card count is odd.
    pub fn validate(&self) -> Result<(), LayoutError> {
        if self.rows == 0 || self.cols == 0 {
            return Err(LayoutError::ZeroDimension {
                rows: self.rows,
                cols: self.cols,
            });
        }
        let total = self
            .rows
            .checked_mul(self.cols)
            .filter(|total| *total <= MAX_CARDS)
            .ok_or(LayoutError::TooLarge {
                rows: self.rows,
                cols: self.cols,
            })?;
        if total % 2 != 0 {
            return Err(LayoutError::InvalidSize {
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(())
    }
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self::new(DEFAULT_ROWS, DEFAULT_COLS)
    }
}

impl std::fmt::Display for BoardConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.rows, self.cols)
    }
}

impl FromStr for BoardConfig {
    type Err = BoardConfigParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || BoardConfigParseError {
            input: s.to_string(),
        };
        let (rows, cols) = s.trim().split_once(['x', 'X']).ok_or_else(err)?;
        let rows = rows.trim().parse().map_err(|_| err())?;
        let cols = cols.trim().parse().map_err(|_| err())?;
        Ok(Self::new(rows, cols))
    }
}

/// Ordered pool of symbols that pairs are drawn from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    symbols: Vec<SymbolId>,
}

impl Catalog {
    /// Creates a catalog from symbol identifiers.
    pub fn new(symbols: impl IntoIterator<Item = impl Into<SymbolId>>) -> Self {
        Self {
            symbols: symbols.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns the symbols in catalog order.
    pub fn symbols(&self) -> &[SymbolId] {
        &self.symbols
    }

    /// Number of symbols in the catalog.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Checks whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Takes `count` symbols in order, cycling the catalog when it runs out.
    pub fn select(&self, count: usize) -> Vec<SymbolId> {
        self.symbols.iter().cycle().take(count).cloned().collect()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new(DEFAULT_SYMBOLS)
    }
}

/// Produces the shuffled symbol sequence for a board, in row-major order.
///
/// Each selected symbol appears exactly twice. When the board needs more
/// pairs than the catalog holds, the catalog is cycled and the same picture
/// may back more than one pair.
///
/// # Errors
///
/// Returns a [`LayoutError`] if the size is not tileable or the catalog is
/// empty.
#[instrument(skip(catalog, rng), fields(size = %config, catalog_len = catalog.len()))]
pub fn build_layout<R>(
    config: &BoardConfig,
    catalog: &Catalog,
    rng: &mut R,
) -> Result<Vec<SymbolId>, LayoutError>
where
    R: Rng + ?Sized,
{
    config.validate()?;
    if catalog.is_empty() {
        return Err(LayoutError::EmptyCatalog);
    }

    let pairs = config.pair_count();
    if pairs > catalog.len() {
        debug!(pairs, "Catalog exhausted, cycling symbols");
    }

    let selected = catalog.select(pairs);
    let mut layout: Vec<SymbolId> = selected
        .iter()
        .chain(selected.iter())
        .cloned()
        .collect();
    layout.shuffle(rng);

    debug!(cards = layout.len(), "Layout built");
    Ok(layout)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashMap;

    fn counts(layout: &[SymbolId]) -> HashMap<&SymbolId, usize> {
        let mut counts = HashMap::new();
        for symbol in layout {
            *counts.entry(symbol).or_insert(0) += 1;
        }
        counts
    }

    #[test]
    fn test_parse_board_size() {
        assert_eq!("3x4".parse::<BoardConfig>(), Ok(BoardConfig::new(3, 4)));
        assert_eq!(" 2X5 ".parse::<BoardConfig>(), Ok(BoardConfig::new(2, 5)));
        assert!("3-4".parse::<BoardConfig>().is_err());
        assert!("x4".parse::<BoardConfig>().is_err());
        assert!("3xfour".parse::<BoardConfig>().is_err());
    }

    #[test]
    fn test_display_round_trips_notation() {
        assert_eq!(BoardConfig::new(4, 4).to_string(), "4x4");
    }

    #[test]
    fn test_odd_board_rejected() {
        let mut rng = StdRng::seed_from_u64(7);
        let result = build_layout(&BoardConfig::new(3, 3), &Catalog::default(), &mut rng);
        assert_eq!(result, Err(LayoutError::InvalidSize { rows: 3, cols: 3 }));
    }

    #[test]
    fn test_zero_board_rejected() {
        let mut rng = StdRng::seed_from_u64(7);
        let result = build_layout(&BoardConfig::new(0, 4), &Catalog::default(), &mut rng);
        assert_eq!(result, Err(LayoutError::ZeroDimension { rows: 0, cols: 4 }));
    }

    #[test]
    fn test_oversized_board_rejected() {
        let mut rng = StdRng::seed_from_u64(7);
        let huge = BoardConfig::new(usize::MAX, 2);
        assert_eq!(
            build_layout(&huge, &Catalog::default(), &mut rng),
            Err(LayoutError::TooLarge {
                rows: usize::MAX,
                cols: 2
            })
        );
        assert_eq!(huge.total_cards(), usize::MAX);
        assert!(BoardConfig::new(100_000, 100_000).validate().is_err());
        assert!(BoardConfig::new(32, 32).validate().is_ok());
        assert!(BoardConfig::new(32, 34).validate().is_err());
    }

    #[test]
    fn test_empty_catalog_rejected() {
        let mut rng = StdRng::seed_from_u64(7);
        let catalog = Catalog::new(Vec::<SymbolId>::new());
        let result = build_layout(&BoardConfig::new(2, 2), &catalog, &mut rng);
        assert_eq!(result, Err(LayoutError::EmptyCatalog));
    }

    #[test]
    fn test_every_symbol_appears_twice() {
        let mut rng = StdRng::seed_from_u64(11);
        let layout = build_layout(&BoardConfig::new(3, 4), &Catalog::default(), &mut rng)
            .expect("3x4 is valid");
        assert_eq!(layout.len(), 12);
        let counts = counts(&layout);
        assert_eq!(counts.len(), 6);
        assert!(counts.values().all(|&n| n == 2));
    }

    #[test]
    fn test_catalog_cycles_when_exhausted() {
        let mut rng = StdRng::seed_from_u64(3);
        let catalog = Catalog::new(["a", "b", "c"]);
        let layout = build_layout(&BoardConfig::new(2, 4), &catalog, &mut rng)
            .expect("2x4 is valid");
        let counts = counts(&layout);
        assert_eq!(counts[&SymbolId::from("a")], 4);
        assert_eq!(counts[&SymbolId::from("b")], 2);
        assert_eq!(counts[&SymbolId::from("c")], 2);
    }

    #[test]
    fn test_same_seed_same_layout() {
        let config = BoardConfig::new(4, 4);
        let a = build_layout(&config, &Catalog::default(), &mut StdRng::seed_from_u64(42));
        let b = build_layout(&config, &Catalog::default(), &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }
}
