//! Pure memory-matching game logic.
//!
//! Cards are dealt face down in shuffled pairs. The player flips two at a
//! time: a matching pair stays revealed, a mismatch is shown for a short
//! reveal delay and then turned back. The board is cleared when every card
//! is matched.
//!
//! # Architecture
//!
//! - **Layout**: board sizing and the shuffled pair sequence
//! - **Session**: the turn cycle, move counting, clock and win detection
//! - **Events**: what the presentation layer is told, and which timers the
//!   host must run
//! - **Invariants**: properties checked after every operation in debug builds
//!
//! The crate does no I/O and keeps no clocks. Timers are requested through
//! [`TimerCommand`] and fed back through [`MemorySession::resolve_mismatch`]
//! and [`MemorySession::tick`], tagged with the [`Generation`] they belong to.
//!
//! # Example
//!
//! ```
//! use strictly_memory::{BoardConfig, Catalog, GameEvent, MemorySession};
//!
//! let mut session = MemorySession::seeded(BoardConfig::new(2, 2), Catalog::default(), 7)?;
//! let step = session.flip(0);
//! assert!(matches!(step.events[0], GameEvent::CardStateChanged { position: 0, .. }));
//! # Ok::<(), strictly_memory::LayoutError>(())
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod board;
mod card;
mod clock;
mod event;
pub mod invariants;
mod layout;
mod session;
mod turn;
mod win;

pub use board::Board;
pub use card::{Card, CardState, SymbolId};
pub use clock::{ClockStatus, SessionClock};
pub use event::{GameEvent, Generation, Step, TimerCommand};
pub use layout::{
    BoardConfig, BoardConfigParseError, Catalog, DEFAULT_COLS, DEFAULT_ROWS, DEFAULT_SYMBOLS,
    LayoutError, MAX_CARDS, build_layout,
};
pub use session::{DEFAULT_REVEAL_DELAY, MemorySession, SessionSnapshot};
pub use turn::TurnState;
pub use win::{SessionCompleted, SessionStats, WinDetector};
