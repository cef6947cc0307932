//! The memory session: board, turn cycle, clock and win detection.
//!
//! A session is a plain state machine. It never sleeps and never spawns;
//! every operation returns a [`Step`] describing the events to publish and
//! the timers the host must drive. Timer callbacks come back in through
//! [`MemorySession::resolve_mismatch`] and [`MemorySession::tick`] carrying
//! the [`Generation`] they were scheduled in, and anything from an older
//! generation is dropped.

use super::board::Board;
use super::card::{Card, CardState};
use super::clock::{ClockStatus, SessionClock};
use super::event::{GameEvent, Generation, Step, TimerCommand};
use super::invariants::{InvariantSet, MemoryInvariants};
use super::layout::{BoardConfig, Catalog, LayoutError, build_layout};
use super::turn::TurnState;
use super::win::{SessionCompleted, SessionStats, WinDetector};
use derive_getters::Getters;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// How long a mismatched pair stays face up.
pub const DEFAULT_REVEAL_DELAY: Duration = Duration::from_millis(900);

/// Read-only view of a session for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct SessionSnapshot {
    /// Board dimensions.
    config: BoardConfig,
    /// Current generation.
    generation: Generation,
    /// Cards in row-major order.
    cards: Vec<Card>,
    /// Turn progress.
    turn: TurnState,
    /// Counters.
    stats: SessionStats,
    /// Clock status.
    clock: ClockStatus,
    /// Final result, once the board is cleared.
    completed: Option<SessionCompleted>,
}

impl SessionSnapshot {
    /// Formats the captured board as text.
    pub fn display(&self) -> String {
        Board::from_cards(self.config, self.cards.clone()).display()
    }
}

/// One game of memory on one board.
#[derive(Debug, Clone)]
pub struct MemorySession<R = StdRng> {
    pub(crate) board: Board,
    pub(crate) turn: TurnState,
    pub(crate) stats: SessionStats,
    pub(crate) clock: SessionClock,
    generation: Generation,
    completed: Option<SessionCompleted>,
    catalog: Catalog,
    reveal_delay: Duration,
    rng: R,
}

impl MemorySession<StdRng> {
    /// Creates a session shuffled from OS entropy.
    ///
    /// # Errors
    ///
    /// Returns a [`LayoutError`] if the board cannot be laid out.
    #[instrument(skip(catalog), fields(size = %config))]
    pub fn new(config: BoardConfig, catalog: Catalog) -> Result<Self, LayoutError> {
        Self::with_rng(config, catalog, StdRng::from_os_rng())
    }

    /// Creates a session with a reproducible shuffle.
    ///
    /// # Errors
    ///
    /// Returns a [`LayoutError`] if the board cannot be laid out.
    #[instrument(skip(catalog), fields(size = %config))]
    pub fn seeded(config: BoardConfig, catalog: Catalog, seed: u64) -> Result<Self, LayoutError> {
        Self::with_rng(config, catalog, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> MemorySession<R> {
    /// Creates a session drawing shuffles from `rng`.
    ///
    /// # Errors
    ///
    /// Returns a [`LayoutError`] if the board cannot be laid out.
    #[instrument(skip(catalog, rng), fields(size = %config))]
    pub fn with_rng(config: BoardConfig, catalog: Catalog, mut rng: R) -> Result<Self, LayoutError> {
        let layout = build_layout(&config, &catalog, &mut rng)?;
        let board = Board::from_layout(config, layout);
        info!(cards = board.len(), "Session created");

        Ok(Self {
            stats: SessionStats::for_board(board.len()),
            board,
            turn: TurnState::Idle,
            clock: SessionClock::new(),
            generation: Generation::default(),
            completed: None,
            catalog,
            reveal_delay: DEFAULT_REVEAL_DELAY,
            rng,
        })
    }

    /// Replaces the board with a freshly shuffled one of a new size.
    ///
    /// The new layout is built before anything is discarded, so on error the
    /// current board, turn and counters are left exactly as they were. On
    /// success every outstanding timer is cancelled and the generation moves
    /// on, which also makes any in-flight callback stale. Safe to call while
    /// a mismatch is pending.
    ///
    /// # Errors
    ///
    /// Returns a [`LayoutError`] if the new size cannot be laid out.
    #[instrument(skip(self), fields(generation = %self.generation, size = %config))]
    pub fn rebuild(&mut self, config: BoardConfig) -> Result<Step, LayoutError> {
        let layout = build_layout(&config, &self.catalog, &mut self.rng).inspect_err(|e| {
            warn!(error = %e, "Rebuild rejected, keeping current board");
        })?;

        let mut step = Step::none();
        step.schedule(TimerCommand::CancelTimers);

        self.generation = self.generation.next();
        self.board = Board::from_layout(config, layout);
        self.turn = TurnState::Idle;
        self.stats = SessionStats::for_board(self.board.len());
        self.clock.reset();
        self.completed = None;

        step.emit(GameEvent::BoardRebuilt {
            rows: config.rows(),
            cols: config.cols(),
            generation: self.generation,
        });

        info!(new_generation = %self.generation, cards = self.board.len(), "Board rebuilt");
        self.check_invariants();
        Ok(step)
    }

    /// Starts over on a reshuffled board of the current size.
    ///
    /// # Errors
    ///
    /// Only fails if the current size could not be laid out again, which a
    /// session built successfully never hits.
    #[instrument(skip(self), fields(generation = %self.generation))]
    pub fn restart(&mut self) -> Result<Step, LayoutError> {
        self.rebuild(self.board.config())
    }
}

impl<R> MemorySession<R> {
    /// Overrides the reveal delay for mismatched pairs.
    pub fn with_reveal_delay(mut self, delay: Duration) -> Self {
        self.reveal_delay = delay;
        self
    }

    /// Handles a flip intent on the card at `position`.
    ///
    /// Silently ignored (empty step) when the turn is locked, the position is
    /// off the board, the card is not face down, or the board is cleared.
    #[instrument(skip(self), fields(generation = %self.generation, turn = ?self.turn))]
    pub fn flip(&mut self, position: usize) -> Step {
        if self.completed.is_some() {
            debug!("Flip ignored, session completed");
            return Step::none();
        }
        if self.turn.is_locked() {
            debug!("Flip ignored, turn locked");
            return Step::none();
        }
        match self.board.get(position) {
            None => {
                debug!("Flip ignored, position off the board");
                return Step::none();
            }
            Some(card) if !card.is_face_down() => {
                debug!(state = %card.state(), "Flip ignored, card not face down");
                return Step::none();
            }
            Some(_) => {}
        }

        let mut step = Step::none();
        self.board.set_state(position, CardState::FaceUp);
        step.emit(GameEvent::CardStateChanged {
            position,
            state: CardState::FaceUp,
        });

        match self.turn {
            TurnState::Idle => {
                self.turn = TurnState::OneFlipped { first: position };
                if self.clock.start() {
                    step.schedule(TimerCommand::StartClock {
                        generation: self.generation,
                    });
                }
            }
            TurnState::OneFlipped { first } => {
                self.turn = TurnState::Resolving {
                    first,
                    second: position,
                };
                self.stats.moves += 1;
                step.emit(GameEvent::MoveCountChanged {
                    count: self.stats.moves,
                });
                self.evaluate_pair(first, position, &mut step);
            }
            TurnState::Resolving { .. } => {}
        }

        self.check_invariants();
        step
    }

    /// Flips a mismatched pair back face down once its reveal delay elapsed.
    ///
    /// Ignored if `generation` is stale or no mismatch is pending.
    #[instrument(skip(self), fields(current = %self.generation))]
    pub fn resolve_mismatch(&mut self, generation: Generation) -> Step {
        if generation != self.generation {
            debug!("Stale flip-back discarded");
            return Step::none();
        }
        let TurnState::Resolving { first, second } = self.turn else {
            debug!("No mismatch pending");
            return Step::none();
        };

        let mut step = Step::none();
        for position in [first, second] {
            self.board.set_state(position, CardState::FaceDown);
            step.emit(GameEvent::CardStateChanged {
                position,
                state: CardState::FaceDown,
            });
        }
        self.turn = TurnState::Idle;

        debug!(first, second, "Mismatch flipped back");
        self.check_invariants();
        step
    }

    /// Counts one clock period.
    ///
    /// Ignored if `generation` is stale or the clock is not running.
    pub fn tick(&mut self, generation: Generation) -> Step {
        if generation != self.generation {
            debug!(%generation, current = %self.generation, "Stale tick discarded");
            return Step::none();
        }
        let Some(seconds) = self.clock.tick() else {
            return Step::none();
        };
        self.stats.elapsed_seconds = seconds;

        let mut step = Step::none();
        step.emit(GameEvent::ClockTicked { seconds });
        step
    }

    fn evaluate_pair(&mut self, first: usize, second: usize, step: &mut Step) {
        let is_match = match (self.board.get(first), self.board.get(second)) {
            (Some(a), Some(b)) => a.pairs_with(b),
            _ => false,
        };

        if !is_match {
            debug!(first, second, "Mismatch, scheduling flip-back");
            step.schedule(TimerCommand::ScheduleFlipBack {
                generation: self.generation,
                after: self.reveal_delay,
            });
            return;
        }

        for position in [first, second] {
            self.board.set_state(position, CardState::Matched);
            step.emit(GameEvent::CardStateChanged {
                position,
                state: CardState::Matched,
            });
        }
        self.stats.matched += 2;
        self.turn = TurnState::Idle;
        debug!(first, second, matched = self.stats.matched, "Pair matched");

        if let Some(done) = WinDetector::evaluate(&self.stats) {
            self.clock.stop();
            self.completed = Some(done);
            step.schedule(TimerCommand::StopClock);
            step.emit(GameEvent::SessionCompleted {
                moves: done.moves,
                seconds: done.seconds,
            });
        }
    }

    fn check_invariants(&self) {
        if !cfg!(debug_assertions) {
            return;
        }
        if let Err(violations) = MemoryInvariants::check_all(self) {
            for violation in &violations {
                warn!(invariant = %violation.description, "Session invariant violated");
            }
            debug_assert!(violations.is_empty(), "Session invariants violated: {violations:?}");
        }
    }

    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the turn progress.
    pub fn turn(&self) -> TurnState {
        self.turn
    }

    /// Returns the counters.
    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    /// Returns the clock.
    pub fn clock(&self) -> &SessionClock {
        &self.clock
    }

    /// Returns the current generation.
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Returns the final result once the board is cleared.
    pub fn completed(&self) -> Option<SessionCompleted> {
        self.completed
    }

    /// Returns the symbol catalog.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Returns the reveal delay.
    pub fn reveal_delay(&self) -> Duration {
        self.reveal_delay
    }

    /// Captures the state for rendering.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            config: self.board.config(),
            generation: self.generation,
            cards: self.board.cards().to_vec(),
            turn: self.turn,
            stats: self.stats,
            clock: self.clock.status(),
            completed: self.completed,
        }
    }
}
