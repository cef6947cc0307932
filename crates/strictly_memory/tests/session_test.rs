//! Tests for the memory session turn cycle.

use std::collections::HashMap;
use strictly_memory::{
    BoardConfig, CardState, Catalog, DEFAULT_REVEAL_DELAY, GameEvent, LayoutError, MemorySession,
    TimerCommand, TurnState,
};

fn session(rows: usize, cols: usize, seed: u64) -> MemorySession {
    MemorySession::seeded(BoardConfig::new(rows, cols), Catalog::default(), seed)
        .expect("Valid board")
}

/// Groups board positions by symbol.
fn pairs(session: &MemorySession) -> Vec<(usize, usize)> {
    let mut by_symbol: HashMap<String, Vec<usize>> = HashMap::new();
    for card in session.board().cards() {
        by_symbol
            .entry(card.symbol().to_string())
            .or_default()
            .push(card.position());
    }
    let mut pairs: Vec<_> = by_symbol
        .into_values()
        .flat_map(|positions| {
            positions
                .chunks(2)
                .map(|c| (c[0], c[1]))
                .collect::<Vec<_>>()
        })
        .collect();
    pairs.sort();
    pairs
}

fn partner_of(session: &MemorySession, position: usize) -> usize {
    let symbol = session.board().cards()[position].symbol().clone();
    session
        .board()
        .cards()
        .iter()
        .find(|c| c.position() != position && *c.symbol() == symbol)
        .map(|c| c.position())
        .expect("Every card has a partner")
}

fn non_partner_of(session: &MemorySession, position: usize) -> usize {
    let symbol = session.board().cards()[position].symbol().clone();
    session
        .board()
        .cards()
        .iter()
        .find(|c| *c.symbol() != symbol)
        .map(|c| c.position())
        .expect("Board has more than one symbol")
}

#[test]
fn test_two_by_two_scenario() {
    let mut session = session(2, 2, 17);
    assert_eq!(session.board().len(), 4);
    assert_eq!(pairs(&session).len(), 2);

    let partner = partner_of(&session, 0);
    let other = non_partner_of(&session, 0);
    let generation = session.generation();

    // Mismatch: both stay up until the reveal delay elapses
    session.flip(0);
    let step = session.flip(other);
    assert!(step.events.contains(&GameEvent::MoveCountChanged { count: 1 }));
    assert_eq!(
        step.timers,
        vec![TimerCommand::ScheduleFlipBack {
            generation,
            after: DEFAULT_REVEAL_DELAY
        }]
    );
    assert!(session.turn().is_locked());
    assert_eq!(session.board().count(CardState::FaceUp), 2);

    let step = session.resolve_mismatch(generation);
    assert_eq!(
        step.events,
        vec![
            GameEvent::CardStateChanged {
                position: 0,
                state: CardState::FaceDown
            },
            GameEvent::CardStateChanged {
                position: other,
                state: CardState::FaceDown
            },
        ]
    );
    assert_eq!(session.turn(), TurnState::Idle);
    assert_eq!(session.stats().moves, 1);

    // Correct pair resolves immediately
    session.flip(0);
    let step = session.flip(partner);
    assert!(step.timers.is_empty());
    assert_eq!(session.stats().matched, 2);
    assert_eq!(session.stats().moves, 2);
    assert_eq!(session.completed(), None);
    assert!(
        !step
            .events
            .iter()
            .any(|e| matches!(e, GameEvent::SessionCompleted { .. }))
    );

    // Last pair wins
    let remaining: Vec<usize> = session
        .board()
        .cards()
        .iter()
        .filter(|c| c.is_face_down())
        .map(|c| c.position())
        .collect();
    assert_eq!(remaining.len(), 2);
    session.flip(remaining[0]);
    let step = session.flip(remaining[1]);

    let completions: Vec<_> = step
        .events
        .iter()
        .filter(|e| matches!(e, GameEvent::SessionCompleted { .. }))
        .collect();
    assert_eq!(
        completions,
        vec![&GameEvent::SessionCompleted {
            moves: 3,
            seconds: 0
        }]
    );
    assert!(step.timers.contains(&TimerCommand::StopClock));
    assert_eq!(session.stats().matched, 4);
}

#[test]
fn test_locked_turn_refuses_third_flip() {
    let mut session = session(2, 4, 3);
    let other = non_partner_of(&session, 0);
    session.flip(0);
    session.flip(other);

    let third = (0..8).find(|p| *p != 0 && *p != other).expect("Free card");
    let before = session.snapshot();
    assert!(session.flip(third).is_empty());
    assert_eq!(session.snapshot(), before);
}

#[test]
fn test_flip_face_up_card_is_noop() {
    let mut session = session(2, 2, 1);
    session.flip(0);
    let before = session.snapshot();
    assert!(session.flip(0).is_empty());
    assert_eq!(session.snapshot(), before);
}

#[test]
fn test_flip_matched_card_is_noop() {
    let mut session = session(2, 4, 1);
    let partner = partner_of(&session, 0);
    session.flip(0);
    session.flip(partner);

    let before = session.snapshot();
    assert!(session.flip(0).is_empty());
    assert!(session.flip(partner).is_empty());
    assert_eq!(session.snapshot(), before);
}

#[test]
fn test_flip_off_board_is_noop() {
    let mut session = session(2, 2, 1);
    assert!(session.flip(4).is_empty());
    assert!(session.flip(usize::MAX).is_empty());
    assert_eq!(session.board().count(CardState::FaceDown), 4);
}

#[test]
fn test_clock_starts_on_first_flip_only() {
    let mut session = session(2, 4, 8);
    let generation = session.generation();
    let other = non_partner_of(&session, 0);

    let first = session.flip(0);
    assert_eq!(first.timers, vec![TimerCommand::StartClock { generation }]);

    let second = session.flip(other);
    assert!(
        !second
            .timers
            .iter()
            .any(|t| matches!(t, TimerCommand::StartClock { .. }))
    );

    session.resolve_mismatch(generation);
    let again = session.flip(0);
    assert!(again.timers.is_empty());
}

#[test]
fn test_ticks_count_only_while_running() {
    let mut session = session(2, 2, 4);
    let generation = session.generation();

    // Not started yet
    assert!(session.tick(generation).is_empty());

    session.flip(0);
    assert_eq!(
        session.tick(generation).events,
        vec![GameEvent::ClockTicked { seconds: 1 }]
    );
    session.tick(generation);
    assert_eq!(session.stats().elapsed_seconds, 2);
}

#[test]
fn test_completion_freezes_time() {
    let mut session = session(2, 2, 6);
    let generation = session.generation();
    let [(a, b), (c, d)] = <[(usize, usize); 2]>::try_from(pairs(&session)).expect("Two pairs");

    session.flip(a);
    session.tick(generation);
    session.tick(generation);
    session.flip(b);
    session.flip(c);
    let step = session.flip(d);

    assert!(step.events.contains(&GameEvent::SessionCompleted {
        moves: 2,
        seconds: 2
    }));
    assert!(session.tick(generation).is_empty());
    assert_eq!(session.stats().elapsed_seconds, 2);
}

#[test]
fn test_completed_session_ignores_flips() {
    let mut session = session(2, 2, 6);
    for (a, b) in pairs(&session) {
        session.flip(a);
        session.flip(b);
    }
    assert!(session.completed().is_some());
    for position in 0..4 {
        assert!(session.flip(position).is_empty());
    }
}

#[test]
fn test_stale_generation_discarded() {
    let mut session = session(2, 2, 2);
    let old = session.generation();
    let other = non_partner_of(&session, 0);
    session.flip(0);
    session.flip(other);

    session.rebuild(BoardConfig::new(2, 2)).expect("Valid size");
    assert!(session.resolve_mismatch(old).is_empty());
    assert!(session.tick(old).is_empty());
    assert_eq!(session.board().count(CardState::FaceDown), 4);
}

#[test]
fn test_rebuild_while_locked_resets_everything() {
    let mut session = session(2, 4, 12);
    let other = non_partner_of(&session, 0);
    let old = session.generation();
    session.flip(0);
    session.flip(other);
    assert!(session.turn().is_locked());

    let step = session.rebuild(BoardConfig::new(3, 4)).expect("Valid size");
    let new = session.generation();

    assert!(new > old);
    assert_eq!(step.timers, vec![TimerCommand::CancelTimers]);
    assert_eq!(
        step.events,
        vec![GameEvent::BoardRebuilt {
            rows: 3,
            cols: 4,
            generation: new
        }]
    );
    assert_eq!(session.turn(), TurnState::Idle);
    assert_eq!(session.stats().moves, 0);
    assert_eq!(session.stats().matched, 0);
    assert_eq!(session.stats().total_cards, 12);
    assert_eq!(session.board().count(CardState::FaceDown), 12);

    // The clock restarts on the new board's first flip
    let step = session.flip(0);
    assert_eq!(step.timers, vec![TimerCommand::StartClock { generation: new }]);
}

#[test]
fn test_invalid_rebuild_keeps_board() {
    let mut session = session(2, 4, 5);
    session.flip(0);
    let before = session.snapshot();

    let result = session.rebuild(BoardConfig::new(3, 3));
    assert_eq!(result, Err(LayoutError::InvalidSize { rows: 3, cols: 3 }));
    assert_eq!(session.snapshot(), before);
}

#[test]
fn test_oversized_rebuild_keeps_board() {
    let mut session = session(2, 4, 5);
    session.flip(0);
    let before = session.snapshot();

    let overflowing: BoardConfig = format!("{}x2", usize::MAX)
        .parse()
        .expect("Parses as usize");
    assert_eq!(
        session.rebuild(overflowing),
        Err(LayoutError::TooLarge {
            rows: usize::MAX,
            cols: 2
        })
    );
    assert!(session.rebuild(BoardConfig::new(100_000, 100_000)).is_err());
    assert_eq!(session.snapshot(), before);
}

#[test]
fn test_restart_clears_completion() {
    let mut session = session(2, 2, 6);
    for (a, b) in pairs(&session) {
        session.flip(a);
        session.flip(b);
    }
    assert!(session.completed().is_some());

    session.restart().expect("Current size is valid");
    assert_eq!(session.completed(), None);
    assert_eq!(session.board().config(), BoardConfig::new(2, 2));
    assert_eq!(session.board().count(CardState::FaceDown), 4);
}

#[test]
fn test_matched_count_monotonic_over_play() {
    for seed in 0..20 {
        let mut session = session(4, 4, seed);
        let mut last = 0;
        let mut completions = 0;

        // Sweep adjacent pairs until the board is cleared
        for _ in 0..200 {
            let face_down: Vec<usize> = session
                .board()
                .cards()
                .iter()
                .filter(|c| c.is_face_down())
                .map(|c| c.position())
                .collect();
            if face_down.len() < 2 {
                break;
            }
            session.flip(face_down[0]);
            let step = session.flip(face_down[1]);
            completions += step
                .events
                .iter()
                .filter(|e| matches!(e, GameEvent::SessionCompleted { .. }))
                .count();
            session.resolve_mismatch(session.generation());

            let matched = session.stats().matched;
            assert!(matched == last || matched == last + 2);
            last = matched;
        }

        // Clear whatever the sweep left behind
        for (a, b) in pairs(&session) {
            session.flip(a);
            let step = session.flip(b);
            completions += step
                .events
                .iter()
                .filter(|e| matches!(e, GameEvent::SessionCompleted { .. }))
                .count();
        }

        assert_eq!(session.stats().matched, 16);
        assert_eq!(completions, 1, "seed {seed}");
    }
}

#[test]
fn test_custom_reveal_delay_is_scheduled() {
    let delay = std::time::Duration::from_millis(250);
    let mut session = session(2, 2, 9).with_reveal_delay(delay);
    let other = non_partner_of(&session, 0);
    session.flip(0);
    let step = session.flip(other);
    assert!(step.timers.contains(&TimerCommand::ScheduleFlipBack {
        generation: session.generation(),
        after: delay
    }));
}
