//! Line-oriented terminal commands and event text.

use derive_more::{Display, Error};
use std::io::Write;
use std::str::FromStr;
use strictly_memory::{BoardConfig, CardState, GameEvent, SessionSnapshot};
use tokio::sync::mpsc;
use tracing::warn;

/// A command typed at the prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleCommand {
    /// `flip <n>`
    Flip(usize),
    /// `rebuild <R>x<C>`
    Rebuild(BoardConfig),
    /// `restart`
    Restart,
    /// `show`
    Show,
    /// `help`
    Help,
    /// `quit`
    Quit,
}

/// Usage text printed by `help`.
pub const HELP: &str = "commands: flip <n> | rebuild <rows>x<cols> | restart | show | help | quit";

/// An unrecognised command line.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("Unrecognised command {line:?} ({reason})")]
pub struct CommandParseError {
    /// The line as typed.
    pub line: String,
    /// What was wrong with it.
    pub reason: String,
}

impl FromStr for ConsoleCommand {
    type Err = CommandParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = |reason: &str| CommandParseError {
            line: s.to_string(),
            reason: reason.to_string(),
        };
        let mut words = s.split_whitespace();
        let verb = words.next().ok_or_else(|| err("empty line"))?;
        let arg = words.next();
        if words.next().is_some() {
            return Err(err("too many arguments"));
        }

        match (verb.to_ascii_lowercase().as_str(), arg) {
            ("flip" | "f", Some(n)) => n
                .parse()
                .map(ConsoleCommand::Flip)
                .map_err(|_| err("position must be a number")),
            ("rebuild" | "size", Some(size)) => size
                .parse()
                .map(ConsoleCommand::Rebuild)
                .map_err(|e| err(&e.to_string())),
            ("restart", None) => Ok(ConsoleCommand::Restart),
            ("show", None) => Ok(ConsoleCommand::Show),
            ("help" | "?", None) => Ok(ConsoleCommand::Help),
            ("quit" | "exit" | "q", None) => Ok(ConsoleCommand::Quit),
            _ => Err(err("see help")),
        }
    }
}

/// Human-readable line for an event, or `None` for events not worth
/// printing on their own.
pub fn describe(event: &GameEvent) -> Option<String> {
    match event {
        GameEvent::CardStateChanged { position, state } => Some(match state {
            CardState::FaceUp => format!("card {position} revealed"),
            CardState::FaceDown => format!("card {position} hidden"),
            CardState::Matched => format!("card {position} matched"),
        }),
        GameEvent::MoveCountChanged { count } => Some(format!("Moves: {count}")),
        GameEvent::ClockTicked { .. } => None,
        GameEvent::SessionCompleted { moves, seconds } => Some(format!(
            "You won! Moves: {moves}, Time: {seconds}s"
        )),
        GameEvent::BoardRebuilt { rows, cols, .. } => {
            Some(format!("New {rows}x{cols} board. Moves: 0, Time: 0s"))
        }
    }
}

/// Board dump with counters, as printed by `show`.
pub fn render_snapshot(snapshot: &SessionSnapshot) -> String {
    let mut text = format!(
        "{}\nMoves: {}  Time: {}s",
        snapshot.display(),
        snapshot.stats().moves,
        snapshot.stats().elapsed_seconds
    );
    if let Some(done) = snapshot.completed() {
        text.push_str(&format!(
            "\nYou won! Moves: {}, Time: {}s",
            done.moves, done.seconds
        ));
    }
    text
}

/// Sole writer of console output.
///
/// Events are drained before notices, so a notice queued after the host
/// published an event always lands after that event's line. Each message is
/// written whole. Returns once both channels are closed.
pub async fn print_output<W: Write>(
    mut events: mpsc::UnboundedReceiver<GameEvent>,
    mut notices: mpsc::UnboundedReceiver<String>,
    json: bool,
    mut out: W,
) -> std::io::Result<()> {
    loop {
        let text = tokio::select! {
            biased;
            Some(event) = events.recv() => {
                let line = if json {
                    serde_json::to_string(&event)
                        .inspect_err(|e| warn!(error = %e, "Failed to encode event"))
                        .ok()
                } else {
                    describe(&event)
                };
                match line {
                    Some(line) => line,
                    None => continue,
                }
            }
            Some(notice) = notices.recv() => notice,
            else => break,
        };
        writeln!(out, "{text}")?;
        out.flush()?;
    }
    Ok(())
}
