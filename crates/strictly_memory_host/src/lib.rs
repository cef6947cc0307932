//! Async host for the memory game.
//!
//! Wraps a [`strictly_memory::MemorySession`] in a tokio actor that runs the
//! reveal-delay and clock timers, and adds configuration loading and the
//! terminal command language used by the `strictly_memory` binary.
//!
//! # Example
//!
//! ```no_run
//! use strictly_memory_host::{GameConfig, SessionHost};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = GameConfig::default();
//! let (handle, mut events, _task) = SessionHost::spawn(config.build_session()?);
//! handle.flip(0)?;
//! let first = events.recv().await;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod console;
mod error;
mod host;

pub use config::{ConfigError, ENV_BOARD, ENV_REVEAL_DELAY_MS, ENV_SEED, GameConfig};
pub use console::{
    CommandParseError, ConsoleCommand, HELP, describe, print_output, render_snapshot,
};
pub use error::HostError;
pub use host::{CLOCK_PERIOD, HostHandle, SessionHost};
