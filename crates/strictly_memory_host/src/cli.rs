//! Command-line interface for strictly_memory.

use clap::Parser;
use std::path::PathBuf;
use strictly_memory_host::GameConfig;

/// Strictly Memory - match the pairs from your terminal
#[derive(Parser, Debug)]
#[command(name = "strictly_memory")]
#[command(about = "Memory-matching game with a deterministic turn engine", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to a TOML game config
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Board size, e.g. 3x4
    #[arg(short, long)]
    pub board: Option<String>,

    /// Fixed shuffle seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Milliseconds a mismatched pair stays face up
    #[arg(long)]
    pub reveal_delay_ms: Option<u64>,

    /// Print events as JSON lines instead of text
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    /// Layers command-line flags over a loaded config.
    pub fn apply(&self, mut config: GameConfig) -> GameConfig {
        if let Some(board) = &self.board {
            config = config.with_board(board.clone());
        }
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        if let Some(delay) = self.reveal_delay_ms {
            config = config.with_reveal_delay_ms(delay);
        }
        config
    }
}
