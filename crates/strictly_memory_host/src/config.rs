//! Game configuration: TOML file, environment overrides, then CLI flags.

use derive_getters::Getters;
use derive_more::{Display, Error};
use derive_setters::Setters;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use strictly_memory::{BoardConfig, Catalog, MemorySession};
use tracing::{debug, info, instrument};

/// Environment variable overriding the board size.
pub const ENV_BOARD: &str = "MEMORY_BOARD";
/// Environment variable overriding the shuffle seed.
pub const ENV_SEED: &str = "MEMORY_SEED";
/// Environment variable overriding the reveal delay.
pub const ENV_REVEAL_DELAY_MS: &str = "MEMORY_REVEAL_DELAY_MS";

/// Configuration for a hosted memory game.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Setters, Serialize, Deserialize)]
#[setters(prefix = "with_")]
pub struct GameConfig {
    /// Board size in `RxC` notation.
    #[serde(default = "default_board")]
    board: String,

    /// How long a mismatched pair stays face up, in milliseconds.
    #[serde(default = "default_reveal_delay_ms")]
    reveal_delay_ms: u64,

    /// Fixed shuffle seed; OS entropy when absent.
    #[serde(default)]
    #[setters(strip_option)]
    seed: Option<u64>,

    /// Symbol names to deal from; the built-in pictures when absent.
    #[serde(default)]
    #[setters(strip_option)]
    catalog: Option<Vec<String>>,
}

fn default_board() -> String {
    BoardConfig::default().to_string()
}

fn default_reveal_delay_ms() -> u64 {
    strictly_memory::DEFAULT_REVEAL_DELAY.as_millis() as u64
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board: default_board(),
            reveal_delay_ms: default_reveal_delay_ms(),
            seed: None,
            catalog: None,
        }
    }
}

impl GameConfig {
    /// Loads configuration from a TOML file. Missing keys take defaults.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        info!(board = %config.board, "Config loaded successfully");
        Ok(config)
    }

    /// Applies `MEMORY_*` environment variables on top of this config.
    #[instrument(skip(self))]
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides from any key lookup, keyed like the environment.
    pub fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(board) = lookup(ENV_BOARD) {
            debug!(%board, "Board overridden");
            self.board = board;
        }
        if let Some(seed) = lookup(ENV_SEED) {
            self.seed = Some(seed.trim().parse().map_err(|_| {
                ConfigError::new(format!("{} must be an integer, got {:?}", ENV_SEED, seed))
            })?);
        }
        if let Some(delay) = lookup(ENV_REVEAL_DELAY_MS) {
            self.reveal_delay_ms = delay.trim().parse().map_err(|_| {
                ConfigError::new(format!(
                    "{} must be an integer, got {:?}",
                    ENV_REVEAL_DELAY_MS, delay
                ))
            })?;
        }
        Ok(self)
    }

    /// Parses the board size.
    pub fn board_config(&self) -> Result<BoardConfig, ConfigError> {
        self.board
            .parse()
            .map_err(|e| ConfigError::new(format!("Invalid board: {}", e)))
    }

    /// Returns the symbol catalog to deal from.
    pub fn symbol_catalog(&self) -> Catalog {
        match &self.catalog {
            Some(symbols) => Catalog::new(symbols.iter().map(String::as_str)),
            None => Catalog::default(),
        }
    }

    /// Returns the reveal delay.
    pub fn reveal_delay(&self) -> Duration {
        Duration::from_millis(self.reveal_delay_ms)
    }

    /// Builds the session described by this config.
    #[instrument(skip(self), fields(board = %self.board, seed = ?self.seed))]
    pub fn build_session(&self) -> Result<MemorySession, ConfigError> {
        let board = self.board_config()?;
        let catalog = self.symbol_catalog();
        let session = match self.seed {
            Some(seed) => MemorySession::seeded(board, catalog, seed),
            None => MemorySession::new(board, catalog),
        }
        .map_err(|e| ConfigError::new(format!("Cannot build board: {}", e)))?;

        Ok(session.with_reveal_delay(self.reveal_delay()))
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
