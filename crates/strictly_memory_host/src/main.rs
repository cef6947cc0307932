//! Strictly Memory - terminal driver
//!
//! Reads commands from stdin, forwards them to a session host, and prints
//! the events it publishes.

#![warn(missing_docs)]

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use strictly_memory_host::{
    ConsoleCommand, GameConfig, HELP, HostError, HostHandle, SessionHost, print_output,
    render_snapshot,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Game output owns stdout; logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let config = load_config(&cli)?;
    info!(board = %config.board(), seed = ?config.seed(), "Starting Strictly Memory");

    let session = config.build_session()?;
    let (handle, events, host) = SessionHost::spawn(session);
    let (notices, notice_rx) = mpsc::unbounded_channel();
    let printer = tokio::spawn(print_output(events, notice_rx, cli.json, std::io::stdout()));

    say(&notices, HELP);
    show(&handle, &notices).await?;
    read_commands(&handle, &notices).await?;

    handle.shutdown().ok();
    drop(handle);
    drop(notices);
    host.await?;
    printer.await??;

    info!("Goodbye");
    Ok(())
}

/// Config file (if given), then environment, then flags.
#[instrument(skip_all)]
fn load_config(cli: &Cli) -> Result<GameConfig> {
    let config = match &cli.config {
        Some(path) => GameConfig::from_file(path)?,
        None => GameConfig::default(),
    };
    let config = config.with_env_overrides()?;
    Ok(cli.apply(config))
}

/// Dispatches stdin lines until `quit` or end of input.
async fn read_commands(handle: &HostHandle, notices: &mpsc::UnboundedSender<String>) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let command = match line.parse::<ConsoleCommand>() {
            Ok(command) => command,
            Err(e) => {
                say(notices, e.to_string());
                continue;
            }
        };
        debug!(?command, "Command received");

        match command {
            ConsoleCommand::Flip(position) => handle.flip(position)?,
            ConsoleCommand::Rebuild(config) => match handle.rebuild(config).await {
                Ok(()) => show(handle, notices).await?,
                Err(HostError::Layout(e)) => say(notices, format!("Cannot rebuild: {e}")),
                Err(e) => return Err(e.into()),
            },
            ConsoleCommand::Restart => {
                handle.restart()?;
                show(handle, notices).await?;
            }
            ConsoleCommand::Show => show(handle, notices).await?,
            ConsoleCommand::Help => say(notices, HELP),
            ConsoleCommand::Quit => break,
        }
    }

    Ok(())
}

async fn show(handle: &HostHandle, notices: &mpsc::UnboundedSender<String>) -> Result<()> {
    let snapshot = handle.snapshot().await?;
    say(notices, render_snapshot(&snapshot));
    Ok(())
}

fn say(notices: &mpsc::UnboundedSender<String>, text: impl Into<String>) {
    if notices.send(text.into()).is_err() {
        debug!("Printer stopped, dropping output");
    }
}
