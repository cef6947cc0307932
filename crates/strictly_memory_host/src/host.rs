//! Async host owning one memory session and its timers.
//!
//! The host is an actor: commands from [`HostHandle`]s and callbacks from
//! timer tasks share one inbox, so the session only ever sees one operation
//! at a time. Timer tasks are tracked by [`JoinHandle`] and aborted when the
//! session asks for it; any callback that still slips through carries an old
//! [`Generation`] and is dropped by the session.

use crate::error::HostError;
use std::time::Duration;
use strictly_memory::{
    BoardConfig, GameEvent, Generation, LayoutError, MemorySession, SessionSnapshot, Step,
    TimerCommand,
};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, instrument, warn};

/// Period of the session clock. Each tick counts one second.
pub const CLOCK_PERIOD: Duration = Duration::from_secs(1);

/// Messages processed by the host, in arrival order.
#[derive(Debug)]
enum HostMessage {
    Flip(usize),
    Rebuild {
        config: BoardConfig,
        reply: oneshot::Sender<Result<(), LayoutError>>,
    },
    Restart,
    Snapshot(oneshot::Sender<SessionSnapshot>),
    FlipBack(Generation),
    Tick(Generation),
    Shutdown,
}

/// Cloneable handle for sending intents to a running host.
#[derive(Debug, Clone)]
pub struct HostHandle {
    inbox: mpsc::UnboundedSender<HostMessage>,
}

impl HostHandle {
    /// Sends a flip intent. Ignored flips produce no events.
    #[instrument(skip(self))]
    pub fn flip(&self, position: usize) -> Result<(), HostError> {
        self.send(HostMessage::Flip(position))
    }

    /// Replaces the board with one of a new size.
    ///
    /// Resolves once the host has applied or rejected the request.
    #[instrument(skip(self), fields(size = %config))]
    pub async fn rebuild(&self, config: BoardConfig) -> Result<(), HostError> {
        let (reply, response) = oneshot::channel();
        self.send(HostMessage::Rebuild { config, reply })?;
        response.await.map_err(|_| HostError::Closed)??;
        Ok(())
    }

    /// Reshuffles the current board size and resets the counters.
    #[instrument(skip(self))]
    pub fn restart(&self) -> Result<(), HostError> {
        self.send(HostMessage::Restart)
    }

    /// Captures the session state.
    pub async fn snapshot(&self) -> Result<SessionSnapshot, HostError> {
        let (reply, response) = oneshot::channel();
        self.send(HostMessage::Snapshot(reply))?;
        response.await.map_err(|_| HostError::Closed)
    }

    /// Stops the host and cancels its timers.
    #[instrument(skip(self))]
    pub fn shutdown(&self) -> Result<(), HostError> {
        self.send(HostMessage::Shutdown)
    }

    fn send(&self, message: HostMessage) -> Result<(), HostError> {
        self.inbox.send(message).map_err(|_| HostError::Closed)
    }
}

/// Actor that drives a [`MemorySession`] in real time.
pub struct SessionHost {
    session: MemorySession,
    inbox: mpsc::UnboundedReceiver<HostMessage>,
    // Weak so that dropping every handle closes the inbox
    loopback: mpsc::WeakUnboundedSender<HostMessage>,
    events: mpsc::UnboundedSender<GameEvent>,
    clock_task: Option<JoinHandle<()>>,
    flip_back_task: Option<JoinHandle<()>>,
}

impl SessionHost {
    /// Starts a host on the current tokio runtime.
    ///
    /// Returns the command handle, the event stream, and the host task. The
    /// host stops on [`HostHandle::shutdown`] or once every handle is dropped.
    #[instrument(skip(session), fields(generation = %session.generation()))]
    pub fn spawn(
        session: MemorySession,
    ) -> (HostHandle, mpsc::UnboundedReceiver<GameEvent>, JoinHandle<()>) {
        let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        let host = Self {
            session,
            inbox: inbox_rx,
            loopback: inbox_tx.downgrade(),
            events: events_tx,
            clock_task: None,
            flip_back_task: None,
        };
        let task = tokio::spawn(host.run());

        (HostHandle { inbox: inbox_tx }, events_rx, task)
    }

    async fn run(mut self) {
        info!(
            cards = self.session.board().len(),
            reveal_delay = ?self.session.reveal_delay(),
            "Session host started"
        );

        while let Some(message) = self.inbox.recv().await {
            match message {
                HostMessage::Flip(position) => {
                    let step = self.session.flip(position);
                    self.apply(step);
                }
                HostMessage::Rebuild { config, reply } => {
                    let result = match self.session.rebuild(config) {
                        Ok(step) => {
                            self.apply(step);
                            Ok(())
                        }
                        Err(e) => Err(e),
                    };
                    if reply.send(result).is_err() {
                        debug!("Rebuild requester went away");
                    }
                }
                HostMessage::Restart => match self.session.restart() {
                    Ok(step) => self.apply(step),
                    Err(e) => warn!(error = %e, "Restart failed"),
                },
                HostMessage::Snapshot(reply) => {
                    if reply.send(self.session.snapshot()).is_err() {
                        debug!("Snapshot requester went away");
                    }
                }
                HostMessage::FlipBack(generation) => {
                    let step = self.session.resolve_mismatch(generation);
                    self.apply(step);
                }
                HostMessage::Tick(generation) => {
                    let step = self.session.tick(generation);
                    self.apply(step);
                }
                HostMessage::Shutdown => {
                    info!("Shutdown requested");
                    break;
                }
            }
        }

        self.cancel_timers();
        info!("Session host stopped");
    }

    fn apply(&mut self, step: Step) {
        for command in step.timers {
            self.execute(command);
        }
        for event in step.events {
            if let Err(unsent) = self.events.send(event) {
                debug!(event = ?unsent.0, "No event listener");
            }
        }
    }

    #[instrument(skip(self))]
    fn execute(&mut self, command: TimerCommand) {
        match command {
            TimerCommand::StartClock { generation } => {
                abort(self.clock_task.take());
                self.clock_task = Some(self.spawn_clock(generation));
            }
            TimerCommand::StopClock => abort(self.clock_task.take()),
            TimerCommand::ScheduleFlipBack { generation, after } => {
                abort(self.flip_back_task.take());
                self.flip_back_task = Some(self.spawn_flip_back(generation, after));
            }
            TimerCommand::CancelTimers => self.cancel_timers(),
        }
    }

    fn cancel_timers(&mut self) {
        abort(self.clock_task.take());
        abort(self.flip_back_task.take());
    }

    fn spawn_clock(&self, generation: Generation) -> JoinHandle<()> {
        let loopback = self.loopback.clone();

        tokio::spawn(async move {
            let mut interval =
                tokio::time::interval_at(Instant::now() + CLOCK_PERIOD, CLOCK_PERIOD);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                let Some(inbox) = loopback.upgrade() else {
                    break;
                };
                if inbox.send(HostMessage::Tick(generation)).is_err() {
                    break;
                }
            }
        })
    }

    fn spawn_flip_back(&self, generation: Generation, after: Duration) -> JoinHandle<()> {
        let loopback = self.loopback.clone();

        tokio::spawn(async move {
            tokio::time::sleep(after).await;
            let Some(inbox) = loopback.upgrade() else {
                debug!(%generation, "Host gone before flip-back");
                return;
            };
            if inbox.send(HostMessage::FlipBack(generation)).is_err() {
                debug!(%generation, "Flip-back dropped, host stopped");
            }
        })
    }
}

fn abort(task: Option<JoinHandle<()>>) {
    if let Some(task) = task {
        task.abort();
    }
}
