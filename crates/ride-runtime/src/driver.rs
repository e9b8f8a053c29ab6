//! Async ride driver.
//!
//! [`RideDriver`] owns one [`RideSession`] inside a dedicated tokio task. The
//! task multiplexes user commands and tick signals with `select!`, so every
//! session operation (including an auto-stop raised from a tick) runs to
//! completion before the next message is looked at. Render events are
//! forwarded through an `mpsc` channel so the presentation layer never shares
//! mutable state with the session.

use ride_core::config::RideConfig;
use ride_core::error::{Result, RideError};
use ride_core::models::RenderEvent;
use ride_core::session::{Renderer, RideSession, TickSource};
use tokio::sync::mpsc;

use crate::ticker::{IntervalTicker, TickSignal, TICK_BUFFER};

/// Buffer for command and render-event channels.
const CHANNEL_BUFFER: usize = 64;

// ── Public types ──────────────────────────────────────────────────────────────

/// A request sent to a running driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RideCommand {
    Start,
    /// Start a ride that stops itself once this many seconds have elapsed.
    StartFor(u64),
    Stop,
    /// Stop any live ticker and exit the driver task.
    Shutdown,
}

/// Render events collected during one session operation.
#[derive(Debug, Default)]
pub struct EventBuffer {
    events: Vec<RenderEvent>,
}

impl EventBuffer {
    pub fn drain(&mut self) -> std::vec::Drain<'_, RenderEvent> {
        self.events.drain(..)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl Renderer for EventBuffer {
    fn render(&mut self, event: &RenderEvent) {
        self.events.push(event.clone());
    }
}

// ── RideDriver ────────────────────────────────────────────────────────────────

/// Background owner of a single ride session.
pub struct RideDriver<T = IntervalTicker> {
    config: RideConfig,
    ticker: T,
    ticks: mpsc::Receiver<TickSignal>,
}

impl RideDriver {
    pub fn new(config: RideConfig) -> Self {
        let (ticker, ticks) = IntervalTicker::channel(TICK_BUFFER);
        Self::with_ticker(config, ticker, ticks)
    }
}

impl<T> RideDriver<T>
where
    T: TickSource + Send + 'static,
    T::Handle: Send,
{
    /// Build a driver around `ticker`, whose signals arrive on `ticks`.
    pub fn with_ticker(config: RideConfig, ticker: T, ticks: mpsc::Receiver<TickSignal>) -> Self {
        Self {
            config,
            ticker,
            ticks,
        }
    }

    /// Spawn the driver task.
    ///
    /// Returns a [`RideController`] for sending commands, the receiver of
    /// render events, and a [`DriverHandle`] for the task itself.
    pub fn start(self) -> (RideController, mpsc::Receiver<RenderEvent>, DriverHandle) {
        let (cmd_tx, cmd_rx) = mpsc::channel(CHANNEL_BUFFER);
        let (event_tx, event_rx) = mpsc::channel(CHANNEL_BUFFER);

        let handle = tokio::spawn(async move {
            self.run(cmd_rx, event_tx).await;
        });

        (
            RideController { tx: cmd_tx },
            event_rx,
            DriverHandle { handle },
        )
    }

    // ── Private implementation ────────────────────────────────────────────

    /// Main loop. Exits on `Shutdown`, when every controller is dropped, or
    /// when the event receiver is gone.
    async fn run(
        self,
        mut commands: mpsc::Receiver<RideCommand>,
        events: mpsc::Sender<RenderEvent>,
    ) {
        let RideDriver {
            config,
            ticker,
            mut ticks,
        } = self;
        let mut session = RideSession::new(config, ticker, EventBuffer::default());
        let mut stop_at: Option<u64> = None;

        tracing::debug!(max_seconds = config.max_seconds, "ride driver running");

        loop {
            tokio::select! {
                command = commands.recv() => match command {
                    Some(RideCommand::Start) => {
                        session.start();
                    }
                    Some(RideCommand::StartFor(seconds)) => {
                        if session.start() {
                            stop_at = Some(seconds);
                        }
                    }
                    Some(RideCommand::Stop) => {
                        session.stop();
                    }
                    Some(RideCommand::Shutdown) | None => break,
                },
                Some(signal) = ticks.recv() => {
                    apply_tick(&mut session, signal);
                }
            }
            stop_at = enforce_stop_at(&mut session, stop_at);

            if !forward_events(session.renderer_mut(), &events).await {
                tracing::warn!("render receiver dropped; stopping ride driver");
                break;
            }
        }

        if session.is_riding() {
            tracing::info!(
                ride_id = session.ride_id(),
                elapsed_seconds = session.elapsed_seconds(),
                "driver exiting; abandoning ride in progress"
            );
        }
        // Dropping the session cancels any live ticker.
    }
}

/// Apply a tick signal if it belongs to the ride in progress.
///
/// Returns `false` for signals from a ride that has already ended; those can
/// still be sitting in the channel after the ticker was cancelled.
pub fn apply_tick<T, R>(session: &mut RideSession<T, R>, signal: TickSignal) -> bool
where
    T: TickSource,
    R: Renderer,
{
    if !session.is_riding() || signal.ride_id != session.ride_id() {
        tracing::debug!(
            stale_ride = signal.ride_id,
            current_ride = session.ride_id(),
            "ignoring stale tick"
        );
        return false;
    }
    session.tick();
    true
}

/// Stop the ride once it has run for `limit` seconds.
///
/// Runs in the same loop iteration as the tick that reaches the limit, so no
/// further tick can be applied first. Returns the limit still pending.
fn enforce_stop_at<T, R>(session: &mut RideSession<T, R>, limit: Option<u64>) -> Option<u64>
where
    T: TickSource,
    R: Renderer,
{
    let limit = limit?;
    if !session.is_riding() {
        return None;
    }
    if session.elapsed_seconds() < limit {
        return Some(limit);
    }
    tracing::info!(
        ride_id = session.ride_id(),
        limit,
        "requested ride length reached; stopping"
    );
    session.stop();
    None
}

/// Send buffered events downstream. Returns `false` if the receiver is gone.
async fn forward_events(buffer: &mut EventBuffer, tx: &mpsc::Sender<RenderEvent>) -> bool {
    let pending: Vec<RenderEvent> = buffer.drain().collect();
    for event in pending {
        if tx.send(event).await.is_err() {
            return false;
        }
    }
    true
}

// ── RideController ────────────────────────────────────────────────────────────

/// Cloneable sender of [`RideCommand`]s.
#[derive(Debug, Clone)]
pub struct RideController {
    tx: mpsc::Sender<RideCommand>,
}

impl RideController {
    pub async fn start_ride(&self) -> Result<()> {
        self.send(RideCommand::Start).await
    }

    /// Start a ride that the driver stops after `seconds` ticks.
    pub async fn start_ride_for(&self, seconds: u64) -> Result<()> {
        self.send(RideCommand::StartFor(seconds)).await
    }

    pub async fn stop_ride(&self) -> Result<()> {
        self.send(RideCommand::Stop).await
    }

    pub async fn shutdown(&self) -> Result<()> {
        self.send(RideCommand::Shutdown).await
    }

    pub async fn send(&self, command: RideCommand) -> Result<()> {
        self.tx
            .send(command)
            .await
            .map_err(|_| RideError::DriverClosed)
    }
}

// ── DriverHandle ──────────────────────────────────────────────────────────────

/// A handle to the background driver task.
pub struct DriverHandle {
    handle: tokio::task::JoinHandle<()>,
}

impl DriverHandle {
    /// Immediately abort the driver task.
    pub fn abort(&self) {
        self.handle.abort();
    }

    /// Wait for the driver task to exit on its own.
    pub async fn join(self) {
        if let Err(e) = self.handle.await {
            if !e.is_cancelled() {
                tracing::warn!(error = %e, "ride driver task failed");
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
